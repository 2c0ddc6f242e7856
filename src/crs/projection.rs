/// Position on the WGS 84 ellipsoid, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geographic {
    pub lon: f64,
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }

    /// Returns (lon, lat) in degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }
}

/// A map projection between geographic WGS 84 coordinates and planar meters.
///
/// Implementations are pure formulas: they do not check the area of use, callers are expected to
/// do that before calling `forward`.
pub trait Projection {
    /// Geographic position to projected (x, y) in meters.
    fn forward(&self, geo: Geographic) -> (f64, f64);

    /// Projected (x, y) in meters to geographic position.
    fn inverse(&self, x: f64, y: f64) -> Geographic;
}
