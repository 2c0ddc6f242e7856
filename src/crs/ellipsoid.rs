/// The WGS 84 ellipsoid shared by every CRS in the catalogue.
pub struct WGS84;

impl WGS84 {
    /// Semi-major axis (equatorial radius) in meters.
    pub const A: f64 = 6378137.0;

    /// Flattening.
    pub const F: f64 = 1.0 / 298.257223563;

    /// First eccentricity squared.
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;

    /// First eccentricity, sqrt(E2).
    pub const E: f64 = 0.0818191908426215;

    /// Second eccentricity squared.
    pub const EP2: f64 = Self::E2 / (1.0 - Self::E2);
}
