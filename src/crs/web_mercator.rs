//! Web Mercator (EPSG:3857), a.k.a. Pseudo-Mercator: spherical Mercator formulas applied to WGS 84
//! coordinates, as used by tiled basemaps.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::ellipsoid::WGS84;
use super::projection::{Geographic, Projection};

/// Latitude limit of EPSG:3857 in degrees. Beyond it the projection is not defined in practice,
/// y goes to infinity at the poles.
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.06;

#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn forward(&self, geo: Geographic) -> (f64, f64) {
        let r = WGS84::A;
        let x = r * geo.lon;
        let y = r * (FRAC_PI_4 + geo.lat / 2.0).tan().ln();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> Geographic {
        let r = WGS84::A;
        let lon = x / r;
        let lat = 2.0 * (y / r).exp().atan() - FRAC_PI_2;
        Geographic::new(lon, lat)
    }
}
