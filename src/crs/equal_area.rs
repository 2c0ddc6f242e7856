//! Lambert cylindrical equal-area on the WGS 84 ellipsoid with a standard parallel of 30°, the
//! NSIDC EASE-Grid 2.0 Global projection (EPSG:6933). Planar areas computed in it are true areas.

use super::ellipsoid::WGS84;
use super::projection::{Geographic, Projection};

/// Latitude limit of EPSG:6933 in degrees.
pub const EASE_GRID_MAX_LAT: f64 = 86.0;

const STANDARD_PARALLEL_DEG: f64 = 30.0;

/// Authalic function q(phi).
fn authalic_q(phi: f64) -> f64 {
    let e = WGS84::E;
    let e2 = WGS84::E2;
    let sin_phi = phi.sin();
    (1.0 - e2)
        * (sin_phi / (1.0 - e2 * sin_phi.powi(2))
            - (1.0 / (2.0 * e)) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln())
}

#[derive(Debug, Clone, Copy)]
pub struct EqualAreaCylindrical {
    /// Scale along the standard parallel.
    k0: f64,
    /// q at the pole.
    qp: f64,
}

impl EqualAreaCylindrical {
    pub fn ease_grid_2() -> Self {
        let phi_s = STANDARD_PARALLEL_DEG.to_radians();
        Self {
            k0: phi_s.cos() / (1.0 - WGS84::E2 * phi_s.sin().powi(2)).sqrt(),
            qp: authalic_q(std::f64::consts::FRAC_PI_2),
        }
    }
}

impl Default for EqualAreaCylindrical {
    fn default() -> Self {
        Self::ease_grid_2()
    }
}

impl Projection for EqualAreaCylindrical {
    fn forward(&self, geo: Geographic) -> (f64, f64) {
        let x = WGS84::A * self.k0 * geo.lon;
        let y = WGS84::A * authalic_q(geo.lat) / (2.0 * self.k0);
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> Geographic {
        let e2 = WGS84::E2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let lon = x / (WGS84::A * self.k0);
        let q = 2.0 * y * self.k0 / WGS84::A;
        // Authalic latitude, then the series back to geodetic latitude. Northings beyond the
        // poles give |q| > qp and a NaN latitude.
        let beta = (q / self.qp).asin();
        let lat = beta
            + (e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta).sin()
            + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta).sin()
            + (761.0 * e6 / 45360.0) * (6.0 * beta).sin();
        Geographic::new(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_grid_extent() {
        let (x, y) =
            EqualAreaCylindrical::ease_grid_2().forward(Geographic::from_degrees(180.0, 86.0));
        assert_abs_diff_eq!(x, 17367530.445, epsilon = 1e-2);
        assert_abs_diff_eq!(y, 7324184.564, epsilon = 1e-2);
    }

    #[test]
    fn test_inverse_past_the_pole_is_nan() {
        let geo = EqualAreaCylindrical::ease_grid_2().inverse(0.0, 1e8);
        assert!(geo.lat.is_nan());
    }

    #[test]
    fn test_equator_maps_to_zero_northing() {
        let (_, y) = EqualAreaCylindrical::ease_grid_2().forward(Geographic::from_degrees(45.0, 0.0));
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
    }
}
