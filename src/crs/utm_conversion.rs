//! Transverse Mercator on the WGS 84 ellipsoid as used by the UTM zones (EPSG:326xx north,
//! EPSG:327xx south). Series expansions from Snyder, "Map Projections: A Working Manual".

use super::ellipsoid::WGS84;
use super::projection::{Geographic, Projection};

/// Scale factor on the central meridian.
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500000.0;
const FALSE_NORTHING_SOUTH: f64 = 10000000.0;

/// Longitude of the central meridian of a UTM zone, in degrees.
pub fn zone_central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Zone number (1..=60) whose six degree band contains `lon`.
pub fn zone_number_for_lon(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u8
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    zone: u8,
    south: bool,
}

impl TransverseMercator {
    pub fn utm(zone: u8, south: bool) -> Self {
        Self { zone, south }
    }

    fn lon0(&self) -> f64 {
        zone_central_meridian(self.zone).to_radians()
    }

    fn false_northing(&self) -> f64 {
        if self.south {
            FALSE_NORTHING_SOUTH
        } else {
            0.0
        }
    }
}

/// Meridian arc length from the equator to latitude `phi`.
fn meridian_arc(phi: f64) -> f64 {
    let e2 = WGS84::E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    WGS84::A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

impl Projection for TransverseMercator {
    fn forward(&self, geo: Geographic) -> (f64, f64) {
        let e2 = WGS84::E2;
        let ep2 = WGS84::EP2;
        let phi = geo.lat;
        let (sin_phi, cos_phi, tan_phi) = (phi.sin(), phi.cos(), phi.tan());

        let n = WGS84::A / (1.0 - e2 * sin_phi.powi(2)).sqrt();
        let t = tan_phi.powi(2);
        let c = ep2 * cos_phi.powi(2);
        let a = (geo.lon - self.lon0()) * cos_phi;
        let m = meridian_arc(phi);

        let x = K0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
            + FALSE_EASTING;
        let y = K0
            * (m + n
                * tan_phi
                * (a.powi(2) / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep2) * a.powi(6)
                        / 720.0))
            + self.false_northing();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> Geographic {
        let a = WGS84::A;
        let e2 = WGS84::E2;
        let ep2 = WGS84::EP2;

        let x = x - FALSE_EASTING;
        let y = y - self.false_northing();

        // Footpoint latitude.
        let m = y / K0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1, tan_phi1) = (phi1.sin(), phi1.cos(), phi1.tan());
        let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
        let t1 = tan_phi1.powi(2);
        let c1 = ep2 * cos_phi1.powi(2);
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
        let d = x / (n1 * K0);

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);
        let lon = self.lon0()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        Geographic::new(lon, lat)
    }
}
