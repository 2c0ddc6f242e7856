use crate::error::{StoreError, StoreResult};

use super::crs_def::Crs;
use super::utm_conversion::zone_number_for_lon;

pub type EpsgCode = u32;

pub fn epsg_code_to_authority_string(code: EpsgCode) -> String {
    format!("EPSG:{}", code)
}

/// WGS 84 UTM zone which contains the lon/lat WGS 84 coordinate.
///
/// # Arguments
/// * lon - longitude in degrees.
/// * lat - latitude in degrees.
///
/// # Returns
/// The northern zone for latitudes >= 0, the southern zone otherwise. UTM is not defined outside
/// 80°S..84°N, coordinates there are reported as out of range.
pub fn utm_crs_for_coordinate(lon: f64, lat: f64) -> StoreResult<Crs> {
    let crs = Crs::utm(zone_number_for_lon(lon), lat < 0.0)?;
    if !(-180.0..=180.0).contains(&lon) || !(-80.0..=84.0).contains(&lat) {
        return Err(StoreError::ProjectionRange {
            x: lon,
            y: lat,
            crs,
        });
    }
    Ok(crs)
}
