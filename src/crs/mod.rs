pub mod crs_def;
pub mod crs_utils;
pub mod ellipsoid;
pub mod equal_area;
pub mod projection;
#[cfg(feature = "proj")]
pub mod proj_transform;
pub mod transform;
pub mod utm_conversion;
pub mod web_mercator;
