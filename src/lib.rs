//! Vector features tagged with a coordinate reference system, with reprojection and unit-aware
//! area and length.
//!
//! Assigning a CRS (`FeatureCollection::set_crs`) and transforming coordinates into another one
//! (`FeatureCollection::reproject`) are separate operations.

extern crate log;
pub mod config;
pub mod crs;
pub mod error;
pub mod geofile;
pub mod pipeline;
pub mod store;

pub use crate::crs::crs_def::{Crs, CrsState, Units};
pub use crate::error::{StoreError, StoreResult};
pub use crate::geofile::feature::{Feature, FeatureMap};
pub use crate::geofile::geojson::{load_geojson, parse_geojson, save_geojson};
pub use crate::store::collection::{Bounds, FeatureCollection};
pub use crate::store::measure::{Measured, UnitMismatchWarning};
