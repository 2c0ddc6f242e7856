use thiserror::Error;

use crate::crs::crs_def::Crs;

/// Errors surfaced by the geometry store. None of them are transient: the caller has to fix the
/// input (supply a CRS, pick another target projection, filter out-of-range features) and retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The source could not be read or does not describe supported features.
    #[error("Could not read features: {0}")]
    Format(String),

    /// Relabelling a collection that already carries a different CRS.
    #[error("Collection is already in {current}, refusing to relabel it as {requested}. Use reproject to transform the coordinates instead")]
    InvalidCrs { current: Crs, requested: Crs },

    #[error("The collection has no CRS. Assign one with set_crs before reprojecting or locating it")]
    UndefinedCrs,

    /// A vertex lies outside the area in which the source or target projection is defined.
    #[error("Coordinate ({x}, {y}) lies outside the valid area of {crs}")]
    ProjectionRange { x: f64, y: f64, crs: Crs },

    #[error("No transform available from {from} to {to}")]
    UnsupportedTransform { from: Crs, to: Crs },

    #[error("Unrecognised CRS identifier '{0}'")]
    UnknownCrs(String),

    #[error("Attribute '{name}' has {actual} values but the collection has {expected} features")]
    AttributeLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("The collection has no features")]
    EmptyCollection,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format(reason.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
