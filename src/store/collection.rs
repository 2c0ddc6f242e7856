use geo::BoundingRect;

use crate::crs::crs_def::{Crs, CrsState};
use crate::crs::crs_utils::utm_crs_for_coordinate;
use crate::crs::transform::Transformer;
use crate::error::{StoreError, StoreResult};
use crate::geofile::feature::Feature;

use super::measure::{geometry_area, geometry_length, Measure, Measured, UnitMismatchWarning};
use super::summary::Summary;

/// Axis aligned bounding box in the coordinates of a collection's CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn center(&self) -> geo::Coord {
        geo::Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// As (min_x, min_y, max_x, max_y).
    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<geo::Rect> for Bounds {
    fn from(rect: geo::Rect) -> Self {
        Bounds {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}

/// Ordered features sharing a single CRS state.
///
/// The CRS can only change through `set_crs` (undefined to assigned) and `reproject` (assigned to
/// another assigned CRS, with coordinates transformed). Features cannot be moved in and out of
/// the collection individually, so a collection never holds geometry in two different CRSs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    crs: CrsState,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>, crs: impl Into<CrsState>) -> Self {
        Self {
            features,
            crs: crs.into(),
        }
    }

    /// A collection whose coordinates have no known meaning yet.
    pub fn without_crs(features: Vec<Feature>) -> Self {
        Self::new(features, CrsState::Undefined)
    }

    pub fn crs(&self) -> CrsState {
        self.crs
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Mutable access to a feature. Only its attributes can be changed through it.
    pub fn feature_mut(&mut self, index: usize) -> Option<&mut Feature> {
        self.features.get_mut(index)
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }

    /// Declare what the coordinates mean, without touching them.
    ///
    /// Succeeds when the CRS is undefined or already `crs`. A collection that is already in a
    /// different CRS is not relabelled: its coordinates would silently change meaning. Use
    /// [`FeatureCollection::reproject`] to transform them instead.
    pub fn set_crs(self, crs: Crs) -> StoreResult<Self> {
        match self.crs {
            CrsState::Undefined => {
                log::debug!("Assigning CRS {} to {} features", crs, self.len());
                Ok(Self {
                    crs: CrsState::Assigned(crs),
                    ..self
                })
            }
            CrsState::Assigned(current) if current == crs => Ok(self),
            CrsState::Assigned(current) => Err(StoreError::InvalidCrs {
                current,
                requested: crs,
            }),
        }
    }

    /// Transform every vertex of every feature into `target` and return the result as a new
    /// collection. `self` is left untouched, also on error.
    pub fn reproject(&self, target: Crs) -> StoreResult<Self> {
        let source = self.crs.crs().ok_or(StoreError::UndefinedCrs)?;
        let transformer = Transformer::new(source, target)?;
        log::debug!(
            "Reprojecting {} features from {} to {} ({})",
            self.len(),
            source,
            target,
            transformer.description()
        );

        let features = self
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let geometry = transformer
                    .transform_geometry(feature.geometry())
                    .map_err(|err| {
                        log::debug!("Feature {} could not be reprojected: {}", index, err);
                        err
                    })?;
                Ok(feature.with_geometry(geometry))
            })
            .collect::<StoreResult<Vec<Feature>>>()?;

        Ok(Self {
            features,
            crs: CrsState::Assigned(target),
        })
    }

    /// Planar area of every feature in the units of the CRS.
    pub fn area(&self) -> Measured {
        self.measure(Measure::Area, geometry_area)
    }

    /// Planar length of every feature in the units of the CRS. Polygons report their perimeter.
    pub fn length(&self) -> Measured {
        self.measure(Measure::Length, geometry_length)
    }

    fn measure(&self, measure: Measure, measure_fn: fn(&geo::Geometry) -> f64) -> Measured {
        let warning = UnitMismatchWarning::for_measure(measure, self.crs);
        if let Some(warning) = &warning {
            log::warn!("{}", warning);
        }
        Measured {
            values: self
                .features
                .iter()
                .map(|feature| measure_fn(feature.geometry()))
                .collect(),
            warning,
        }
    }

    /// Bounding box over all features, `None` when there is no geometry to bound.
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(|feature| feature.geometry().bounding_rect())
            .map(Bounds::from)
            .reduce(Bounds::union)
    }

    /// WGS 84 UTM zone containing the center of the collection's bounds.
    pub fn estimate_utm_crs(&self) -> StoreResult<Crs> {
        let crs = self.crs.crs().ok_or(StoreError::UndefinedCrs)?;
        let center = self.bounds().ok_or(StoreError::EmptyCollection)?.center();
        let lon_lat = Transformer::new(crs, Crs::Wgs84)?.transform_coord(center)?;
        utm_crs_for_coordinate(lon_lat.x, lon_lat.y)
    }

    /// New collection with the features for which `predicate` holds, in the same CRS.
    pub fn select<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Feature) -> bool,
    {
        Self {
            features: self
                .features
                .iter()
                .filter(|feature| predicate(*feature))
                .cloned()
                .collect(),
            crs: self.crs,
        }
    }

    /// New collection with the first `n` features.
    pub fn head(&self, n: usize) -> Self {
        Self {
            features: self.features.iter().take(n).cloned().collect(),
            crs: self.crs,
        }
    }

    /// New collection with the features whose attribute `name` equals `value`.
    pub fn filter_attribute(&self, name: &str, value: &serde_json::Value) -> Self {
        self.select(|feature| feature.attribute(name) == Some(value))
    }

    /// Set attribute `name` on every feature, one value per feature in order.
    pub fn with_attribute(
        mut self,
        name: &str,
        values: Vec<serde_json::Value>,
    ) -> StoreResult<Self> {
        if values.len() != self.features.len() {
            return Err(StoreError::AttributeLength {
                name: name.to_string(),
                expected: self.features.len(),
                actual: values.len(),
            });
        }
        for (feature, value) in self.features.iter_mut().zip(values) {
            feature.set_attribute(name, value);
        }
        Ok(self)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(self)
    }
}
