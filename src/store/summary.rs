use std::{collections::BTreeMap, fmt};

use crate::crs::crs_def::CrsState;

use super::collection::{Bounds, FeatureCollection};

/// Overview of a collection, for inspecting freshly loaded data.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub feature_count: usize,
    pub crs: CrsState,
    /// Number of features per geometry type.
    pub geometry_types: BTreeMap<&'static str, usize>,
    pub bounds: Option<Bounds>,
    /// Attribute names over all features, in order of first appearance.
    pub attribute_names: Vec<String>,
}

impl Summary {
    pub fn of(collection: &FeatureCollection) -> Self {
        let mut geometry_types = BTreeMap::new();
        let mut attribute_names: Vec<String> = Vec::new();
        for feature in collection.iter() {
            *geometry_types.entry(feature.geometry_type()).or_insert(0) += 1;
            for name in feature.attributes.keys() {
                if !attribute_names.contains(name) {
                    attribute_names.push(name.clone());
                }
            }
        }
        Self {
            feature_count: collection.len(),
            crs: collection.crs(),
            geometry_types,
            bounds: collection.bounds(),
            attribute_names,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} features, CRS {}", self.feature_count, self.crs)?;
        let types: Vec<String> = self
            .geometry_types
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect();
        writeln!(f, "geometry types: {}", types.join(", "))?;
        match &self.bounds {
            Some(bounds) => writeln!(
                f,
                "bounds: ({}, {}, {}, {})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            )?,
            None => writeln!(f, "bounds: none")?,
        }
        write!(f, "attributes: {}", self.attribute_names.join(", "))
    }
}
