use crate::error::{StoreError, StoreResult};

/// Ordered attribute mapping of a feature, name to JSON value.
pub type FeatureMap = serde_json::Map<String, serde_json::Value>;

/// One geometry plus its attributes. The geometry is fixed at construction, attributes can be
/// edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: geo::Geometry,
    pub attributes: FeatureMap,
}

impl Feature {
    /// Create a feature without attributes. Only points, lines, polygons and their multi
    /// variants are accepted.
    pub fn new(geometry: impl Into<geo::Geometry>) -> StoreResult<Self> {
        Self::with_attributes(geometry, FeatureMap::new())
    }

    pub fn with_attributes(
        geometry: impl Into<geo::Geometry>,
        attributes: FeatureMap,
    ) -> StoreResult<Self> {
        let geometry = geometry.into();
        match geometry {
            geo::Geometry::Point(_)
            | geo::Geometry::LineString(_)
            | geo::Geometry::Polygon(_)
            | geo::Geometry::MultiPoint(_)
            | geo::Geometry::MultiLineString(_)
            | geo::Geometry::MultiPolygon(_) => Ok(Self {
                geometry,
                attributes,
            }),
            _ => Err(StoreError::format(format!(
                "unsupported geometry type {}",
                geometry_type_name(&geometry)
            ))),
        }
    }

    pub fn geometry(&self) -> &geo::Geometry {
        &self.geometry
    }

    pub fn geometry_type(&self) -> &'static str {
        geometry_type_name(&self.geometry)
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    /// Insert or overwrite an attribute, returning the previous value.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Same attributes, new geometry. Used by reprojection, which swaps whole geometries.
    pub(crate) fn with_geometry(&self, geometry: geo::Geometry) -> Self {
        Self {
            geometry,
            attributes: self.attributes.clone(),
        }
    }
}

pub fn geometry_type_name(geometry: &geo::Geometry) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_attributes_keep_insertion_order() {
        let mut feature = Feature::new(geo::Point::new(80.0, 45.0)).unwrap();
        feature.set_attribute("zeta", "last letter");
        feature.set_attribute("alpha", 1);
        feature.set_attribute("mid", json!(null));
        let names: Vec<&String> = feature.attributes.keys().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut feature = Feature::new(geo::Point::new(80.0, 45.0)).unwrap();
        assert_eq!(feature.set_attribute("key1", "value1"), None);
        assert_eq!(
            feature.set_attribute("key1", "other value"),
            Some(json!("value1"))
        );
        assert_eq!(feature.attribute("key1"), Some(&json!("other value")));
    }

    #[test]
    fn test_rejects_geometry_collection() {
        let collection = geo::GeometryCollection(vec![geo::Point::new(0.0, 0.0).into()]);
        assert!(matches!(
            Feature::new(geo::Geometry::GeometryCollection(collection)),
            Err(StoreError::Format(_))
        ));
    }
}
