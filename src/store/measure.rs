use std::fmt;

use geo::{Area, EuclideanLength};

use crate::crs::crs_def::{CrsState, Units};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Area,
    Length,
}

impl Measure {
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Area => "area",
            Measure::Length => "length",
        }
    }
}

/// Raised alongside `area`/`length` results whose units are not physical lengths. The values are
/// still computed; the caller decides whether they are meaningful.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitMismatchWarning {
    /// The CRS is geographic, values are in (square) degrees.
    AngularUnits { measure: Measure, crs: CrsState },
    /// The CRS is undefined, the unit of the values is unknown.
    UndefinedCrs { measure: Measure },
    /// The CRS is known by code only, without its units.
    UnknownUnits { measure: Measure, crs: CrsState },
}

impl UnitMismatchWarning {
    /// Warning to attach to a measurement taken under `crs`, if any.
    pub fn for_measure(measure: Measure, crs: CrsState) -> Option<Self> {
        match crs {
            CrsState::Undefined => Some(UnitMismatchWarning::UndefinedCrs { measure }),
            CrsState::Assigned(assigned) => match assigned.units() {
                Units::Degrees => Some(UnitMismatchWarning::AngularUnits { measure, crs }),
                Units::Unknown => Some(UnitMismatchWarning::UnknownUnits { measure, crs }),
                Units::Meters => None,
            },
        }
    }
}

impl fmt::Display for UnitMismatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitMismatchWarning::AngularUnits { measure, crs } => write!(
                f,
                "Geometry is in a geographic CRS ({}), {} results are in degrees and likely incorrect. Reproject to a projected CRS first",
                crs,
                measure.name()
            ),
            UnitMismatchWarning::UndefinedCrs { measure } => write!(
                f,
                "Geometry has no CRS, the units of the {} results are unknown",
                measure.name()
            ),
            UnitMismatchWarning::UnknownUnits { measure, crs } => write!(
                f,
                "The units of {} are not known, the units of the {} results are unknown",
                crs,
                measure.name()
            ),
        }
    }
}

/// Per-feature measurement, in feature order, in the units of the collection's CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Measured {
    pub values: Vec<f64>,
    pub warning: Option<UnitMismatchWarning>,
}

impl Measured {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn has_warning(&self) -> bool {
        self.warning.is_some()
    }
}

/// Planar area. Zero for points and lines.
pub fn geometry_area(geometry: &geo::Geometry) -> f64 {
    geometry.unsigned_area()
}

/// Planar length. Polygons measure their perimeter including holes, points measure zero.
pub fn geometry_length(geometry: &geo::Geometry) -> f64 {
    match geometry {
        geo::Geometry::Point(_) | geo::Geometry::MultiPoint(_) => 0.0,
        geo::Geometry::Line(line) => line.euclidean_length(),
        geo::Geometry::LineString(line) => line.euclidean_length(),
        geo::Geometry::MultiLineString(lines) => lines.euclidean_length(),
        geo::Geometry::Polygon(polygon) => polygon_perimeter(polygon),
        geo::Geometry::MultiPolygon(polygons) => polygons.0.iter().map(polygon_perimeter).sum(),
        geo::Geometry::Rect(rect) => polygon_perimeter(&rect.to_polygon()),
        geo::Geometry::Triangle(triangle) => polygon_perimeter(&triangle.to_polygon()),
        geo::Geometry::GeometryCollection(collection) => {
            collection.0.iter().map(geometry_length).sum()
        }
    }
}

fn polygon_perimeter(polygon: &geo::Polygon) -> f64 {
    polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>()
}
