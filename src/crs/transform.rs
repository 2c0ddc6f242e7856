use geo::{Coord, Geometry, MapCoords};

use crate::error::{StoreError, StoreResult};

use super::crs_def::Crs;
use super::equal_area::EqualAreaCylindrical;
use super::projection::{Geographic, Projection};
use super::utm_conversion::TransverseMercator;
use super::web_mercator::WebMercator;

/// Projection behind a catalogue CRS. `None` for geographic WGS 84 itself, which is the pivot.
fn catalogue_projection(crs: Crs) -> Option<Box<dyn Projection>> {
    match crs {
        Crs::WebMercator => Some(Box::new(WebMercator)),
        Crs::Utm { zone, south } => Some(Box::new(TransverseMercator::utm(zone, south))),
        Crs::EaseGrid2Global => Some(Box::new(EqualAreaCylindrical::ease_grid_2())),
        Crs::Wgs84 | Crs::Other { .. } => None,
    }
}

fn in_area_of_use(crs: Crs, lon: f64, lat: f64) -> bool {
    crs.area_of_use().map_or(true, |area| area.contains(lon, lat))
}

/// Coordinate transform from one CRS to another.
///
/// Catalogue pairs pivot through geographic WGS 84; every catalogue CRS is on the WGS 84 datum so
/// no datum shift is involved. Pairs with a caller-declared CRS go through PROJ when the `proj`
/// feature is enabled.
pub enum Transformer {
    /// Source and target are the same CRS.
    Identity,
    Catalogue {
        source: Crs,
        target: Crs,
        source_projection: Option<Box<dyn Projection>>,
        target_projection: Option<Box<dyn Projection>>,
    },
    #[cfg(feature = "proj")]
    Proj(super::proj_transform::ProjTransform),
}

impl Transformer {
    pub fn new(from: Crs, to: Crs) -> StoreResult<Self> {
        if from == to {
            return Ok(Self::Identity);
        }

        if from.is_builtin() && to.is_builtin() {
            return Ok(Self::Catalogue {
                source: from,
                target: to,
                source_projection: catalogue_projection(from),
                target_projection: catalogue_projection(to),
            });
        }

        #[cfg(feature = "proj")]
        {
            return Ok(Self::Proj(super::proj_transform::ProjTransform::new(from, to)?));
        }

        #[cfg(not(feature = "proj"))]
        Err(StoreError::UnsupportedTransform { from, to })
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Catalogue { .. } => "built-in WGS 84 projections",
            #[cfg(feature = "proj")]
            Self::Proj(_) => "PROJ",
        }
    }

    /// Transform a single coordinate, failing when it lies outside the source's or the target's
    /// area of use or the result is not finite.
    pub fn transform_coord(&self, coord: Coord) -> StoreResult<Coord> {
        match self {
            Self::Identity => Ok(coord),
            Self::Catalogue {
                source,
                target,
                source_projection,
                target_projection,
            } => {
                let out_of_range = |crs: Crs| StoreError::ProjectionRange {
                    x: coord.x,
                    y: coord.y,
                    crs,
                };

                let geographic = match source_projection {
                    Some(projection) => projection.inverse(coord.x, coord.y),
                    None => Geographic::from_degrees(coord.x, coord.y),
                };
                let (lon, lat) = geographic.to_degrees();
                // A projected coordinate past its own grid inverts to NaN or to a latitude outside
                // the source envelope.
                if !lon.is_finite() || !lat.is_finite() || !in_area_of_use(*source, lon, lat) {
                    return Err(out_of_range(*source));
                }
                if !in_area_of_use(*target, lon, lat) {
                    return Err(out_of_range(*target));
                }

                let (x, y) = match target_projection {
                    Some(projection) => projection.forward(geographic),
                    None => (lon, lat),
                };
                if !x.is_finite() || !y.is_finite() {
                    return Err(out_of_range(*target));
                }
                Ok(Coord { x, y })
            }
            #[cfg(feature = "proj")]
            Self::Proj(proj_transform) => proj_transform.convert(coord),
        }
    }

    /// Transform every vertex of a geometry. Either all vertices transform or an error is
    /// returned.
    pub fn transform_geometry(&self, geometry: &Geometry) -> StoreResult<Geometry> {
        if let Self::Identity = self {
            return Ok(geometry.clone());
        }
        geometry.try_map_coords(|coord| self.transform_coord(coord))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use crate::crs::crs_def::Units;

    use super::*;

    fn round_trip(from: Crs, to: Crs, coord: Coord) -> Coord {
        let forward = Transformer::new(from, to).unwrap();
        let backward = Transformer::new(to, from).unwrap();
        backward
            .transform_coord(forward.transform_coord(coord).unwrap())
            .unwrap()
    }

    #[rstest]
    #[case(Crs::WebMercator, 120.0, 15.0)]
    #[case(Crs::WebMercator, -70.6, -33.4)]
    #[case(Crs::Utm { zone: 51, south: false }, 120.0, 15.0)]
    #[case(Crs::Utm { zone: 51, south: false }, 125.5, 60.0)]
    #[case(Crs::Utm { zone: 40, south: true }, 55.45, -20.88)]
    #[case(Crs::EaseGrid2Global, 10.0, 45.0)]
    #[case(Crs::EaseGrid2Global, -70.0, -80.0)]
    #[case(Crs::Utm { zone: 51, south: false }, 127.0, 84.0)] // Corners of the zone envelope.
    #[case(Crs::Utm { zone: 51, south: false }, 119.0, 0.0)]
    #[case(Crs::Utm { zone: 51, south: true }, 119.0, -80.0)]
    fn test_geographic_round_trip(#[case] projected: Crs, #[case] lon: f64, #[case] lat: f64) {
        let coord = Coord { x: lon, y: lat };
        let result = round_trip(Crs::Wgs84, projected, coord);
        assert_abs_diff_eq!(result.x, lon, epsilon = 1e-6);
        assert_abs_diff_eq!(result.y, lat, epsilon = 1e-6);
    }

    #[test]
    fn test_projected_to_projected_round_trip() {
        // Tokyo in UTM 54N, via Web Mercator and back.
        let coord = Coord {
            x: 390467.986,
            y: 3949820.494,
        };
        let result = round_trip(Crs::Utm { zone: 54, south: false }, Crs::WebMercator, coord);
        // Sub-millimeter.
        assert_abs_diff_eq!(result.x, coord.x, epsilon = 1e-4);
        assert_abs_diff_eq!(result.y, coord.y, epsilon = 1e-4);
    }

    #[test]
    fn test_utm_to_geographic() {
        let transformer = Transformer::new(Crs::Utm { zone: 54, south: false }, Crs::Wgs84).unwrap();
        let coord = transformer
            .transform_coord(Coord {
                x: 390685.694,
                y: 3949820.653,
            })
            .unwrap();
        assert_abs_diff_eq!(coord.x, 139.7919128, epsilon = 1e-7);
        assert_abs_diff_eq!(coord.y, 35.6862357, epsilon = 1e-7);
    }

    #[rstest]
    #[case(Crs::WebMercator, 0.0, 89.0)]
    #[case(Crs::WebMercator, 0.0, -90.0)]
    #[case(Crs::EaseGrid2Global, 30.0, 87.5)]
    #[case(Crs::Utm { zone: 51, south: false }, 10.0, 15.0)] // Far outside the zone.
    #[case(Crs::Utm { zone: 51, south: false }, 120.0, 85.0)]
    #[case(Crs::Utm { zone: 51, south: false }, 129.0, 80.0)]
    #[case(Crs::Utm { zone: 51, south: true }, 123.0, 60.0)] // Wrong hemisphere.
    fn test_out_of_range(#[case] target: Crs, #[case] x: f64, #[case] y: f64) {
        let transformer = Transformer::new(Crs::Wgs84, target).unwrap();
        let result = transformer.transform_coord(Coord { x, y });
        assert!(matches!(
            result,
            Err(StoreError::ProjectionRange { crs, .. }) if crs == target
        ));
    }

    #[rstest]
    #[case(Crs::EaseGrid2Global, 0.0, 1e8)] // Past the pole.
    #[case(Crs::EaseGrid2Global, 0.0, -7.33e6)] // Between 86°S and the pole.
    #[case(Crs::WebMercator, 0.0, 1e9)]
    #[case(Crs::WebMercator, 2.1e7, 0.0)]
    #[case(Crs::EaseGrid2Global, f64::NAN, 0.0)]
    #[case(Crs::Utm { zone: 51, south: false }, 500000.0, -2e5)]
    fn test_source_out_of_range(#[case] source: Crs, #[case] x: f64, #[case] y: f64) {
        let transformer = Transformer::new(source, Crs::Wgs84).unwrap();
        let result = transformer.transform_coord(Coord { x, y });
        assert!(matches!(
            result,
            Err(StoreError::ProjectionRange { crs, .. }) if crs == source
        ));
    }

    #[test]
    fn test_geometry_fails_as_a_whole() {
        let line: geo::LineString = vec![(0.0, 10.0), (0.0, 89.0)].into();
        let transformer = Transformer::new(Crs::Wgs84, Crs::WebMercator).unwrap();
        assert!(transformer
            .transform_geometry(&Geometry::LineString(line))
            .is_err());
    }

    #[test]
    fn test_identity() {
        let transformer = Transformer::new(Crs::WebMercator, Crs::WebMercator).unwrap();
        assert!(matches!(transformer, Transformer::Identity));
        // Identity never range checks.
        let coord = Coord { x: 1e12, y: -1e12 };
        assert_eq!(transformer.transform_coord(coord).unwrap(), coord);
    }

    #[cfg(not(feature = "proj"))]
    #[test]
    fn test_declared_crs_needs_proj() {
        let lambert_93 = Crs::other(2154, Units::Meters);
        assert!(matches!(
            Transformer::new(Crs::Wgs84, lambert_93),
            Err(StoreError::UnsupportedTransform { .. })
        ));
    }

    #[cfg(feature = "proj")]
    #[test]
    fn test_declared_crs_through_proj() {
        let lambert_93 = Crs::other(2154, Units::Meters);
        let transformer = Transformer::new(Crs::Wgs84, lambert_93).unwrap();
        // Paris.
        let coord = transformer
            .transform_coord(Coord { x: 2.35, y: 48.85 })
            .unwrap();
        assert_abs_diff_eq!(coord.x, 652000.0, epsilon = 2000.0);
        assert_abs_diff_eq!(coord.y, 6862000.0, epsilon = 2000.0);
    }
}
