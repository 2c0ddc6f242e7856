use std::{fs, path::Path};

use indicatif::ProgressBar;
use serde_json::{json, Value};

use crate::crs::crs_def::{Crs, CrsState};
use crate::error::{StoreError, StoreResult};
use crate::store::collection::FeatureCollection;

use super::feature::{Feature, FeatureMap};

/// Read a GeoJSON file into a collection, see [`parse_geojson`].
pub fn load_geojson(filepath: &Path) -> StoreResult<FeatureCollection> {
    let contents = fs::read_to_string(filepath).map_err(|err| {
        StoreError::format(format!("could not read {}: {}", filepath.display(), err))
    })?;
    let collection = parse_geojson(&contents)?;
    log::info!(
        "Read {} features with CRS {} from {:?}",
        collection.len(),
        collection.crs(),
        filepath
    );
    Ok(collection)
}

/// Parse GeoJSON text. A FeatureCollection, a single Feature or a bare Geometry are accepted.
///
/// The CRS is taken from the legacy top-level `crs` member. Without it the collection's CRS is
/// undefined: the RFC 7946 WGS 84 default is not assumed, since files written by older tools carry
/// projected coordinates without saying so.
pub fn parse_geojson(contents: &str) -> StoreResult<FeatureCollection> {
    let geojson: geojson::GeoJson = contents
        .parse()
        .map_err(|err: geojson::Error| StoreError::format(err.to_string()))?;

    let (geojson_features, foreign_members) = match geojson {
        geojson::GeoJson::FeatureCollection(collection) => {
            (collection.features, collection.foreign_members)
        }
        geojson::GeoJson::Feature(feature) => {
            let foreign_members = feature.foreign_members.clone();
            (vec![feature], foreign_members)
        }
        geojson::GeoJson::Geometry(geometry) => {
            let foreign_members = geometry.foreign_members.clone();
            (vec![geojson::Feature::from(geometry)], foreign_members)
        }
    };

    let crs = match foreign_members.as_ref().and_then(|members| members.get("crs")) {
        Some(crs_member) => CrsState::Assigned(parse_crs_member(crs_member)?),
        None => CrsState::Undefined,
    };

    let features = geojson_features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature_from_geojson(index, feature))
        .collect::<StoreResult<Vec<Feature>>>()?;

    Ok(FeatureCollection::new(features, crs))
}

/// Read `{"type": "name", "properties": {"name": ...}}` or the older
/// `{"type": "EPSG", "properties": {"code": ...}}`.
fn parse_crs_member(crs_member: &Value) -> StoreResult<Crs> {
    let invalid = || StoreError::format(format!("unsupported crs member {}", crs_member));
    let properties = crs_member.get("properties").ok_or_else(invalid)?;
    match crs_member.get("type").and_then(Value::as_str) {
        Some("name") => {
            let name = properties
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(invalid)?;
            name.parse::<Crs>()
                .map_err(|err| StoreError::format(err.to_string()))
        }
        Some("EPSG") => {
            let code = properties
                .get("code")
                .and_then(Value::as_u64)
                .ok_or_else(invalid)?;
            let code = u32::try_from(code).map_err(|_| invalid())?;
            Ok(Crs::from_epsg_or_other(code))
        }
        _ => Err(invalid()),
    }
}

fn feature_from_geojson(index: usize, feature: geojson::Feature) -> StoreResult<Feature> {
    let geometry = feature
        .geometry
        .ok_or_else(|| StoreError::format(format!("feature {} has no geometry", index)))?;
    let geometry: geo::Geometry = geometry
        .try_into()
        .map_err(|err: geojson::Error| StoreError::format(format!("feature {}: {}", index, err)))?;
    Feature::with_attributes(geometry, feature.properties.unwrap_or_default())
        .map_err(|err| StoreError::format(format!("feature {}: {}", index, err)))
}

fn feature_to_geojson(feature: &Feature) -> geojson::Feature {
    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(
            feature.geometry(),
        ))),
        id: None,
        properties: Some(feature.attributes.clone()),
        foreign_members: None,
    }
}

/// Serialize a collection into a GeoJSON FeatureCollection. An assigned CRS is written as the
/// `crs` member, an undefined one is left out.
pub fn to_geojson(collection: &FeatureCollection) -> geojson::GeoJson {
    let bar = ProgressBar::new(collection.len() as u64);
    let features = collection
        .iter()
        .map(|feature| {
            bar.inc(1);
            feature_to_geojson(feature)
        })
        .collect();
    bar.finish_and_clear();

    let foreign_members = collection.crs().crs().map(|crs| {
        let mut members = FeatureMap::new();
        members.insert(
            "crs".to_string(),
            json!({"type": "name", "properties": {"name": crs.ogc_urn()}}),
        );
        members
    });
    let bbox = collection.bounds().map(|bounds| {
        let (min_x, min_y, max_x, max_y) = bounds.to_tuple();
        vec![min_x, min_y, max_x, max_y]
    });

    geojson::GeoJson::from(geojson::FeatureCollection {
        bbox,
        features,
        foreign_members,
    })
}

pub fn save_geojson(collection: &FeatureCollection, output_filepath: &Path) -> StoreResult<()> {
    log::info!(
        "Writing {} features with CRS {} to {:?}",
        collection.len(),
        collection.crs(),
        output_filepath
    );
    fs::write(output_filepath, to_geojson(collection).to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use serde_json::json;
    use testdir::testdir;

    use crate::crs::crs_def::Units;
    use crate::store::measure::UnitMismatchWarning;

    use super::*;

    const POLYGON_WITHOUT_CRS: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "cell", "population": 1200},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[120.0, 15.0], [121.0, 15.0], [121.0, 16.0], [120.0, 16.0], [120.0, 15.0]]]
            }
        }]
    }"#;

    #[test]
    fn test_missing_crs_is_undefined() {
        let collection = parse_geojson(POLYGON_WITHOUT_CRS).unwrap();
        assert!(collection.crs().is_undefined());
        assert_eq!(collection.len(), 1);
        let feature = collection.get(0).unwrap();
        assert_eq!(feature.geometry_type(), "Polygon");
        assert_eq!(feature.attribute("population"), Some(&json!(1200)));
    }

    #[rstest]
    #[case(json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}}), Crs::Wgs84)]
    #[case(json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}}), Crs::WebMercator)]
    #[case(json!({"type": "name", "properties": {"name": "EPSG:32651"}}), Crs::Utm { zone: 51, south: false })]
    #[case(json!({"type": "EPSG", "properties": {"code": 6933}}), Crs::EaseGrid2Global)]
    #[case(json!({"type": "name", "properties": {"name": "EPSG:2154"}}), Crs::Other { code: 2154, units: Units::Unknown })]
    #[case(json!({"type": "EPSG", "properties": {"code": 27700}}), Crs::Other { code: 27700, units: Units::Unknown })]
    fn test_crs_member(#[case] crs_member: Value, #[case] expected: Crs) {
        let contents = json!({
            "type": "FeatureCollection",
            "crs": crs_member,
            "features": [{
                "type": "Feature",
                "properties": null,
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
            }]
        })
        .to_string();
        let collection = parse_geojson(&contents).unwrap();
        assert_eq!(collection.crs(), CrsState::Assigned(expected));
        assert!(collection.get(0).unwrap().attributes.is_empty());
    }

    #[rstest]
    #[case("not json at all")]
    #[case(r#"{"type": "FeatureCollection"}"#)]
    #[case(r#"{"type": "FeatureCollection", "crs": {"type": "name", "properties": {"name": "Lambert 93"}}, "features": []}"#)]
    #[case(r#"{"type": "FeatureCollection", "crs": {"type": "link", "properties": {"href": "crs.prj"}}, "features": []}"#)]
    #[case(r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {}, "geometry": null}]}"#)]
    #[case(r#"{"type": "GeometryCollection", "geometries": [{"type": "Point", "coordinates": [1.0, 2.0]}]}"#)]
    fn test_format_errors(#[case] contents: &str) {
        assert!(matches!(
            parse_geojson(contents),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn test_single_geometry() {
        let collection =
            parse_geojson(r#"{"type": "LineString", "coordinates": [[0.0, 0.0], [3.0, 4.0]]}"#)
                .unwrap();
        assert_eq!(collection.len(), 1);
        assert_abs_diff_eq!(collection.length().values[0], 5.0);
    }

    #[test]
    fn test_unreadable_file() {
        let test_dir = testdir!();
        assert!(matches!(
            load_geojson(&test_dir.join("missing.geojson")),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn test_geofile_write_read_round_trip() {
        let collection = parse_geojson(POLYGON_WITHOUT_CRS)
            .unwrap()
            .set_crs(Crs::Wgs84)
            .unwrap()
            .reproject(Crs::WebMercator)
            .unwrap();

        let test_dir = testdir!();
        let geofile_filepath = test_dir.join("output.geojson");
        save_geojson(&collection, &geofile_filepath).unwrap();

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&geofile_filepath).unwrap()).unwrap();
        assert_eq!(
            written["crs"]["properties"]["name"],
            json!("urn:ogc:def:crs:EPSG::3857")
        );
        let (min_x, min_y, max_x, max_y) = collection.bounds().unwrap().to_tuple();
        assert_eq!(written["bbox"], json!([min_x, min_y, max_x, max_y]));
        assert_abs_diff_eq!(min_x, 13358338.895, epsilon = 1e-2);
        assert_abs_diff_eq!(max_x, 13469658.386, epsilon = 1e-2);

        let read_back = load_geojson(&geofile_filepath).unwrap();
        assert_eq!(read_back.crs(), collection.crs());
        assert_eq!(read_back.features(), collection.features());
        let names: Vec<&String> = read_back.get(0).unwrap().attributes.keys().collect();
        assert_eq!(names, ["name", "population"]);
    }

    #[test]
    fn test_wgs84_is_written_as_crs84() {
        let collection = parse_geojson(POLYGON_WITHOUT_CRS)
            .unwrap()
            .set_crs(Crs::Wgs84)
            .unwrap();
        let written: Value = serde_json::from_str(&to_geojson(&collection).to_string()).unwrap();
        assert_eq!(
            written["crs"]["properties"]["name"],
            json!("urn:ogc:def:crs:OGC:1.3:CRS84")
        );
        assert_eq!(written["bbox"], json!([120.0, 15.0, 121.0, 16.0]));
        assert_eq!(
            parse_geojson(&written.to_string()).unwrap().crs(),
            CrsState::Assigned(Crs::Wgs84)
        );
    }

    #[test]
    fn test_load_crs_outside_catalogue() {
        let contents = POLYGON_WITHOUT_CRS.replacen(
            "\"features\"",
            "\"crs\": {\"type\": \"name\", \"properties\": {\"name\": \"urn:ogc:def:crs:EPSG::2154\"}}, \"features\"",
            1,
        );
        let test_dir = testdir!();
        let geofile_filepath = test_dir.join("lambert_93.geojson");
        fs::write(&geofile_filepath, contents).unwrap();

        let collection = load_geojson(&geofile_filepath).unwrap();
        let lambert_93 = Crs::Other {
            code: 2154,
            units: Units::Unknown,
        };
        assert_eq!(collection.crs(), CrsState::Assigned(lambert_93));
        assert!(matches!(
            collection.area().warning,
            Some(UnitMismatchWarning::UnknownUnits { .. })
        ));

        let written: Value = serde_json::from_str(&to_geojson(&collection).to_string()).unwrap();
        assert_eq!(
            written["crs"]["properties"]["name"],
            json!("urn:ogc:def:crs:EPSG::2154")
        );
    }

    #[test]
    fn test_undefined_crs_is_not_written() {
        let collection = parse_geojson(POLYGON_WITHOUT_CRS).unwrap();
        let written = to_geojson(&collection).to_string();
        let written: Value = serde_json::from_str(&written).unwrap();
        assert!(written.get("crs").is_none());
        assert!(parse_geojson(&written.to_string()).unwrap().crs().is_undefined());
    }
}
