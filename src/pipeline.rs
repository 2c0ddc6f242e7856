use anyhow::Context;

use crate::config::{Config, TargetCrsConfig};
use crate::crs::crs_def::Crs;
use crate::geofile::geojson::{load_geojson, save_geojson};
use crate::store::collection::FeatureCollection;

/// Run the load, relabel, reproject, measure and save steps described by `config`. Returns the
/// final collection.
pub fn run(config: &Config) -> anyhow::Result<FeatureCollection> {
    let mut collection = load_geojson(&config.input_filepath)
        .with_context(|| format!("Loading {:?}", config.input_filepath))?;

    if let Some(assign_crs) = &config.assign_crs {
        let mut crs: Crs = assign_crs.parse()?;
        if let Some(units) = config.assign_units {
            crs = crs.with_units(units);
        }
        collection = collection.set_crs(crs)?;
    }
    log::info!("{}", collection.summary());

    if let Some(target) = &config.target {
        let target_crs = match target {
            TargetCrsConfig::Code(code) => code.parse::<Crs>()?,
            TargetCrsConfig::EstimatedUtm => {
                let utm = collection
                    .estimate_utm_crs()
                    .context("Estimating UTM zone")?;
                log::info!("Estimated UTM CRS {}", utm);
                utm
            }
        };
        log::info!("Reprojecting to {}", target_crs);
        collection = collection
            .reproject(target_crs)
            .with_context(|| format!("Reprojecting to {}", target_crs))?;
    }

    if let Some(area_attribute) = &config.area_attribute {
        let area = collection.area();
        log::info!(
            "Total area {} in {} units",
            area.total(),
            collection
                .crs()
                .crs()
                .map_or("unknown", |crs| crs.units().name())
        );
        let values = area.values.into_iter().map(serde_json::Value::from).collect();
        collection = collection.with_attribute(area_attribute, values)?;
    }

    if let Some(output_filepath) = &config.output_filepath {
        save_geojson(&collection, output_filepath)
            .with_context(|| format!("Writing {:?}", output_filepath))?;
    }
    Ok(collection)
}
