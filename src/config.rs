use std::{fs::read_to_string, path::Path, path::PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::crs::crs_def::Units;

/// CRS to reproject into.
#[derive(Deserialize, Debug, PartialEq)]
pub enum TargetCrsConfig {
    /// An identifier such as "EPSG:3857".
    Code(String),
    /// The WGS 84 UTM zone containing the data.
    EstimatedUtm,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    pub input_filepath: PathBuf,
    /// CRS to assign when the input has none. An input that already declares a different CRS is
    /// rejected rather than relabelled.
    #[serde(default)]
    pub assign_crs: Option<String>,
    /// Units of an assigned CRS outside the built-in catalogue, "meters" or "degrees".
    #[serde(default)]
    pub assign_units: Option<Units>,
    #[serde(default)]
    pub target: Option<TargetCrsConfig>,
    /// Attribute to store the per-feature area in, after reprojection.
    #[serde(default)]
    pub area_attribute: Option<String>,
    #[serde(default)]
    pub output_filepath: Option<PathBuf>,
}

pub fn load_config(config_filepath: &Path) -> anyhow::Result<Config> {
    if !config_filepath.exists() {
        return Err(anyhow!("Config file {:?} not found", config_filepath));
    }
    let config_contents = read_to_string(config_filepath)
        .with_context(|| format!("Reading config file {:?}", config_filepath))?;
    let config: Config = serde_yaml::from_str(&config_contents)
        .with_context(|| format!("Parsing config file {:?}", config_filepath))?;
    Ok(config)
}
