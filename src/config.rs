use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cleaning::CleaningPolicy;
use crate::error::{InsightsError, Result};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_PATH_ENV: &str = "AIRBNB_INSIGHTS_CONFIG";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_input: PathBuf,
    pub cleaned_output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_input: PathBuf::from("data/raw_airbnb.csv"),
            cleaned_output: PathBuf::from("data/cleaned_airbnb.csv"),
        }
    }
}

/// File-level configuration. Every key is optional.
///
/// ```toml
/// [paths]
/// raw_input = "data/raw_airbnb.csv"
/// cleaned_output = "data/cleaned_airbnb.csv"
///
/// [cleaning.host_types]
/// professional_min = 5
/// big_company_min = 100
///
/// [cleaning.missing]
/// bedrooms = { strategy = "median", fallback = 1.0 }
/// review_scores_rating = { strategy = "keep" }
///
/// [cleaning.outliers]
/// price = 1500.0
/// ```
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub cleaning: CleaningPolicy,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| InsightsError::Config(e.to_string()))
    }
}

pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|e| InsightsError::io(path, e))?;
    let config = Config::from_toml_str(&text)?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Read the config file if one was named, defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => read_config(p),
        None => Ok(Config::default()),
    }
}
