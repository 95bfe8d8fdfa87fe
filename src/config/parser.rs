use super::{EngineConfig, StorageKind};
use crate::errors::Error;
use std::fs;
use std::path::Path;

use tracing::info;

/// Loads and parses the engine configuration from a YAML or TOML file
///
/// Files ending in `.toml` are read as TOML, everything else as YAML.
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read
/// * The content cannot be parsed into an EngineConfig
/// * The parsed values are inconsistent (see [`validate`])
pub fn load_config(file_path: &Path) -> Result<EngineConfig, Error> {
    let raw = fs::read_to_string(file_path)?;
    let config: EngineConfig = match file_path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&raw)?,
        _ => serde_yaml::from_str(&raw)?,
    };
    validate(&config)?;
    info!("Loaded configuration from {}", file_path.display());
    Ok(config)
}

/// Checks constraints serde cannot express
pub fn validate(config: &EngineConfig) -> Result<(), Error> {
    if config.backfill.delay.is_zero() {
        return Err(Error::Config(
            "backfill.delay must be greater than zero to respect embedding rate limits".into(),
        ));
    }
    if config.storage.kind == StorageKind::Http && config.storage.base_url.is_none() {
        return Err(Error::Config("storage.base_url is required for http storage".into()));
    }
    if !(-1.0..=1.0).contains(&config.search.min_similarity)
        || !(-1.0..=1.0).contains(&config.search.related_min_similarity)
    {
        return Err(Error::Config("similarity thresholds must be within [-1, 1]".into()));
    }
    Ok(())
}
