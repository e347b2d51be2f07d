//! Configuration loading from file system
//!
//! Handles loading and parsing the config.json file.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::DrillConfig;
use crate::error::Result;

/// Load configuration from ~/.shortcut-drill/config.json
///
/// Returns `DrillConfig::default()` if the file is missing or invalid.
#[instrument(name = "load_config")]
pub fn load_config() -> DrillConfig {
    let config_path = PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref());

    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return DrillConfig::default();
    }

    match read_config(&config_path) {
        Ok(config) => {
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(
                path = %config_path.display(),
                error = %e,
                "Failed to load config, using defaults"
            );
            DrillConfig::default()
        }
    }
}

/// Read and parse a config file, surfacing any failure.
pub fn read_config(path: &Path) -> Result<DrillConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: DrillConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
