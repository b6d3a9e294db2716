//! Command implementations for the qshield CLI.

pub mod patterns;
pub mod redact;

use log::{debug, warn};
use std::path::{Path, PathBuf};

use qshield_core::{AppConfig, RedactionShield};

/// `<config dir>/qshield/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qshield").join("config.yaml"))
}

/// Loads the configuration from `explicit`, or from the default location
/// when that file exists.
///
/// A configuration that cannot be loaded is logged and ignored so that
/// redaction still runs with the built-in patterns.
pub fn load_config(explicit: Option<&Path>) -> Option<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path().filter(|p| p.is_file())?;
            debug!("Using default configuration at {}", path.display());
            path
        }
    };
    match AppConfig::load_from_file(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring configuration {}: {:#}", path.display(), e);
            None
        }
    }
}

/// Builds the shield for this run.
pub fn build_shield(config: Option<&AppConfig>) -> RedactionShield {
    match config {
        Some(config) => RedactionShield::with_config(None, config),
        None => RedactionShield::with_config(None, &AppConfig::default()),
    }
}
