//! Configuration loading and data-root resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable consulted when no command-line path is given.
pub const DATA_ROOT_ENV: &str = "BILLDB_DATA_ROOT";

/// Data root resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`BILLDB_DATA_ROOT`)
/// 3. TOML config file (`data_root` key)
///
/// There is no compiled default: a document corpus has no OS-conventional
/// location, so an unresolvable data root is a startup error.
pub fn resolve_data_root(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_ROOT_ENV) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_root) = config.get("data_root").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(data_root));
                }
            }
        }
    }

    Err(Error::Config(format!(
        "data root not configured: pass --data-root, set {}, or add data_root to the config file",
        DATA_ROOT_ENV
    )))
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let config_path = dirs::config_dir()
        .map(|d| d.join("billdb").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}
