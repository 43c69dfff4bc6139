//! Subcommands of the `alarmfax` binary.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use tracing::debug;

use alarmfax_core::models::config::AlarmFaxConfig;
use alarmfax_core::models::fields::{Field, FieldMap};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alarmfax")
        .join("config.json")
}

/// The `--config` path if given, the default path otherwise.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration from an explicit path, the default path, or defaults.
///
/// An explicit path must exist; a missing default file means defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AlarmFaxConfig> {
    if let Some(path) = config_path {
        return Ok(AlarmFaxConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(AlarmFaxConfig::from_file(&default_path)?)
    } else {
        Ok(AlarmFaxConfig::default())
    }
}

/// Diagnostic text if the extraction failed.
pub fn failure(fields: &FieldMap) -> Option<&str> {
    fields.get(Field::Log.key()).map(String::as_str)
}
