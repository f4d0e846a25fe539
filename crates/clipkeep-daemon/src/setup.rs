//! Config loading and on-disk layout resolution.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::DaemonError;

/// Load configuration from the given path, or the default location.
pub fn load_config(path: Option<&str>) -> Result<Config, DaemonError> {
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_config_path(),
    };

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| DaemonError::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DaemonError::Config(format!("failed to parse config: {e}")))?;
        info!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else {
        info!("no config file found, using defaults");
        Ok(Config::default())
    }
}

/// Default config file location: `<config dir>/clipkeep/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipkeep")
        .join("config.toml")
}

/// Resolve the data directory, honoring the config override.
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    config.storage.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clipkeep")
    })
}

/// Path of the history snapshot file inside the data directory.
#[must_use]
pub fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join("history.json")
}

/// Path of the asset cache directory inside the data directory.
#[must_use]
pub fn assets_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("assets")
}
