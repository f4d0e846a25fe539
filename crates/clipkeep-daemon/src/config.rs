//! Daemon configuration loaded from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// History capacity and polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of items kept; the oldest is evicted beyond this.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Pasteboard poll interval. Detection latency is bounded by this;
    /// changes that come and go within one interval are not observed.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Link-preview enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_timeout_secs: default_page_timeout_secs(),
            image_timeout_secs: default_image_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// On-disk layout settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory holding the history file and asset
    /// cache. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_max_items() -> usize {
    200
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_page_timeout_secs() -> u64 {
    8
}

fn default_image_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("clipkeep/{} (+link previews)", env!("CARGO_PKG_VERSION"))
}
