//! Daemon errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("clipboard error: {0}")]
    Clipboard(#[from] clipkeep_clipboard::ClipboardError),

    #[error("storage error: {0}")]
    Store(#[from] clipkeep_store::StoreError),

    #[error("enrichment error: {0}")]
    Enrich(#[from] clipkeep_enrich::EnrichError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
