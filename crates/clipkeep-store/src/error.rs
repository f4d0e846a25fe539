//! Storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file corrupt: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
