//! Pasteboard subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("pasteboard not available on this platform")]
    Unavailable,

    #[error("failed to read pasteboard: {0}")]
    Read(String),

    #[error("failed to write pasteboard: {0}")]
    Write(String),

    #[error("pasteboard held an undecodable bitmap: {0}")]
    BadImage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
