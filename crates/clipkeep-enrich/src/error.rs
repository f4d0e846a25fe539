//! Enrichment errors.
//!
//! All of these resolve to the terminal failed state for the item being
//! enriched; none is surfaced as a user-visible error and none is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
