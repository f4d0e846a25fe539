//! Link-preview enrichment for clipkeep.
//!
//! Classifies copied text as web links, and for each link item spawns an
//! independent fetch task that scrapes Open Graph metadata and an optional
//! preview image. Results flow back to the daemon over a channel; the task
//! never touches the history store directly, so an item evicted mid-fetch
//! simply makes the eventual write-back a no-op.

pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pipeline;

pub use classify::is_http_link;
pub use error::EnrichError;
pub use extract::{extract_preview, PagePreview};
pub use fetch::{Fetcher, HttpFetcher};
pub use pipeline::{EnrichmentOutcome, EnrichmentPipeline};
