//! Page and image fetching.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::EnrichError;

/// Network seam for the enrichment pipeline.
///
/// One implementation talks HTTP; tests swap in a scripted mock.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetch `url` with the given overall timeout, returning the body bytes.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, EnrichError>;
}

/// reqwest-backed fetcher with a fixed descriptive user agent.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher announcing `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, EnrichError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
