//! Mock fetcher for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::EnrichError;
use crate::fetch::Fetcher;

/// Scripted in-memory fetcher.
///
/// Maps URLs to canned responses and can delay every fetch, which is how the
/// eviction-during-enrichment race is exercised in tests.
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    delay: Option<Duration>,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch by `delay` before responding.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Script a response body for a URL.
    pub fn respond(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, EnrichError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let body = self.responses.lock().unwrap().get(url).cloned();
        body.ok_or_else(|| EnrichError::Other(anyhow::anyhow!("no scripted response for {url}")))
    }
}
