//! The asynchronous enrichment pipeline.

use std::sync::Arc;
use std::time::Duration;

use clipkeep_types::ItemId;
use reqwest::Url;
use tokio::sync::mpsc;
use tracing::debug;

use crate::extract::extract_preview;
use crate::fetch::Fetcher;

/// Terminal result of enriching one link item.
///
/// Always produced exactly once per scheduled item, failure or not, so the
/// receiver can clear the item's pending flag. Every field may be `None`.
#[derive(Debug)]
pub struct EnrichmentOutcome {
    pub id: ItemId,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Encoded preview image, already validated as decodable.
    pub preview_image: Option<Vec<u8>>,
}

impl EnrichmentOutcome {
    fn empty(id: ItemId) -> Self {
        Self {
            id,
            title: None,
            description: None,
            preview_image: None,
        }
    }
}

/// Spawns one fetch task per link item and reports outcomes over a channel.
///
/// The pipeline holds no reference to the history store and no handle to the
/// item beyond its id. If the item is evicted while a task is in flight, the
/// outcome is simply dropped by the receiver; there is no cancellation.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    fetcher: Arc<dyn Fetcher>,
    page_timeout: Duration,
    image_timeout: Duration,
    results: mpsc::Sender<EnrichmentOutcome>,
}

impl EnrichmentPipeline {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        page_timeout: Duration,
        image_timeout: Duration,
        results: mpsc::Sender<EnrichmentOutcome>,
    ) -> Self {
        Self {
            fetcher,
            page_timeout,
            image_timeout,
            results,
        }
    }

    /// Schedule enrichment for a link item. Returns immediately; the result
    /// arrives on the pipeline's results channel.
    pub fn schedule(&self, id: ItemId, url: String) {
        let pipeline = self.clone();
        tokio::spawn(async move {
            debug!(id = %id, url = %url, "enrichment started");
            let outcome = pipeline.enrich(id, &url).await;
            // Receiver gone means the daemon is shutting down.
            let _ = pipeline.results.send(outcome).await;
        });
    }

    async fn enrich(&self, id: ItemId, url: &str) -> EnrichmentOutcome {
        let mut outcome = EnrichmentOutcome::empty(id);

        let body = match self.fetcher.fetch(url, self.page_timeout).await {
            Ok(body) => body,
            Err(e) => {
                debug!(id = %id, error = %e, "page fetch failed");
                return outcome;
            }
        };

        let preview = extract_preview(&String::from_utf8_lossy(&body));
        outcome.title = preview.title;
        outcome.description = preview.description;

        if let Some(image_url) = preview.image_url {
            outcome.preview_image = self.fetch_preview_image(id, url, &image_url).await;
        }

        outcome
    }

    /// Fetch and validate the preview image; `None` on any failure.
    async fn fetch_preview_image(
        &self,
        id: ItemId,
        page_url: &str,
        image_url: &str,
    ) -> Option<Vec<u8>> {
        let resolved = resolve_image_url(page_url, image_url)?;
        match self.fetcher.fetch(&resolved, self.image_timeout).await {
            Ok(bytes) => {
                if image::load_from_memory(&bytes).is_ok() {
                    Some(bytes)
                } else {
                    debug!(id = %id, url = %resolved, "preview bytes not a decodable image");
                    None
                }
            }
            Err(e) => {
                debug!(id = %id, url = %resolved, error = %e, "preview fetch failed");
                None
            }
        }
    }
}

/// Resolve an `og:image` value against the page URL; most are absolute, but
/// relative ones are joined.
fn resolve_image_url(page_url: &str, image_url: &str) -> Option<String> {
    if let Ok(absolute) = Url::parse(image_url) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(page_url).ok()?;
    base.join(image_url).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;
    use image::ImageEncoder;

    fn png_1x1() -> Vec<u8> {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(&[0, 0, 0, 255], 1, 1, image::ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    fn pipeline(
        fetcher: MockFetcher,
    ) -> (EnrichmentPipeline, mpsc::Receiver<EnrichmentOutcome>) {
        let (tx, rx) = mpsc::channel(8);
        (
            EnrichmentPipeline::new(
                Arc::new(fetcher),
                Duration::from_secs(8),
                Duration::from_secs(5),
                tx,
            ),
            rx,
        )
    }

    #[tokio::test]
    async fn full_enrichment_delivers_all_fields() {
        let fetcher = MockFetcher::new();
        fetcher.respond(
            "https://example.com/page",
            r#"<meta property="og:title" content="A">
               <meta content="B" name="og:description">
               <meta property="og:image" content="https://example.com/thumb.png">"#,
        );
        fetcher.respond("https://example.com/thumb.png", png_1x1());
        let (pipeline, mut rx) = pipeline(fetcher);

        let id = ItemId::new();
        pipeline.schedule(id, "https://example.com/page".to_string());

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.id, id);
        assert_eq!(outcome.title.as_deref(), Some("A"));
        assert_eq!(outcome.description.as_deref(), Some("B"));
        assert_eq!(outcome.preview_image, Some(png_1x1()));
    }

    #[tokio::test]
    async fn fetch_failure_still_delivers_terminal_outcome() {
        let (pipeline, mut rx) = pipeline(MockFetcher::new());

        let id = ItemId::new();
        pipeline.schedule(id, "https://unreachable.invalid/".to_string());

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.id, id);
        assert!(outcome.title.is_none());
        assert!(outcome.description.is_none());
        assert!(outcome.preview_image.is_none());
    }

    #[tokio::test]
    async fn undecodable_preview_image_is_dropped() {
        let fetcher = MockFetcher::new();
        fetcher.respond(
            "https://example.com/page",
            r#"<meta property="og:title" content="A">
               <meta property="og:image" content="https://example.com/broken.png">"#,
        );
        fetcher.respond("https://example.com/broken.png", b"not an image".to_vec());
        let (pipeline, mut rx) = pipeline(fetcher);

        pipeline.schedule(ItemId::new(), "https://example.com/page".to_string());

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.title.as_deref(), Some("A"));
        assert!(outcome.preview_image.is_none());
    }

    #[tokio::test]
    async fn relative_image_url_resolves_against_page() {
        let fetcher = MockFetcher::new();
        fetcher.respond(
            "https://example.com/articles/1",
            r#"<meta property="og:image" content="/static/thumb.png">"#,
        );
        fetcher.respond("https://example.com/static/thumb.png", png_1x1());
        let (pipeline, mut rx) = pipeline(fetcher);

        pipeline.schedule(ItemId::new(), "https://example.com/articles/1".to_string());

        let outcome = rx.recv().await.unwrap();
        assert!(outcome.preview_image.is_some());
    }

    #[test]
    fn resolve_prefers_absolute_urls() {
        assert_eq!(
            resolve_image_url("https://example.com/p", "https://cdn.example.com/i.png"),
            Some("https://cdn.example.com/i.png".to_string())
        );
    }
}
