//! Pasteboard polling and item construction.

use clipkeep_clipboard::{ClipboardError, ClipboardProvider, PasteboardContents};
use clipkeep_enrich::is_http_link;
use clipkeep_store::AssetCache;
use clipkeep_types::{AssetRef, ClipboardItem, ItemKind};
use tracing::{debug, warn};

/// Polls the pasteboard and turns changes into candidate history items.
///
/// Bounded work per tick: the change token is compared first and nothing
/// else happens when it is unchanged. When it has changed, exactly one item
/// is built from the highest-priority representation present (file
/// reference, then image, then text); the rest are ignored. Changes that
/// come and go between two ticks are not observed.
pub struct PasteboardWatcher {
    clipboard: Box<dyn ClipboardProvider>,
    assets: AssetCache,
    last_token: Option<u64>,
    enrichment_enabled: bool,
}

impl PasteboardWatcher {
    #[must_use]
    pub fn new(
        clipboard: Box<dyn ClipboardProvider>,
        assets: AssetCache,
        enrichment_enabled: bool,
    ) -> Self {
        Self {
            clipboard,
            assets,
            last_token: None,
            enrichment_enabled,
        }
    }

    /// One poll tick. `Ok(None)` when nothing changed or nothing usable is
    /// on the board; errors mean "skip this tick", never "stop polling".
    ///
    /// The very first tick only records the baseline token, so whatever sat
    /// on the pasteboard before startup is not re-ingested.
    pub async fn poll(&mut self) -> Result<Option<ClipboardItem>, ClipboardError> {
        let token = self.clipboard.change_token().await?;
        if self.last_token == Some(token) {
            return Ok(None);
        }
        if self.last_token.is_none() {
            self.last_token = Some(token);
            debug!(token, "recorded pasteboard baseline");
            return Ok(None);
        }

        // Commit the token only after a successful read, so a failed read
        // is retried on the next tick.
        let contents = self.clipboard.read().await?;
        self.last_token = Some(token);
        Ok(self.build_item(contents))
    }

    /// Write an item's content back to the pasteboard.
    ///
    /// The change token the write produces is absorbed as the new baseline
    /// so the next tick does not capture our own write (image items would
    /// duplicate, as they never dedupe).
    pub async fn copy_item(&mut self, item: &ClipboardItem) -> Result<(), ClipboardError> {
        match item.kind {
            ItemKind::Text | ItemKind::File => {
                self.clipboard.write_text(&item.content).await?;
            }
            ItemKind::Image => {
                let Some(asset) = &item.asset else {
                    return Err(ClipboardError::Write(
                        "image item has no cached bitmap".to_string(),
                    ));
                };
                let bytes = self
                    .assets
                    .load(asset)
                    .map_err(|e| ClipboardError::Write(e.to_string()))?;
                self.clipboard.write_image(&bytes).await?;
            }
        }
        self.last_token = Some(self.clipboard.change_token().await?);
        Ok(())
    }

    fn build_item(&self, contents: PasteboardContents) -> Option<ClipboardItem> {
        if let Some(path) = contents.file_path {
            let file_size = std::fs::metadata(&path).ok().map(|m| m.len());
            return Some(ClipboardItem::file(path, file_size));
        }

        if let Some(bytes) = contents.image {
            return self.build_image_item(&bytes);
        }

        if let Some(text) = contents.text {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            let is_link = is_http_link(trimmed);
            return Some(ClipboardItem::text(
                trimmed.to_string(),
                is_link,
                is_link && self.enrichment_enabled,
            ));
        }

        None
    }

    /// Validate and cache the bitmap before the item exists anywhere, so a
    /// live item never references a blob that was not written.
    fn build_image_item(&self, bytes: &[u8]) -> Option<ClipboardItem> {
        let decoded = match image::load_from_memory(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "pasteboard bitmap does not decode, skipping");
                return None;
            }
        };

        let mut item =
            ClipboardItem::image(None, decoded.width(), decoded.height(), bytes.len() as u64);
        let asset = AssetRef::primary(item.id);
        match self.assets.store(&asset, bytes) {
            Ok(()) => item.asset = Some(asset),
            Err(e) => {
                // Item is still recorded, just without the blob.
                warn!(error = %e, "failed to cache bitmap");
            }
        }
        Some(item)
    }
}
