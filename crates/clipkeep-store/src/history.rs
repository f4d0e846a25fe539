//! The bounded, deduplicated history collection.

use clipkeep_types::{ClipboardItem, ItemId};
use tracing::{debug, info, warn};

use crate::assets::AssetCache;
use crate::persist::HistoryFile;

/// Single owner of the in-memory item list and the persisted snapshot.
///
/// All mutation goes through this type, and callers must keep it behind one
/// logical writer (the daemon loop owns it exclusively). Invariants held
/// here:
///
/// - at most `max_items` items, oldest evicted from the tail;
/// - at most one live text/file item per `(kind, content)` pair;
/// - order is strictly most-recent-first;
/// - every asset ref on a live item was handed to the cache before the item
///   arrived, and is released exactly once when the item is destroyed.
///
/// Persist failures are logged, never propagated: the in-memory state stays
/// authoritative and the next mutation rewrites the whole snapshot anyway.
pub struct HistoryStore {
    items: Vec<ClipboardItem>,
    max_items: usize,
    assets: AssetCache,
    file: HistoryFile,
}

impl HistoryStore {
    /// Open the store, reading the persisted snapshot once.
    ///
    /// A corrupt snapshot degrades to an empty history with a warning; it
    /// does not abort startup.
    #[must_use]
    pub fn open(assets: AssetCache, file: HistoryFile, max_items: usize) -> Self {
        let mut items = match file.load() {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "failed to load history, starting empty");
                Vec::new()
            }
        };
        if items.len() > max_items {
            // Capacity may have been lowered since the snapshot was written.
            items.truncate(max_items);
        }
        info!(items = items.len(), max_items, "history loaded");
        Self {
            items,
            max_items,
            assets,
            file,
        }
    }

    /// Insert at the head, deduplicating text/file content and evicting the
    /// tail beyond capacity.
    pub fn insert(&mut self, item: ClipboardItem) {
        if let Some(key) = item.dedupe_key() {
            let existing = self
                .items
                .iter()
                .position(|other| other.dedupe_key() == Some(key));
            if let Some(pos) = existing {
                let old = self.items.remove(pos);
                debug!(id = %old.id, "replacing duplicate entry");
                self.release_assets(&old);
            }
        }

        debug!(id = %item.id, kind = %item.kind, "inserting item");
        self.items.insert(0, item);

        while self.items.len() > self.max_items {
            if let Some(evicted) = self.items.pop() {
                debug!(id = %evicted.id, "evicting oldest item");
                self.release_assets(&evicted);
            }
        }

        self.persist_logged();
    }

    /// Apply a field-level mutation to the item with `id`, if it is still
    /// present. Returns whether it was.
    ///
    /// A `false` return is the race-safety contract: enrichment results for
    /// an already-evicted item land here and are silently dropped.
    pub fn update(&mut self, id: ItemId, mutate: impl FnOnce(&mut ClipboardItem)) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        mutate(item);
        self.persist_logged();
        true
    }

    /// Remove one item and release its assets. Returns whether it existed.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        let removed = self.items.remove(pos);
        self.release_assets(&removed);
        self.persist_logged();
        true
    }

    /// Drop every item, releasing all assets.
    pub fn clear(&mut self) {
        info!(items = self.items.len(), "clearing history");
        for item in std::mem::take(&mut self.items) {
            self.release_assets(&item);
        }
        self.persist_logged();
    }

    /// Read-only view in most-recent-first order.
    #[must_use]
    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    /// Owned copy of the current list, for publishing to readers.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ClipboardItem> {
        self.items.clone()
    }

    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<&ClipboardItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The blob cache backing this store's items.
    #[must_use]
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    fn release_assets(&self, item: &ClipboardItem) {
        for asset in item.owned_assets() {
            self.assets.delete(asset);
        }
    }

    fn persist_logged(&self) {
        if let Err(e) = self.file.save(&self.items) {
            warn!(error = %e, "failed to persist history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipkeep_types::AssetRef;

    fn store(dir: &std::path::Path, max_items: usize) -> HistoryStore {
        HistoryStore::open(
            AssetCache::new(dir.join("assets")),
            HistoryFile::new(dir.join("history.json")),
            max_items,
        )
    }

    fn text(content: &str) -> ClipboardItem {
        ClipboardItem::text(content.to_string(), false, false)
    }

    #[test]
    fn newest_first_and_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 3);

        for n in 0..5 {
            store.insert(text(&format!("item {n}")));
        }

        assert_eq!(store.len(), 3);
        assert_eq!(store.items()[0].content, "item 4");
        assert_eq!(store.items()[2].content, "item 2");
    }

    #[test]
    fn duplicate_text_moves_to_head() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);

        store.insert(text("first"));
        store.insert(text("second"));
        store.insert(text("first"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[0].content, "first");
        assert_eq!(store.items()[1].content, "second");
    }

    #[test]
    fn dedupe_is_per_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);

        store.insert(text("/tmp/x"));
        store.insert(ClipboardItem::file("/tmp/x".to_string(), None));

        // Same content, different kind: both live.
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn images_never_dedupe() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);

        store.insert(ClipboardItem::image(None, 1, 1, 4));
        store.insert(ClipboardItem::image(None, 1, 1, 4));

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn dedupe_replacement_releases_old_assets() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);

        let mut old = ClipboardItem::text("https://example.com".to_string(), true, false);
        let preview = AssetRef::preview(old.id);
        store.assets().store(&preview, b"thumb").unwrap();
        old.preview_asset = Some(preview.clone());
        store.insert(old);

        store.insert(ClipboardItem::text(
            "https://example.com".to_string(),
            true,
            true,
        ));

        assert_eq!(store.len(), 1);
        assert!(!store.assets().path_of(&preview).exists());
    }

    #[test]
    fn eviction_releases_assets() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 1);

        let mut img = ClipboardItem::image(None, 1, 1, 4);
        let asset = AssetRef::primary(img.id);
        store.assets().store(&asset, b"png").unwrap();
        img.asset = Some(asset.clone());
        store.insert(img);

        store.insert(text("pushes the image out"));

        assert_eq!(store.len(), 1);
        assert!(!store.assets().path_of(&asset).exists());
    }

    #[test]
    fn update_for_absent_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);
        store.insert(text("only"));
        let before = store.snapshot();

        let applied = store.update(ItemId::new(), |item| {
            item.title = Some("never applied".to_string());
        });

        assert!(!applied);
        assert_eq!(store.snapshot(), before);

        // Persisted content unchanged as well.
        let reloaded = HistoryFile::new(dir.path().join("history.json"))
            .load()
            .unwrap();
        assert_eq!(reloaded, before);
    }

    #[test]
    fn update_persists_applied_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);
        let item = ClipboardItem::text("https://example.com".to_string(), true, true);
        let id = item.id;
        store.insert(item);

        let applied = store.update(id, |item| {
            item.title = Some("Example".to_string());
            item.enrichment_pending = false;
        });
        assert!(applied);

        let reloaded = HistoryFile::new(dir.path().join("history.json"))
            .load()
            .unwrap();
        assert_eq!(reloaded[0].title.as_deref(), Some("Example"));
        assert!(!reloaded[0].enrichment_pending);
    }

    #[test]
    fn clear_leaves_no_assets_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);

        for _ in 0..3 {
            let mut img = ClipboardItem::image(None, 1, 1, 4);
            let asset = AssetRef::primary(img.id);
            store.assets().store(&asset, b"png").unwrap();
            img.asset = Some(asset);
            store.insert(img);
        }

        store.clear();
        assert!(store.is_empty());

        let remaining: Vec<_> = std::fs::read_dir(store.assets().dir())
            .map(|entries| entries.filter_map(Result::ok).collect())
            .unwrap_or_default();
        assert!(remaining.is_empty());

        let reloaded = HistoryFile::new(dir.path().join("history.json"))
            .load()
            .unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn remove_single_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path(), 10);
        store.insert(text("keep"));
        let victim = text("drop");
        let id = victim.id;
        store.insert(victim);

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].content, "keep");
    }

    #[test]
    fn reopen_restores_persisted_items() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store(dir.path(), 10);
            store.insert(text("survives restart"));
        }
        let reopened = store(dir.path(), 10);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.items()[0].content, "survives restart");
    }

    #[test]
    fn reopen_truncates_to_lowered_capacity() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store(dir.path(), 10);
            for n in 0..5 {
                store.insert(text(&format!("item {n}")));
            }
        }
        let reopened = store(dir.path(), 2);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.items()[0].content, "item 4");
    }
}
