//! History item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::AssetRef;

/// Unique identifier for a history item.
///
/// Immutable for the lifetime of the item; survives persistence round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a new random item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an item ID from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content a history item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Plain UTF-8 text.
    Text,
    /// A bitmap, stored in the asset cache.
    Image,
    /// A file reference; `content` holds the path.
    File,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::File => write!(f, "file"),
        }
    }
}

/// One entry in the clipboard history.
///
/// `id` and `kind` never change after construction. Link-preview fields
/// (`title`, `description`, `preview_asset`, `enrichment_pending`) are the
/// only fields mutated in place, by the enrichment pipeline writing back
/// through the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardItem {
    pub id: ItemId,
    pub copied_at: DateTime<Utc>,
    pub kind: ItemKind,
    /// Text payload, or the path string for file references. Empty for images.
    pub content: String,
    /// Cached bitmap blob for image items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_asset: Option<AssetRef>,
    #[serde(default)]
    pub is_link: bool,
    #[serde(default)]
    pub enrichment_pending: bool,
}

impl ClipboardItem {
    /// Create a text item. Link classification is the watcher's job; callers
    /// pass the result in so the pending flag is set before first insert.
    #[must_use]
    pub fn text(content: String, is_link: bool, enrichment_pending: bool) -> Self {
        Self {
            id: ItemId::new(),
            copied_at: Utc::now(),
            kind: ItemKind::Text,
            content,
            asset: None,
            file_size: None,
            width: None,
            height: None,
            title: None,
            description: None,
            preview_asset: None,
            is_link,
            enrichment_pending,
        }
    }

    /// Create an image item referencing a cached blob.
    #[must_use]
    pub fn image(asset: Option<AssetRef>, width: u32, height: u32, byte_len: u64) -> Self {
        Self {
            id: ItemId::new(),
            copied_at: Utc::now(),
            kind: ItemKind::Image,
            content: String::new(),
            asset,
            file_size: Some(byte_len),
            width: Some(width),
            height: Some(height),
            title: None,
            description: None,
            preview_asset: None,
            is_link: false,
            enrichment_pending: false,
        }
    }

    /// Create a file-reference item.
    #[must_use]
    pub fn file(path: String, file_size: Option<u64>) -> Self {
        Self {
            id: ItemId::new(),
            copied_at: Utc::now(),
            kind: ItemKind::File,
            content: path,
            asset: None,
            file_size,
            width: None,
            height: None,
            title: None,
            description: None,
            preview_asset: None,
            is_link: false,
            enrichment_pending: false,
        }
    }

    /// Dedupe key for this item, or `None` for kinds that never dedupe.
    ///
    /// Two live items may not share a key; image items are exempt because
    /// comparing bitmaps byte-for-byte is not worth the read-back.
    #[must_use]
    pub fn dedupe_key(&self) -> Option<(ItemKind, &str)> {
        match self.kind {
            ItemKind::Image => None,
            ItemKind::Text | ItemKind::File => Some((self.kind, self.content.as_str())),
        }
    }

    /// All asset references this item owns.
    #[must_use]
    pub fn owned_assets(&self) -> Vec<&AssetRef> {
        self.asset.iter().chain(self.preview_asset.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn item_id_display() {
        let id = ItemId::new();
        let s = id.to_string();
        // UUID v4 format: 8-4-4-4-12
        assert_eq!(s.len(), 36);
    }

    #[test]
    fn text_item_serde_roundtrip() {
        let item = ClipboardItem::text("https://example.com/page".to_string(), true, true);
        let json = serde_json::to_string(&item).unwrap();
        let decoded: ClipboardItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, decoded);
        assert!(decoded.is_link);
        assert!(decoded.enrichment_pending);
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let item = ClipboardItem::text("plain".to_string(), false, false);
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("preview_asset"));
    }

    #[test]
    fn dedupe_key_matches_kind_and_content() {
        let a = ClipboardItem::text("same".to_string(), false, false);
        let b = ClipboardItem::text("same".to_string(), false, false);
        assert_eq!(a.dedupe_key(), b.dedupe_key());

        let f = ClipboardItem::file("same".to_string(), None);
        assert_ne!(a.dedupe_key(), f.dedupe_key());
    }

    #[test]
    fn image_items_never_dedupe() {
        let img = ClipboardItem::image(None, 2, 2, 16);
        assert_eq!(img.dedupe_key(), None);
    }

    #[test]
    fn owned_assets_lists_both_refs() {
        let id = ItemId::new();
        let mut item = ClipboardItem::image(Some(AssetRef::primary(id)), 1, 1, 4);
        assert_eq!(item.owned_assets().len(), 1);
        item.preview_asset = Some(AssetRef::preview(id));
        assert_eq!(item.owned_assets().len(), 2);
    }
}
