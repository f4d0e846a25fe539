//! References into the on-disk asset cache.

use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// Opaque reference to a blob in the asset cache.
///
/// The name is derived from the owning item's id, with a suffix
/// distinguishing the preview thumbnail from the primary bitmap, so a ref
/// can never collide across items and cleanup needs no index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Reference for an item's primary bitmap.
    #[must_use]
    pub fn primary(id: ItemId) -> Self {
        Self(format!("{id}.png"))
    }

    /// Reference for an item's link-preview thumbnail.
    #[must_use]
    pub fn preview(id: ItemId) -> Self {
        Self(format!("{id}-preview.png"))
    }

    /// File name of the blob inside the cache directory.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_and_preview_differ() {
        let id = ItemId::new();
        assert_ne!(AssetRef::primary(id), AssetRef::preview(id));
    }

    #[test]
    fn refs_embed_item_id() {
        let id = ItemId::new();
        assert!(AssetRef::preview(id).file_name().contains(&id.to_string()));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ItemId::new();
        let json = serde_json::to_string(&AssetRef::primary(id)).unwrap();
        assert_eq!(json, format!("\"{id}.png\""));
    }
}
