//! On-disk content store for binary blobs.

use std::path::{Path, PathBuf};

use clipkeep_types::AssetRef;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Flat directory of blobs, one file per [`AssetRef`].
///
/// There is no reference counting: blobs live and die with the history item
/// whose id their name is derived from, and the [`HistoryStore`] is
/// responsible for deleting each owned ref exactly once.
///
/// [`HistoryStore`]: crate::HistoryStore
#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
}

impl AssetCache {
    /// Create a cache rooted at `dir`. The directory is created lazily on
    /// first write, not here.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path a ref resolves to inside the cache directory.
    #[must_use]
    pub fn path_of(&self, asset: &AssetRef) -> PathBuf {
        self.dir.join(asset.file_name())
    }

    /// The cache directory itself.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a blob under the given ref, creating the directory if needed.
    pub fn store(&self, asset: &AssetRef, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_of(asset);
        std::fs::write(&path, bytes)?;
        debug!(asset = %asset, len = bytes.len(), "stored blob");
        Ok(())
    }

    /// Read a blob back.
    pub fn load(&self, asset: &AssetRef) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(asset);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::AssetNotFound(asset.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal. Failure is logged and swallowed; a missing file
    /// is not a failure.
    pub fn delete(&self, asset: &AssetRef) {
        let path = self.path_of(asset);
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(asset = %asset, "deleted blob"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(asset = %asset, error = %e, "failed to delete blob"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipkeep_types::ItemId;

    #[test]
    fn store_load_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path().join("assets"));
        let asset = AssetRef::primary(ItemId::new());

        cache.store(&asset, b"blob bytes").unwrap();
        assert_eq!(cache.load(&asset).unwrap(), b"blob bytes");

        cache.delete(&asset);
        assert!(matches!(
            cache.load(&asset),
            Err(StoreError::AssetNotFound(_))
        ));
    }

    #[test]
    fn directory_created_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("assets");
        let cache = AssetCache::new(root.clone());
        assert!(!root.exists());

        cache.store(&AssetRef::primary(ItemId::new()), b"x").unwrap();
        assert!(root.exists());
    }

    #[test]
    fn delete_missing_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path().to_path_buf());
        // Must not panic or error.
        cache.delete(&AssetRef::preview(ItemId::new()));
    }
}
