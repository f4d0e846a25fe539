//! History snapshot persistence.

use std::path::PathBuf;

use clipkeep_types::ClipboardItem;
use tracing::debug;

use crate::error::StoreError;

/// The single JSON file holding the ordered item list.
///
/// Every mutation rewrites the whole snapshot; the write goes to a sibling
/// temp file first and is renamed into place so a crash mid-write leaves the
/// previous snapshot intact. O(current size) per write is fine for the
/// bounded history this backs.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the snapshot. A missing file is an empty history, not an error.
    pub fn load(&self) -> Result<Vec<ClipboardItem>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let items = serde_json::from_slice(&bytes)?;
        Ok(items)
    }

    /// Write the full ordered snapshot.
    pub fn save(&self, items: &[ClipboardItem]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), items = items.len(), "persisted history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipkeep_types::{AssetRef, ClipboardItem};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = HistoryFile::new(dir.path().join("history.json"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn save_load_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let file = HistoryFile::new(dir.path().join("history.json"));

        let mut link = ClipboardItem::text("https://example.com".to_string(), true, false);
        link.title = Some("Example".to_string());
        link.preview_asset = Some(AssetRef::preview(link.id));
        let items = vec![
            link,
            ClipboardItem::file("/tmp/report.pdf".to_string(), Some(1234)),
            ClipboardItem::text("plain".to_string(), false, false),
        ];

        file.save(&items).unwrap();
        let loaded = file.load().unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = HistoryFile::new(dir.path().join("data").join("history.json"));
        file.save(&[]).unwrap();
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, b"not json").unwrap();
        let file = HistoryFile::new(path);
        assert!(matches!(file.load(), Err(StoreError::Serialize(_))));
    }
}
