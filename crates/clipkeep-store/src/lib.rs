//! Clipboard history storage for clipkeep.
//!
//! Three layers, leaf-first: [`AssetCache`] holds binary blobs on disk,
//! [`HistoryFile`] serializes the full item list as a single snapshot file,
//! and [`HistoryStore`] owns the bounded, deduplicated, most-recent-first
//! collection and is the single point of mutation.

pub mod assets;
pub mod error;
pub mod history;
pub mod persist;

pub use assets::AssetCache;
pub use error::StoreError;
pub use history::HistoryStore;
pub use persist::HistoryFile;
