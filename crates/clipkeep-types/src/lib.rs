//! Shared types for clipkeep.
//!
//! This crate contains the types shared across the clipkeep workspace:
//! history items, item identity, and asset references into the on-disk
//! blob cache.

pub mod asset;
pub mod item;

pub use asset::AssetRef;
pub use item::{ClipboardItem, ItemId, ItemKind};
