//! Pasteboard access for clipkeep.
//!
//! Defines the [`ClipboardProvider`] trait the watcher polls against.
//! The `system` feature supplies an arboard-backed implementation; the
//! `mock` feature supplies a scriptable in-memory one for tests.

use async_trait::async_trait;

pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
#[cfg(feature = "system")]
pub mod system;

pub use error::ClipboardError;

/// A snapshot of the representations currently on the pasteboard.
///
/// More than one may be populated at once; consumers pick by priority
/// (file reference, then image, then text).
#[derive(Debug, Clone, Default)]
pub struct PasteboardContents {
    /// Path of a copied file reference.
    pub file_path: Option<String>,
    /// Encoded bitmap bytes (PNG on the wire for all current backends).
    pub image: Option<Vec<u8>>,
    /// Plain text.
    pub text: Option<String>,
}

impl PasteboardContents {
    /// Whether no representation is present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_path.is_none() && self.image.is_none() && self.text.is_none()
    }
}

/// Platform pasteboard access.
#[async_trait]
pub trait ClipboardProvider: Send + 'static {
    /// A token that increases (or at least changes) whenever the pasteboard
    /// content changes. Equal tokens mean nothing new to observe.
    async fn change_token(&mut self) -> Result<u64, ClipboardError>;

    /// Read the representations currently available.
    async fn read(&mut self) -> Result<PasteboardContents, ClipboardError>;

    /// Place plain text on the pasteboard.
    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Place an encoded bitmap on the pasteboard.
    async fn write_image(&mut self, encoded: &[u8]) -> Result<(), ClipboardError>;
}
