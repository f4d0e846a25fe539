//! Mock pasteboard backend for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ClipboardError;
use crate::{ClipboardProvider, PasteboardContents};

#[derive(Default)]
struct MockState {
    token: u64,
    polls: u64,
    contents: PasteboardContents,
    fail_reads: bool,
}

/// Scriptable in-memory pasteboard.
///
/// Tests drive it through the [`MockClipboardHandle`] returned by
/// [`MockClipboard::new`]; every `set_*` call bumps the change token the way
/// a real pasteboard write would.
pub struct MockClipboard {
    state: Arc<Mutex<MockState>>,
}

/// Handle for scripting a [`MockClipboard`] from a test.
#[derive(Clone)]
pub struct MockClipboardHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockClipboard {
    /// Create a mock pasteboard and a handle for scripting it.
    #[must_use]
    pub fn new() -> (Self, MockClipboardHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: state.clone(),
            },
            MockClipboardHandle { state },
        )
    }
}

impl MockClipboardHandle {
    pub fn set_text(&self, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.contents = PasteboardContents {
            text: Some(text.to_string()),
            ..PasteboardContents::default()
        };
        state.token += 1;
    }

    pub fn set_image(&self, encoded: Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        state.contents = PasteboardContents {
            image: Some(encoded),
            ..PasteboardContents::default()
        };
        state.token += 1;
    }

    pub fn set_file(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        state.contents = PasteboardContents {
            file_path: Some(path.to_string()),
            ..PasteboardContents::default()
        };
        state.token += 1;
    }

    /// Put a file reference, image, and text on the board simultaneously,
    /// for exercising representation priority.
    pub fn set_all(&self, path: &str, encoded: Vec<u8>, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.contents = PasteboardContents {
            file_path: Some(path.to_string()),
            image: Some(encoded),
            text: Some(text.to_string()),
        };
        state.token += 1;
    }

    /// Make subsequent `read()` calls fail until scripted otherwise.
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Current change token, as a provider would report it.
    #[must_use]
    pub fn token(&self) -> u64 {
        self.state.lock().unwrap().token
    }

    /// Number of `change_token` reads served so far, for synchronizing
    /// tests with a poll loop (e.g. waiting out the baseline tick).
    #[must_use]
    pub fn polls(&self) -> u64 {
        self.state.lock().unwrap().polls
    }

    /// Text currently on the mock board, if any.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.state.lock().unwrap().contents.text.clone()
    }

    /// Image bytes currently on the mock board, if any.
    #[must_use]
    pub fn image(&self) -> Option<Vec<u8>> {
        self.state.lock().unwrap().contents.image.clone()
    }
}

#[async_trait]
impl ClipboardProvider for MockClipboard {
    async fn change_token(&mut self) -> Result<u64, ClipboardError> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        Ok(state.token)
    }

    async fn read(&mut self) -> Result<PasteboardContents, ClipboardError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ClipboardError::Read("scripted failure".to_string()));
        }
        Ok(state.contents.clone())
    }

    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.lock().unwrap();
        state.contents = PasteboardContents {
            text: Some(text.to_string()),
            ..PasteboardContents::default()
        };
        state.token += 1;
        Ok(())
    }

    async fn write_image(&mut self, encoded: &[u8]) -> Result<(), ClipboardError> {
        let mut state = self.state.lock().unwrap();
        state.contents = PasteboardContents {
            image: Some(encoded.to_vec()),
            ..PasteboardContents::default()
        };
        state.token += 1;
        Ok(())
    }
}
