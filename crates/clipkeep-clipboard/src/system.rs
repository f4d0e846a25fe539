//! System pasteboard backend built on arboard.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use image::ImageEncoder;

use crate::error::ClipboardError;
use crate::{ClipboardProvider, PasteboardContents};

/// System pasteboard via the arboard crate.
///
/// arboard exposes no native change counter, so `change_token` reports a
/// fingerprint of the current contents instead. It changes whenever the
/// observable content changes, which is all the watcher needs; it is not
/// monotonic across unrelated writes that happen to collide, an acceptable
/// trade for a portable backend.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Open the system pasteboard.
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(|_| ClipboardError::Unavailable)?;
        Ok(Self { inner })
    }

    fn snapshot(&mut self) -> PasteboardContents {
        let file_path = self
            .inner
            .get()
            .file_list()
            .ok()
            .and_then(|paths| paths.into_iter().next())
            .map(|p| p.to_string_lossy().into_owned());

        let image = self.inner.get_image().ok().and_then(|data| {
            encode_png(&data.bytes, data.width as u32, data.height as u32).ok()
        });

        let text = self.inner.get_text().ok();

        PasteboardContents {
            file_path,
            image,
            text,
        }
    }
}

#[async_trait]
impl ClipboardProvider for SystemClipboard {
    async fn change_token(&mut self) -> Result<u64, ClipboardError> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        if let Ok(text) = self.inner.get_text() {
            text.hash(&mut hasher);
        }
        if let Ok(data) = self.inner.get_image() {
            // Full-bitmap hashing would be O(megabytes) per tick; the
            // dimensions plus edge samples are enough to tell images apart.
            data.width.hash(&mut hasher);
            data.height.hash(&mut hasher);
            data.bytes.len().hash(&mut hasher);
            let head = data.bytes.len().min(1024);
            data.bytes[..head].hash(&mut hasher);
            data.bytes[data.bytes.len() - head..].hash(&mut hasher);
        }
        if let Ok(paths) = self.inner.get().file_list() {
            paths.hash(&mut hasher);
        }
        Ok(hasher.finish())
    }

    async fn read(&mut self) -> Result<PasteboardContents, ClipboardError> {
        Ok(self.snapshot())
    }

    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }

    async fn write_image(&mut self, encoded: &[u8]) -> Result<(), ClipboardError> {
        let decoded = image::load_from_memory(encoded)
            .map_err(|e| ClipboardError::BadImage(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        self.inner
            .set_image(arboard::ImageData {
                width: width as usize,
                height: height as usize,
                bytes: Cow::Owned(decoded.into_raw()),
            })
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Encode raw RGBA pixels as PNG.
fn encode_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ClipboardError> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| ClipboardError::BadImage(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_png_roundtrips_through_decoder() {
        let rgba = vec![255u8; 4 * 4];
        let png = encode_png(&rgba, 2, 2).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
    }
}
