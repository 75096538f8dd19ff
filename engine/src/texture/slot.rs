//! Texture Slots
//!
//! Bitmaps are decoded on a background thread and handed back over a
//! channel. A slot starts `Pending` and is polled once per frame; it never
//! blocks the render loop. A load that never finishes simply stays pending.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use base64::Engine as _;
use image::RgbaImage;
use thiserror::Error;

/// Why a bitmap could not be produced.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("malformed data URL")]
    InvalidDataUrl,

    #[error("base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode: {0}")]
    Image(#[from] image::ImageError),

    #[error("no texture source")]
    Empty,
}

pub type LoadResult = Result<Arc<RgbaImage>, TextureError>;

/// Decode a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, TextureError> {
    let rest = url.strip_prefix("data:").ok_or(TextureError::InvalidDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(TextureError::InvalidDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(TextureError::InvalidDataUrl);
    }
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    decode_bytes(&bytes)
}

/// Decode encoded image bytes (PNG or JPEG).
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, TextureError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Load from a data URL or a file path.
pub fn load_source(source: &str) -> Result<RgbaImage, TextureError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(TextureError::Empty);
    }
    if source.starts_with("data:") {
        decode_data_url(source)
    } else {
        Ok(image::open(Path::new(source))?.to_rgba8())
    }
}

/// What changed when a slot was polled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotEvent {
    Loaded,
    Failed,
}

/// A bitmap that may still be loading.
#[derive(Debug)]
pub enum TextureSlot {
    Pending(Receiver<LoadResult>),
    Ready(Arc<RgbaImage>),
    Failed,
}

impl TextureSlot {
    pub fn ready(image: RgbaImage) -> Self {
        TextureSlot::Ready(Arc::new(image))
    }

    /// Decode `source` (data URL or path) in the background.
    pub fn load(source: impl Into<String>) -> Self {
        let source = source.into();
        Self::spawn(move || load_source(&source).map(Arc::new))
    }

    fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> LoadResult + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("texture-loader".to_string())
            .spawn(move || {
                let _ = tx.send(job());
            });
        match spawned {
            Ok(_) => TextureSlot::Pending(rx),
            Err(err) => {
                tracing::warn!("[TextureSlot] could not start loader thread: {}", err);
                TextureSlot::Failed
            }
        }
    }

    /// Check for a finished load without blocking.
    pub fn poll(&mut self) -> Option<SlotEvent> {
        let TextureSlot::Pending(rx) = self else {
            return None;
        };
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(TextureError::Empty),
        };
        Some(self.settle(outcome))
    }

    /// Block until the load finishes. Used by tools and tests.
    pub fn wait(&mut self) -> Option<SlotEvent> {
        let TextureSlot::Pending(rx) = self else {
            return None;
        };
        let outcome = rx.recv().unwrap_or(Err(TextureError::Empty));
        Some(self.settle(outcome))
    }

    fn settle(&mut self, outcome: LoadResult) -> SlotEvent {
        match outcome {
            Ok(image) => {
                *self = TextureSlot::Ready(image);
                SlotEvent::Loaded
            }
            Err(err) => {
                tracing::warn!("[TextureSlot] load failed: {}", err);
                *self = TextureSlot::Failed;
                SlotEvent::Failed
            }
        }
    }

    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            TextureSlot::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TextureSlot::Pending(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TextureSlot::Failed)
    }
}
