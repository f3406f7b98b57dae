use std::fmt;
use std::sync::Arc;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use crate::error::{CanvasError, CanvasResult};

/// A whole-canvas snapshot, stored PNG-encoded.
///
/// Frames are always opaque: the background is baked in when they are
/// captured. Cloning is cheap; the encoded bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    encoded: Arc<[u8]>,
}

impl Frame {
    /// Encode an image. The encoder is deterministic, so identical pixels
    /// always give identical bytes.
    pub fn encode(image: &RgbaImage) -> CanvasResult<Self> {
        let mut bytes = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut bytes, CompressionType::Fast, FilterType::Adaptive);
        encoder
            .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
            .map_err(CanvasError::SnapshotEncode)?;
        Ok(Self::from_encoded(bytes))
    }

    /// Wrap bytes that are expected to be a PNG. They are validated when the
    /// frame is decoded, not here.
    pub fn from_encoded(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { encoded: bytes.into() }
    }

    pub fn decode(&self) -> CanvasResult<RgbaImage> {
        let image = image::load_from_memory_with_format(&self.encoded, ImageFormat::Png)
            .map_err(CanvasError::SnapshotDecode)?;
        Ok(image.to_rgba8())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// Size of the encoded snapshot
    pub fn byte_len(&self) -> usize {
        self.encoded.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("bytes", &self.encoded.len())
            .finish()
    }
}
