use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::{CanvasError, CanvasResult};

/// Encodings the canvas can be saved as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    /// Lossy, with the given quality factor (1-100)
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub fn jpeg(quality: u8) -> Self {
        Self::Jpeg {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Png => "canvas.png",
            Self::Jpeg { .. } => "canvas.jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg { .. } => "JPG",
        }
    }
}

/// An encoded image ready to be saved or downloaded
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }
}

impl std::fmt::Debug for ExportedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedImage")
            .field("file_name", &self.file_name())
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Encode an already composed, opaque image
pub fn encode(image: &RgbaImage, format: ExportFormat) -> CanvasResult<ExportedImage> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes)
                .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
                .map_err(CanvasError::Export)?;
        }
        ExportFormat::Jpeg { quality } => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality)
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(CanvasError::Export)?;
        }
    }
    log::info!("Exported {} ({} bytes)", format.file_name(), bytes.len());
    Ok(ExportedImage { format, bytes })
}
