//! Artwork re-encoding
//!
//! Decodes an embedded image, resizes it to a square and re-encodes it as a
//! baseline JPEG. The orchestrator only sees the [`ArtworkTransform`] trait.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use thiserror::Error;

/// The image codec failed to decode, resize or encode the artwork
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Turns image bytes into baseline JPEG bytes
pub trait ArtworkTransform {
    fn transform(&self, data: &[u8]) -> Result<Vec<u8>, TransformError>;

    /// Edge length of the square images this transform produces
    fn target_size(&self) -> u32;
}

/// Resize to `size`×`size` (aspect ratio is not preserved) and encode at `quality`
#[derive(Debug, Clone, Copy)]
pub struct JpegResizer {
    pub size: u32,
    pub quality: u8,
}

impl JpegResizer {
    pub const DEFAULT_SIZE: u32 = 500;
    pub const DEFAULT_QUALITY: u8 = 85;

    pub fn new(size: u32, quality: u8) -> Self {
        Self { size, quality }
    }
}

impl Default for JpegResizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_QUALITY)
    }
}

impl ArtworkTransform for JpegResizer {
    fn transform(&self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        let img = image::load_from_memory(data).map_err(TransformError::Decode)?;
        log::debug!(
            "Resizing artwork from {}x{} to {}x{}",
            img.width(),
            img.height(),
            self.size,
            self.size
        );

        // 24-bit RGB output regardless of the source color type
        let resized = img
            .resize_exact(self.size, self.size, FilterType::Lanczos3)
            .to_rgb8();

        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        encoder
            .encode_image(&resized)
            .map_err(TransformError::Encode)?;
        Ok(buffer)
    }

    fn target_size(&self) -> u32 {
        self.size
    }
}
