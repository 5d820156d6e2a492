//! Output encoding. Carousel output is always JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::ImageEncoder as _;

use super::ImageHandle;
use crate::constants::DEFAULT_JPEG_QUALITY;
use crate::error::CarouselError;

/// Output format shared by every carousel.
pub const OUTPUT_FORMAT: image::ImageFormat = image::ImageFormat::Jpeg;

/// Content-Type of [`OUTPUT_FORMAT`].
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// JPEG encoder using the image crate
#[derive(Debug, Clone, Copy)]
pub struct JpegEncoder {
    quality: u8,
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::with_quality(DEFAULT_JPEG_QUALITY)
    }
}

impl JpegEncoder {
    /// Quality is clamped to 1-100.
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode the handle. Any alpha channel is discarded.
    pub fn encode(&self, handle: &ImageHandle) -> Result<EncodedImage, CarouselError> {
        let rgb = handle.as_image().to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut output = Cursor::new(Vec::new());
        ImageJpegEncoder::new_with_quality(&mut output, self.quality)
            .write_image(rgb.as_raw(), width, height, image::ColorType::Rgb8)
            .map_err(|e| CarouselError::encode_failed("jpeg", e.to_string()))?;

        Ok(EncodedImage {
            data: output.into_inner(),
            content_type: OUTPUT_CONTENT_TYPE,
            width,
            height,
        })
    }
}
