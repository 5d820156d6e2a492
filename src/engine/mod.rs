//! Image engine: raster handles and the factory that creates them.
//!
//! Components needing a fresh raster never construct one directly; they ask
//! an [`ImageEngineFactory`], which keeps the pipeline independent of the
//! raster backend.

pub mod color;
pub mod encoder;
pub mod handle;
pub mod resize;

pub use color::Color;
pub use encoder::{EncodedImage, JpegEncoder, OUTPUT_CONTENT_TYPE, OUTPUT_FORMAT};
pub use handle::ImageHandle;
pub use resize::{stretched_width, ResizeFilter};

use std::io::Cursor;

use image::io::Reader as ImageReader;
use image::{DynamicImage, RgbImage, RgbaImage};

use crate::constants::{
    DEFAULT_MAX_SOURCE_HEIGHT, DEFAULT_MAX_SOURCE_PIXELS, DEFAULT_MAX_SOURCE_WIDTH,
};
use crate::error::CarouselError;

/// Creates and decodes [`ImageHandle`]s.
pub trait ImageEngineFactory: Send + Sync {
    /// Decode encoded image bytes.
    ///
    /// Fails with `CarouselError::Decode` on malformed or unsupported input.
    fn load(&self, bytes: &[u8]) -> Result<ImageHandle, CarouselError>;

    /// New opaque raster filled with `color`, with no alpha channel.
    fn canvas(&self, width: u32, height: u32, color: Color) -> ImageHandle;

    /// Wrap an already rendered RGBA buffer.
    fn from_rgba(&self, image: RgbaImage) -> ImageHandle {
        ImageHandle::new(DynamicImage::ImageRgba8(image))
    }

    /// Filter used by [`ImageHandle::resize_to_height`] for this backend.
    fn resize_filter(&self) -> ResizeFilter {
        ResizeFilter::default()
    }
}

/// "Image bomb" protection applied before full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_SOURCE_WIDTH,
            max_height: DEFAULT_MAX_SOURCE_HEIGHT,
            max_pixels: DEFAULT_MAX_SOURCE_PIXELS,
        }
    }
}

impl DecodeLimits {
    pub fn check(&self, width: u32, height: u32) -> Result<(), CarouselError> {
        let pixels = width as u64 * height as u64;
        if width > self.max_width || height > self.max_height || pixels > self.max_pixels {
            return Err(CarouselError::ImageBomb {
                url: String::new(),
                width,
                height,
                max_pixels: self.max_pixels,
            });
        }
        Ok(())
    }
}

/// Default engine backed by the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct RasterEngine {
    limits: DecodeLimits,
    filter: ResizeFilter,
}

impl RasterEngine {
    pub fn new(limits: DecodeLimits, filter: ResizeFilter) -> Self {
        Self { limits, filter }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }
}

impl ImageEngineFactory for RasterEngine {
    fn load(&self, bytes: &[u8]) -> Result<ImageHandle, CarouselError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CarouselError::decode_failed("", e.to_string()))?;

        if reader.format().is_none() {
            return Err(CarouselError::decode_failed("", "unrecognized image format"));
        }

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CarouselError::decode_failed("", e.to_string()))?;
        self.limits.check(width, height)?;

        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CarouselError::decode_failed("", e.to_string()))?
            .decode()
            .map_err(|e| CarouselError::decode_failed("", e.to_string()))?;

        Ok(ImageHandle::new(image))
    }

    fn canvas(&self, width: u32, height: u32, color: Color) -> ImageHandle {
        ImageHandle::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            color.to_rgb(),
        )))
    }

    fn resize_filter(&self) -> ResizeFilter {
        self.filter
    }
}
