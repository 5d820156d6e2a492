//! Carousel composition: parameters, orchestration and output.

mod orchestrator;
mod params;

pub use orchestrator::Orchestrator;
pub use params::CarouselParams;

use crate::engine::{EncodedImage, ImageHandle, JpegEncoder};
use crate::error::CarouselError;

/// A composed carousel, ready for encoding.
#[derive(Debug)]
pub struct Carousel {
    pub image: ImageHandle,
    /// Tiles drawn before the counter
    pub tiles: usize,
    /// N of the "+N" counter, if one was appended
    pub overflow: Option<usize>,
}

impl Carousel {
    /// Encode to the fixed output format ([`crate::engine::OUTPUT_FORMAT`]).
    pub fn encode(&self, quality: u8) -> Result<EncodedImage, CarouselError> {
        JpegEncoder::with_quality(quality).encode(&self.image)
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.size()
    }
}
