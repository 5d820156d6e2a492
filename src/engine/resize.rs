//! Aspect-preserving resize backed by fast_image_resize.

use std::num::NonZeroU32;

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::CarouselError;

/// Resampling filter used when stretching tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Bilinear,
    CatmullRom,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    fn algorithm(self) -> ResizeAlg {
        match self {
            ResizeFilter::Nearest => ResizeAlg::Nearest,
            ResizeFilter::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            ResizeFilter::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
            ResizeFilter::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

/// Width of an image of `width`x`height` once stretched to `target_height`.
///
/// Rounds to the nearest integer and never returns 0.
pub fn stretched_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return width.max(1);
    }
    let ratio = f64::from(target_height) / f64::from(height);
    let new_width = (f64::from(width) * ratio).round() as u32;
    new_width.max(1)
}

/// Resize to exact dimensions. The result is always RGBA8.
pub(crate) fn resize_exact(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
    filter: ResizeFilter,
) -> Result<DynamicImage, CarouselError> {
    let src_width = NonZeroU32::new(img.width()).ok_or_else(|| resize_failed("Source width is 0"))?;
    let src_height =
        NonZeroU32::new(img.height()).ok_or_else(|| resize_failed("Source height is 0"))?;
    let dst_width = NonZeroU32::new(target_w).ok_or_else(|| resize_failed("Target width is 0"))?;
    let dst_height = NonZeroU32::new(target_h).ok_or_else(|| resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(filter.algorithm());
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let rgba = RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba))
}

fn resize_failed(message: impl Into<String>) -> CarouselError {
    CarouselError::Resize {
        message: message.into(),
    }
}
