//! Owned raster image used throughout the pipeline.

use std::borrow::Cow;

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use super::resize::{resize_exact, stretched_width, ResizeFilter};
use crate::error::CarouselError;

/// Exclusive owner of one decoded raster.
///
/// Handles are never shared: every mutation goes through `&mut self`, and
/// operations that conceptually produce a new raster (padding, joining)
/// return a fresh handle instead of rewriting this one.
pub struct ImageHandle {
    image: DynamicImage,
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("dimensions", &self.size())
            .field("alpha", &self.has_alpha())
            .finish()
    }
}

impl ImageHandle {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Ensure an RGBA representation. Idempotent.
    pub fn enable_alpha(&mut self) {
        if !self.has_alpha() {
            self.image = DynamicImage::ImageRgba8(self.image.to_rgba8());
        }
    }

    /// Stretch to `target_height`, keeping the aspect ratio.
    ///
    /// The new width is `round(width * target_height / height)`.
    pub fn resize_to_height(
        &mut self,
        target_height: u32,
        filter: ResizeFilter,
    ) -> Result<(), CarouselError> {
        let (orig_w, orig_h) = self.size();

        if orig_h == target_height {
            debug!(height = target_height, "Image already at target height, skipping resize");
            return Ok(());
        }

        let new_width = stretched_width(orig_w, orig_h, target_height);

        debug!(
            orig_w,
            orig_h,
            new_width,
            new_height = target_height,
            "Resizing image to target height"
        );

        let had_alpha = self.has_alpha();
        let resized = resize_exact(&self.image, new_width, target_height, filter)?;
        self.image = if had_alpha {
            resized
        } else {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        };
        Ok(())
    }

    /// Composite `source` with its top-left corner at `(x, y)`.
    ///
    /// Sources with an alpha channel are blended with the "over" operator;
    /// opaque sources overwrite. Pixels falling outside this raster are
    /// clipped.
    pub fn paste(&mut self, source: &ImageHandle, x: u32, y: u32) {
        let blend = source.has_alpha();
        let top: Cow<'_, RgbaImage> = match &source.image {
            DynamicImage::ImageRgba8(buf) => Cow::Borrowed(buf),
            other => Cow::Owned(other.to_rgba8()),
        };

        // Rasters other than RGB8/RGBA8 are normalised once, then written in place.
        if !matches!(self.image, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) {
            self.image = if self.has_alpha() {
                DynamicImage::ImageRgba8(self.image.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(self.image.to_rgb8())
            };
        }

        let (base_w, base_h) = self.size();
        if x >= base_w || y >= base_h {
            return;
        }
        let span_w = top.width().min(base_w - x);
        let span_h = top.height().min(base_h - y);

        match &mut self.image {
            DynamicImage::ImageRgba8(base) => {
                for dy in 0..span_h {
                    for dx in 0..span_w {
                        let pixel = *top.get_pixel(dx, dy);
                        let dst = base.get_pixel_mut(x + dx, y + dy);
                        *dst = if blend { blend_over(*dst, pixel) } else { pixel };
                    }
                }
            }
            DynamicImage::ImageRgb8(base) => {
                for dy in 0..span_h {
                    for dx in 0..span_w {
                        let pixel = *top.get_pixel(dx, dy);
                        let dst = base.get_pixel_mut(x + dx, y + dy);
                        let out = if blend {
                            let [r, g, b] = dst.0;
                            blend_over(Rgba([r, g, b, 255]), pixel)
                        } else {
                            pixel
                        };
                        dst.0 = [out[0], out[1], out[2]];
                    }
                }
            }
            _ => {}
        }
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        self.image.to_rgba8()
    }
}

/// Porter-Duff "over": result = fg + bg * (1 - fg.alpha)
pub(crate) fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
