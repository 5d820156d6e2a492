//! Text rasterization for the overflow counter.
//!
//! The counter is rendered at a height fixed by the carousel row. The font
//! size is not chosen directly: it grows in small steps until the rendered
//! width reaches `floor(height / 1.5)`, which keeps the glyph proportionate
//! to the neighbouring tiles.

pub mod font;

pub use font::load_font;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::RgbaImage;
use tracing::debug;

use crate::engine::handle::blend_over;
use crate::engine::Color;
use crate::error::CarouselError;

/// Font size increment, in pixels, between fitting attempts.
pub const SCALE_STEP: f32 = 0.5;

/// Rendered width must reach `floor(height / WIDTH_DIVISOR)`.
pub const WIDTH_DIVISOR: f32 = 1.5;

/// Fitting gives up once the font size exceeds this multiple of the height.
const MAX_SCALE_FACTOR: f32 = 8.0;

/// A rendered text raster with a transparent background.
#[derive(Debug, Clone)]
pub struct RenderedText {
    pub image: RgbaImage,
    pub width: u32,
}

/// Renders short strings to standalone rasters.
pub trait TextRenderer: Send + Sync {
    /// Render `text` into a raster exactly `width x height`, where the width
    /// is chosen by the renderer and returned alongside the image.
    fn render(&self, height: u32, text: &str, color: Color) -> Result<RenderedText, CarouselError>;
}

/// Measured extent of a string at one font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width, rounded up.
    pub width: u32,
    /// Ink height above the baseline, rounded up.
    pub height: u32,
}

/// [`TextRenderer`] drawing glyph outlines with ab_glyph.
#[derive(Clone)]
pub struct FontTextRenderer {
    font: FontArc,
}

impl std::fmt::Debug for FontTextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontTextRenderer").finish_non_exhaustive()
    }
}

impl FontTextRenderer {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    /// Measure `text` at the given pixel size.
    pub fn measure(&self, text: &str, font_size: f32) -> TextMetrics {
        let scale = PxScale::from(font_size);
        let scaled = self.font.as_scaled(scale);

        let mut width = 0.0f32;
        let mut ink_top = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }

            let glyph = glyph_id.with_scale_and_position(scale, point(width, 0.0));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                ink_top = ink_top.max(-outlined.px_bounds().min.y);
            }

            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        if ink_top <= 0.0 {
            ink_top = scaled.ascent();
        }

        TextMetrics {
            width: width.max(0.0).ceil() as u32,
            height: ink_top.ceil() as u32,
        }
    }

    /// Grow the font size until the text is at least `floor(height / 1.5)`
    /// pixels wide. At least one step is always taken.
    pub fn fit(&self, height: u32, text: &str) -> Result<(f32, TextMetrics), CarouselError> {
        let target_width = (height as f32 / WIDTH_DIVISOR).floor();
        let max_size = (height as f32).max(1.0) * MAX_SCALE_FACTOR;

        let mut font_size = 0.0f32;
        loop {
            font_size += SCALE_STEP;
            let metrics = self.measure(text, font_size);

            if metrics.width as f32 >= target_width {
                debug!(
                    font_size,
                    width = metrics.width,
                    text_height = metrics.height,
                    target_width,
                    "Fitted overflow text"
                );
                return Ok((font_size, metrics));
            }

            if font_size >= max_size {
                return Err(CarouselError::render_failed(format!(
                    "text '{text}' cannot reach {target_width}px width"
                )));
            }
        }
    }

    fn draw(&self, canvas: &mut RgbaImage, text: &str, font_size: f32, baseline_y: f32, color: Color) {
        let scale = PxScale::from(font_size);
        let scaled = self.font.as_scaled(scale);
        let (canvas_width, canvas_height) = canvas.dimensions();

        let mut cursor_x = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                cursor_x += scaled.kern(prev, glyph_id);
            }

            let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();

                outlined.draw(|px, py, coverage| {
                    let x = px as i32 + bounds.min.x as i32;
                    let y = py as i32 + bounds.min.y as i32;

                    if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                        let alpha = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
                        let existing = *canvas.get_pixel(x as u32, y as u32);
                        canvas.put_pixel(
                            x as u32,
                            y as u32,
                            blend_over(existing, color.to_rgba(alpha)),
                        );
                    }
                });
            }

            cursor_x += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
    }
}

impl TextRenderer for FontTextRenderer {
    fn render(&self, height: u32, text: &str, color: Color) -> Result<RenderedText, CarouselError> {
        if text.is_empty() {
            return Err(CarouselError::render_failed("Cannot render empty text"));
        }
        if height == 0 {
            return Err(CarouselError::render_failed("Cannot render text at height 0"));
        }

        let (font_size, metrics) = self.fit(height, text)?;
        let width = metrics.width.max(1);

        let mut image = RgbaImage::new(width, height);
        let baseline_y = ((height + metrics.height) / 2) as f32;
        self.draw(&mut image, text, font_size, baseline_y, color);

        Ok(RenderedText { image, width })
    }
}

/// Stand-in used when no font could be loaded.
///
/// Carousels without overflow still compose; rendering a counter fails with
/// the original font error.
#[derive(Debug, Clone)]
pub struct UnavailableTextRenderer {
    reason: String,
}

impl UnavailableTextRenderer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextRenderer for UnavailableTextRenderer {
    fn render(&self, _height: u32, text: &str, _color: Color) -> Result<RenderedText, CarouselError> {
        Err(CarouselError::render_failed(format!(
            "cannot render '{text}': {}",
            self.reason
        )))
    }
}
