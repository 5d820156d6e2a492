//! Overflow annotator: appends a "+N" counter to a composed strip.

use tracing::debug;

use crate::engine::{Color, ImageEngineFactory, ImageHandle};
use crate::error::CarouselError;
use crate::text::TextRenderer;

/// Geometry and colors of the overflow counter.
#[derive(Debug, Clone, Copy)]
pub struct OverflowStyle {
    /// Row height the counter is rendered at.
    pub height: u32,
    /// Gap between the strip and the counter.
    pub spacing: u32,
    pub text_color: Color,
    pub background: Color,
}

/// Text drawn for `hidden` images that did not fit.
pub fn overflow_label(hidden: usize) -> String {
    format!("+{hidden}")
}

/// Extend `carousel` with a rendered `"+hidden"` counter.
///
/// The result is `carousel_width + spacing + text_width` wide and
/// `style.height` tall, with the carousel at x=0 and the counter right after
/// the gap.
pub fn add_overflow(
    factory: &dyn ImageEngineFactory,
    renderer: &dyn TextRenderer,
    carousel: &ImageHandle,
    hidden: usize,
    style: &OverflowStyle,
) -> Result<ImageHandle, CarouselError> {
    if hidden == 0 {
        return Err(CarouselError::invalid_param(
            "overflow",
            "overflow count must be greater than 0",
        ));
    }

    let label = overflow_label(hidden);
    let rendered = renderer.render(style.height, &label, style.text_color)?;
    let text = factory.from_rgba(rendered.image);

    let carousel_width = carousel.width();
    let width = carousel_width
        .saturating_add(rendered.width)
        .saturating_add(style.spacing);

    debug!(
        label = %label,
        text_width = rendered.width,
        carousel_width,
        width,
        "Appending overflow counter"
    );

    let mut canvas = factory.canvas(width, style.height, style.background);
    canvas.paste(carousel, 0, 0);
    canvas.paste(&text, carousel_width.saturating_add(style.spacing), 0);

    Ok(canvas)
}
