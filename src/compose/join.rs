//! Horizontal compositor.

use tracing::debug;

use crate::engine::{Color, ImageEngineFactory, ImageHandle};
use crate::error::CarouselError;

/// Width of `widths` laid out left to right with `spacing` between them.
///
/// No spacing is added after the last image, so a single image keeps its own
/// width.
pub fn joined_width(widths: impl IntoIterator<Item = u32>, spacing: u32) -> u32 {
    let mut total = 0u32;
    let mut count = 0u32;
    for width in widths {
        total = total.saturating_add(width);
        count += 1;
    }
    total.saturating_add(spacing.saturating_mul(count.saturating_sub(1)))
}

/// Join `images` in input order onto one background-filled canvas.
///
/// The canvas height is the height of the first image; callers normalize
/// every image to the same height first.
pub fn join_horizontal(
    factory: &dyn ImageEngineFactory,
    images: &[ImageHandle],
    spacing: u32,
    background: Color,
) -> Result<ImageHandle, CarouselError> {
    let Some(first) = images.first() else {
        return Err(CarouselError::NoImages);
    };

    let height = first.height();
    let width = joined_width(images.iter().map(ImageHandle::width), spacing);

    debug!(
        count = images.len(),
        width,
        height,
        spacing,
        "Joining images horizontally"
    );

    let mut canvas = factory.canvas(width, height, background);
    let mut offset = 0u32;
    for image in images {
        canvas.paste(image, offset, 0);
        offset = offset.saturating_add(image.width()).saturating_add(spacing);
    }

    Ok(canvas)
}
