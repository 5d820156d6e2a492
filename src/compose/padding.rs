use crate::engine::{Color, ImageEngineFactory, ImageHandle};

/// Center `image` on a border-colored canvas of `(w + 2*px, h + 2*py)`.
///
/// The returned canvas always carries an alpha channel.
pub fn pad(
    factory: &dyn ImageEngineFactory,
    image: &ImageHandle,
    px: u32,
    py: u32,
    border: Color,
) -> ImageHandle {
    let (width, height) = image.size();
    let mut canvas = factory.canvas(
        width.saturating_add(px.saturating_mul(2)),
        height.saturating_add(py.saturating_mul(2)),
        border,
    );
    canvas.enable_alpha();
    canvas.paste(image, px, py);
    canvas
}
