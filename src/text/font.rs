//! Font discovery for the overflow counter.

use std::path::Path;

use ab_glyph::FontArc;
use tracing::info;

use crate::error::CarouselError;

/// Load a TTF/OTF font.
///
/// With an explicit path only that file is tried. Otherwise the well-known
/// system locations for the current platform are probed in order.
pub fn load_font(path: Option<&Path>) -> Result<FontArc, CarouselError> {
    if let Some(path) = path {
        let data = std::fs::read(path).map_err(|e| {
            CarouselError::render_failed(format!(
                "failed to read font {}: {}",
                path.display(),
                e
            ))
        })?;
        return parse_font(data, &path.display().to_string());
    }

    for candidate in system_font_candidates() {
        if let Ok(data) = std::fs::read(candidate) {
            match parse_font(data, candidate) {
                Ok(font) => {
                    info!(path = %candidate, "Using system font for overflow counter");
                    return Ok(font);
                }
                Err(e) => tracing::warn!(path = %candidate, error = %e, "Skipping unusable font"),
            }
        }
    }

    Err(CarouselError::render_failed(
        "no usable font found (configure text.font_path or install system fonts)",
    ))
}

fn parse_font(data: Vec<u8>, origin: &str) -> Result<FontArc, CarouselError> {
    FontArc::try_from_vec(data).map_err(|_| {
        CarouselError::render_failed(format!("failed to parse font data from {origin} (TTF/OTF)"))
    })
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial.ttf",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\arial.ttf",
            "C:\\Windows\\Fonts\\segoeui.ttf",
            "C:\\Windows\\Fonts\\tahoma.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        ]
    }
}
