use crate::constants::{DEFAULT_IMG_COUNT, DEFAULT_IMG_HEIGHT, DEFAULT_IMG_SPACING};
use crate::engine::Color;
use crate::error::CarouselError;

/// Parameters of one composition. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselParams {
    /// Requested visible slots; more supplied images produce a "+N" counter
    pub img_count: u32,
    /// Height every tile is stretched to
    pub img_height: u32,
    /// Horizontal gap between tiles and before the counter
    pub img_spacing: u32,
    pub background_color: Color,
    pub more_text_color: Color,
    /// Composite only the first `img_count` tiles instead of every source
    pub visible_only: bool,
}

impl Default for CarouselParams {
    fn default() -> Self {
        Self {
            img_count: DEFAULT_IMG_COUNT,
            img_height: DEFAULT_IMG_HEIGHT,
            img_spacing: DEFAULT_IMG_SPACING,
            background_color: Color::white(),
            more_text_color: Color::black(),
            visible_only: false,
        }
    }
}

impl CarouselParams {
    /// Validate and build parameters. Count, height and spacing must be > 0.
    pub fn new(
        img_count: u32,
        img_height: u32,
        img_spacing: u32,
        background_color: Color,
        more_text_color: Color,
    ) -> Result<Self, CarouselError> {
        for (param, value) in [
            ("img_count", img_count),
            ("img_height", img_height),
            ("img_spacing", img_spacing),
        ] {
            if value == 0 {
                return Err(CarouselError::invalid_param(param, "must be greater than 0"));
            }
        }

        Ok(Self {
            img_count,
            img_height,
            img_spacing,
            background_color,
            more_text_color,
            visible_only: false,
        })
    }

    /// Like [`CarouselParams::new`], with colors given as 6 hex digits.
    pub fn parse(
        img_count: u32,
        img_height: u32,
        img_spacing: u32,
        background_color: &str,
        more_text_color: &str,
    ) -> Result<Self, CarouselError> {
        let background = Color::from_hex(background_color)
            .map_err(|e| reparam(e, "background_color"))?;
        let text = Color::from_hex(more_text_color).map_err(|e| reparam(e, "more_text_color"))?;
        Self::new(img_count, img_height, img_spacing, background, text)
    }

    pub fn with_visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    /// Number of images hidden behind the counter for `supplied` sources.
    pub fn hidden_count(&self, supplied: usize) -> usize {
        supplied.saturating_sub(self.img_count as usize)
    }
}

fn reparam(error: CarouselError, param: &str) -> CarouselError {
    match error {
        CarouselError::InvalidParameter { message, .. } => CarouselError::InvalidParameter {
            param: param.to_string(),
            message,
        },
        other => other,
    }
}
