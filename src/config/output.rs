use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_JPEG_QUALITY;
use crate::engine::ResizeFilter;

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextConfig {
    /// TTF/OTF used for the overflow counter; system fonts are probed when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JPEG quality 1-100 (default: 80)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            resize_filter: ResizeFilter::default(),
        }
    }
}
