//! Source security configuration.
//!
//! Controls which URLs may be fetched and how large a decoded source may be.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_SOURCE_HEIGHT, DEFAULT_MAX_SOURCE_PIXELS, DEFAULT_MAX_SOURCE_WIDTH,
};
use crate::engine::DecodeLimits;

fn default_allowed_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

fn default_max_source_width() -> u32 {
    DEFAULT_MAX_SOURCE_WIDTH
}

fn default_max_source_height() -> u32 {
    DEFAULT_MAX_SOURCE_HEIGHT
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Glob patterns a URL must match (empty = allow all)
    #[serde(default)]
    pub allowed_sources: Vec<String>,
    /// Glob patterns that reject a URL even if allowed
    #[serde(default)]
    pub blocked_sources: Vec<String>,
    /// URL schemes that may be fetched (empty = any)
    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: Vec<String>,
    #[serde(default = "default_max_source_width")]
    pub max_source_width: u32,
    #[serde(default = "default_max_source_height")]
    pub max_source_height: u32,
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_sources: Vec::new(),
            blocked_sources: Vec::new(),
            allowed_schemes: default_allowed_schemes(),
            max_source_width: default_max_source_width(),
            max_source_height: default_max_source_height(),
            max_source_pixels: default_max_source_pixels(),
        }
    }
}

impl SecurityConfig {
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_width: self.max_source_width,
            max_height: self.max_source_height,
            max_pixels: self.max_source_pixels,
        }
    }
}
