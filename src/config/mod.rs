// Configuration module
//
// YAML configuration with ${VAR} environment substitution. Every section
// has defaults, so an empty file (or no file at all) is a working setup.

mod fetch;
mod logging;
mod output;
mod security;

pub use fetch::{CacheConfig, CacheKind, FetchConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use output::{OutputConfig, TextConfig};
pub use security::SecurityConfig;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::carousel::CarouselParams;
use crate::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_IMG_COUNT, DEFAULT_IMG_HEIGHT, DEFAULT_IMG_SPACING,
    DEFAULT_MORE_TEXT_COLOR,
};

fn default_img_count() -> u32 {
    DEFAULT_IMG_COUNT
}

fn default_img_height() -> u32 {
    DEFAULT_IMG_HEIGHT
}

fn default_img_spacing() -> u32 {
    DEFAULT_IMG_SPACING
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

fn default_more_text_color() -> String {
    DEFAULT_MORE_TEXT_COLOR.to_string()
}

/// Default composition parameters used when a request omits them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselDefaults {
    #[serde(default = "default_img_count")]
    pub img_count: u32,
    #[serde(default = "default_img_height")]
    pub img_height: u32,
    #[serde(default = "default_img_spacing")]
    pub img_spacing: u32,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_more_text_color")]
    pub more_text_color: String,
}

impl Default for CarouselDefaults {
    fn default() -> Self {
        Self {
            img_count: default_img_count(),
            img_height: default_img_height(),
            img_spacing: default_img_spacing(),
            background_color: default_background_color(),
            more_text_color: default_more_text_color(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub carousel: CarouselDefaults,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            ));
        }

        // An empty document deserializes as null; treat it as all defaults
        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.default_params().map_err(|e| e.to_string())?;

        if self.fetch.timeout_seconds == 0 {
            return Err("fetch.timeout_seconds must be greater than 0".to_string());
        }
        if self.fetch.max_source_bytes == 0 {
            return Err("fetch.max_source_bytes must be greater than 0".to_string());
        }

        if self.cache.kind == CacheKind::Disk && self.cache.disk_path.is_none() {
            return Err("cache.disk_path is required when cache.kind is 'disk'".to_string());
        }
        if self.cache.kind == CacheKind::Memory && self.cache.max_entries == 0 {
            return Err("cache.max_entries must be greater than 0".to_string());
        }

        let limits = self.security.decode_limits();
        if limits.max_width == 0 || limits.max_height == 0 || limits.max_pixels == 0 {
            return Err("security source limits must be greater than 0".to_string());
        }

        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(format!(
                "output.jpeg_quality must be between 1 and 100, got {}",
                self.output.jpeg_quality
            ));
        }

        Ok(())
    }

    /// Composition parameters built from the `carousel` section.
    pub fn default_params(&self) -> Result<CarouselParams, crate::error::CarouselError> {
        let defaults = &self.carousel;
        CarouselParams::parse(
            defaults.img_count,
            defaults.img_height,
            defaults.img_spacing,
            &defaults.background_color,
            &defaults.more_text_color,
        )
    }
}
