//! Error taxonomy for carousel composition.
//!
//! Every failure is fail-fast: no partial carousel is ever produced.
//! Variants map onto HTTP-style status codes so the host can report them
//! without knowing the pipeline internals.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that can occur while composing a carousel.
#[derive(Error, Debug, Clone)]
pub enum CarouselError {
    #[error("No images provided")]
    NoImages,

    #[error("Invalid URL list: {message}")]
    InvalidUrlList { message: String },

    #[error("Image source not allowed: {url}")]
    ForbiddenSource { url: String },

    #[error("bad image result url={url} error={error} metadata={}", format_metadata(.metadata))]
    SourceLoad {
        url: String,
        error: String,
        metadata: BTreeMap<String, String>,
    },

    #[error("Failed to decode image from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Source {url} is {size} bytes, exceeding maximum {max_size} bytes")]
    SourceTooLarge {
        url: String,
        size: usize,
        max_size: usize,
    },

    #[error("Image {url} dimensions {width}x{height} exceed limit of {max_pixels} pixels")]
    ImageBomb {
        url: String,
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Resize failed: {message}")]
    Resize { message: String },

    #[error("Failed to render text: {message}")]
    Render { message: String },

    #[error("Failed to encode to {format}: {message}")]
    Encode { format: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl CarouselError {
    /// Maps errors to HTTP status codes.
    ///
    /// Everything caused by request input is a 400; rendering, encoding and
    /// cache backend failures are server-side (500).
    pub fn status_code(&self) -> u16 {
        match self {
            CarouselError::NoImages
            | CarouselError::InvalidUrlList { .. }
            | CarouselError::ForbiddenSource { .. }
            | CarouselError::SourceLoad { .. }
            | CarouselError::Decode { .. }
            | CarouselError::SourceTooLarge { .. }
            | CarouselError::ImageBomb { .. }
            | CarouselError::InvalidParameter { .. } => 400,

            CarouselError::Resize { .. }
            | CarouselError::Render { .. }
            | CarouselError::Encode { .. }
            | CarouselError::Cache { .. } => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        CarouselError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn decode_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        CarouselError::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Attach the source URL to errors raised before the URL was known,
    /// such as decoding inside an engine that only sees bytes.
    pub fn with_url(self, url: &str) -> Self {
        match self {
            CarouselError::Decode { message, .. } => CarouselError::Decode {
                url: url.to_string(),
                message,
            },
            CarouselError::ImageBomb {
                width,
                height,
                max_pixels,
                ..
            } => CarouselError::ImageBomb {
                url: url.to_string(),
                width,
                height,
                max_pixels,
            },
            other => other,
        }
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        CarouselError::Render {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        CarouselError::Encode {
            format: format.into(),
            message: message.into(),
        }
    }
}

fn format_metadata(metadata: &BTreeMap<String, String>) -> String {
    let pairs: Vec<String> = metadata.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CarouselError>;
