//! Source loader contract and the HTTP implementation.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_SOURCE_BYTES};
use crate::error::CarouselError;

/// Outcome of loading one URL.
///
/// A failed result carries no bytes; `error` and `metadata` describe what
/// went wrong for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadResult {
    pub successful: bool,
    pub buffer: Bytes,
    pub error: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl LoadResult {
    pub fn ok(buffer: impl Into<Bytes>) -> Self {
        Self {
            successful: true,
            buffer: buffer.into(),
            error: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            successful: false,
            buffer: Bytes::new(),
            error: Some(error.into()),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Convert into the bytes, or the error describing the failure.
    pub fn into_bytes(self, url: &str) -> Result<Bytes, CarouselError> {
        if self.successful {
            return Ok(self.buffer);
        }
        Err(CarouselError::SourceLoad {
            url: url.to_string(),
            error: self.error.unwrap_or_else(|| "unknown error".to_string()),
            metadata: self.metadata,
        })
    }
}

impl From<Bytes> for LoadResult {
    fn from(bytes: Bytes) -> Self {
        LoadResult::ok(bytes)
    }
}

/// Fetches raw bytes for a URL.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Load `url`. Failures are reported in the result, never as a panic.
    async fn load(&self, url: &str) -> LoadResult;
}

/// HTTP loader settings.
#[derive(Debug, Clone)]
pub struct HttpLoaderConfig {
    pub timeout: Duration,
    pub max_bytes: usize,
    pub user_agent: String,
}

impl Default for HttpLoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_bytes: DEFAULT_MAX_SOURCE_BYTES,
            user_agent: concat!("carousel/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`SourceLoader`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpSourceLoader {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpSourceLoader {
    /// # Errors
    ///
    /// Returns `CarouselError::InvalidParameter` if the HTTP client cannot be
    /// created (e.g., TLS configuration issues).
    pub fn new(config: &HttpLoaderConfig) -> Result<Self, CarouselError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                CarouselError::invalid_param("fetch", format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }
}

#[async_trait]
impl SourceLoader for HttpSourceLoader {
    async fn load(&self, url: &str) -> LoadResult {
        debug!(url = %url, "Fetching source");

        let mut response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "request"
                };
                return LoadResult::failed(e.to_string()).with_metadata("kind", kind);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return LoadResult::failed(format!("HTTP {status}"))
                .with_metadata("status", status.as_u16());
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return LoadResult::failed("response too large")
                    .with_metadata("content_length", length)
                    .with_metadata("max_bytes", self.max_bytes);
            }
        }

        let mut body = BytesMut::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > self.max_bytes {
                        return LoadResult::failed("response too large")
                            .with_metadata("max_bytes", self.max_bytes);
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    return LoadResult::failed(e.to_string())
                        .with_metadata("kind", "body")
                        .with_metadata("status", status.as_u16());
                }
            }
        }

        debug!(url = %url, size = body.len(), "Fetched source");
        LoadResult::ok(body.freeze()).with_metadata("status", status.as_u16())
    }
}
