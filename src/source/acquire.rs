//! Acquisition pipeline: URL list to decoded, alpha-enabled handles.
//!
//! Per URL, in input order:
//! 1. validate (when a validator is configured)
//! 2. look up cached bytes
//! 3. on a miss, load; an unsuccessful load aborts the request
//! 4. reject oversized bytes, then cache them and record the fetched marker
//! 5. decode and enable alpha
//!
//! With [`FetchStrategy::Concurrent`] every URL is validated before the first
//! fetch starts, and results are collected back into input order.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, warn};

use super::cache::SourceCache;
use super::loader::SourceLoader;
use super::policy::SourceValidator;
use super::urls::decode_url_list;
use crate::engine::{ImageEngineFactory, ImageHandle};
use crate::error::CarouselError;

/// How sources are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// One URL at a time.
    #[default]
    Sequential,
    /// Up to `limit` fetches in flight; output order is still input order.
    Concurrent { limit: usize },
}

impl FetchStrategy {
    /// `concurrency <= 1` is sequential.
    pub fn from_concurrency(concurrency: usize) -> Self {
        if concurrency <= 1 {
            FetchStrategy::Sequential
        } else {
            FetchStrategy::Concurrent { limit: concurrency }
        }
    }
}

/// Resolves a URL list into image handles.
pub struct Acquirer {
    cache: Arc<dyn SourceCache>,
    loader: Arc<dyn SourceLoader>,
    validator: Option<Arc<dyn SourceValidator>>,
    factory: Arc<dyn ImageEngineFactory>,
    strategy: FetchStrategy,
    max_source_bytes: Option<usize>,
}

impl Acquirer {
    pub fn new(
        cache: Arc<dyn SourceCache>,
        loader: Arc<dyn SourceLoader>,
        factory: Arc<dyn ImageEngineFactory>,
    ) -> Self {
        Self {
            cache,
            loader,
            validator: None,
            factory,
            strategy: FetchStrategy::default(),
            max_source_bytes: None,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn SourceValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_source_bytes(mut self, max: usize) -> Self {
        self.max_source_bytes = Some(max);
        self
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Decode the base64 payload and acquire every URL in it.
    pub async fn acquire(&self, urls_base64: &str) -> Result<Vec<ImageHandle>, CarouselError> {
        let urls = decode_url_list(urls_base64)?;
        self.acquire_urls(&urls).await
    }

    /// Acquire already decoded URLs, preserving their order.
    pub async fn acquire_urls(&self, urls: &[String]) -> Result<Vec<ImageHandle>, CarouselError> {
        if urls.is_empty() {
            return Err(CarouselError::NoImages);
        }

        match self.strategy {
            FetchStrategy::Sequential => {
                let mut handles = Vec::with_capacity(urls.len());
                for url in urls {
                    self.check_allowed(url)?;
                    handles.push(self.resolve(url).await?);
                }
                Ok(handles)
            }
            FetchStrategy::Concurrent { limit } => {
                for url in urls {
                    self.check_allowed(url)?;
                }
                stream::iter(urls.iter().map(|url| self.resolve(url)))
                    .buffered(limit.max(1))
                    .try_collect()
                    .await
            }
        }
    }

    fn check_allowed(&self, url: &str) -> Result<(), CarouselError> {
        match &self.validator {
            Some(validator) if !validator.validate(url) => {
                warn!(url = %url, "image source not allowed");
                Err(CarouselError::ForbiddenSource {
                    url: url.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    async fn resolve(&self, url: &str) -> Result<ImageHandle, CarouselError> {
        let bytes = self.source_bytes(url).await?;

        let mut handle = self.factory.load(&bytes).map_err(|e| e.with_url(url))?;
        handle.enable_alpha();
        debug!(url = %url, width = handle.width(), height = handle.height(), "Decoded source");
        Ok(handle)
    }

    /// Oversized bytes are rejected before they reach the cache.
    fn check_size(&self, url: &str, bytes: &Bytes) -> Result<(), CarouselError> {
        match self.max_source_bytes {
            Some(max) if bytes.len() > max => Err(CarouselError::SourceTooLarge {
                url: url.to_string(),
                size: bytes.len(),
                max_size: max,
            }),
            _ => Ok(()),
        }
    }

    async fn source_bytes(&self, url: &str) -> Result<Bytes, CarouselError> {
        match self.cache.get(url).await {
            Ok(Some(bytes)) => {
                debug!(url = %url, cache_hit = true, size = bytes.len(), "Source cache hit");
                self.check_size(url, &bytes)?;
                return Ok(bytes);
            }
            Ok(None) => {
                let seen_before = self.cache.is_fetched(url).await.unwrap_or(false);
                debug!(url = %url, cache_hit = false, seen_before, "Source cache miss");
            }
            Err(e) => warn!(url = %url, error = %e, "Source cache read failed, fetching"),
        }

        let result = self.loader.load(url).await;
        if !result.successful {
            warn!(
                url = %url,
                error = result.error.as_deref().unwrap_or("unknown error"),
                metadata = ?result.metadata,
                "bad image result"
            );
        }
        let bytes = result.into_bytes(url)?;
        self.check_size(url, &bytes)?;

        if let Err(e) = self.cache.put(url, bytes.clone()).await {
            warn!(url = %url, error = %e, "Failed to cache source");
        } else if let Err(e) = self.cache.mark_fetched(url).await {
            warn!(url = %url, error = %e, "Failed to record fetched marker");
        }

        Ok(bytes)
    }
}
