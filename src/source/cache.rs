//! Source byte cache contract and in-memory implementations.
//!
//! - `MemorySourceCache`: bounded, TTL-expiring cache backed by moka
//! - `NullSourceCache`: no-op implementation for disabled caching

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::error::CarouselError;

/// Key-value store of raw encoded source bytes, keyed by URL.
///
/// Implementations must be safe under concurrent callers; each operation is
/// treated as atomic by the pipeline.
#[async_trait]
pub trait SourceCache: Send + Sync {
    /// Cached bytes for `url`, or `None` on a miss.
    async fn get(&self, url: &str) -> Result<Option<Bytes>, CarouselError>;

    /// Store `bytes` for `url`, replacing any previous value.
    async fn put(&self, url: &str, bytes: Bytes) -> Result<(), CarouselError>;

    /// Record that `url` has been fetched at least once.
    async fn mark_fetched(&self, url: &str) -> Result<(), CarouselError>;

    /// Whether [`SourceCache::mark_fetched`] was called for `url`.
    async fn is_fetched(&self, url: &str) -> Result<bool, CarouselError>;

    /// Run pending maintenance (for caches that use async backends like moka)
    async fn run_pending_tasks(&self) {}
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

impl SourceCacheStats {
    /// hits / (hits + misses), or 0.0 when nothing was requested
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StatsTracker {
    pub(crate) fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self, entries: u64) -> SourceCacheStats {
        SourceCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

/// In-memory source cache.
pub struct MemorySourceCache {
    bytes: moka::future::Cache<String, Bytes>,
    fetched: moka::future::Cache<String, ()>,
    stats: StatsTracker,
}

impl MemorySourceCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let bytes = moka::future::Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        // Markers outlive byte entries so evicted sources are recognisable.
        let fetched = moka::future::Cache::builder()
            .max_capacity(max_entries.saturating_mul(4))
            .build();

        Self {
            bytes,
            fetched,
            stats: StatsTracker::default(),
        }
    }

    pub fn stats(&self) -> SourceCacheStats {
        self.stats.snapshot(self.bytes.entry_count())
    }
}

impl std::fmt::Debug for MemorySourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySourceCache")
            .field("stats", &self.stats())
            .finish()
    }
}

#[async_trait]
impl SourceCache for MemorySourceCache {
    async fn get(&self, url: &str) -> Result<Option<Bytes>, CarouselError> {
        let entry = self.bytes.get(url).await;
        self.stats.record(entry.is_some());
        Ok(entry)
    }

    async fn put(&self, url: &str, bytes: Bytes) -> Result<(), CarouselError> {
        self.bytes.insert(url.to_string(), bytes).await;
        Ok(())
    }

    async fn mark_fetched(&self, url: &str) -> Result<(), CarouselError> {
        self.fetched.insert(url.to_string(), ()).await;
        Ok(())
    }

    async fn is_fetched(&self, url: &str) -> Result<bool, CarouselError> {
        Ok(self.fetched.contains_key(url))
    }

    async fn run_pending_tasks(&self) {
        self.bytes.run_pending_tasks().await;
        self.fetched.run_pending_tasks().await;
    }
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSourceCache;

#[async_trait]
impl SourceCache for NullSourceCache {
    async fn get(&self, _url: &str) -> Result<Option<Bytes>, CarouselError> {
        Ok(None)
    }

    async fn put(&self, _url: &str, _bytes: Bytes) -> Result<(), CarouselError> {
        Ok(())
    }

    async fn mark_fetched(&self, _url: &str) -> Result<(), CarouselError> {
        Ok(())
    }

    async fn is_fetched(&self, _url: &str) -> Result<bool, CarouselError> {
        Ok(false)
    }
}
