//! Persistent source cache: one file per URL.
//!
//! File names are the SHA-256 of the URL, so arbitrary URLs map onto safe
//! paths. Writes go to a temporary file first, then are atomically renamed.
//! Every write gets its own temporary name, so concurrent writers for one URL
//! never share a file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::cache::{SourceCache, SourceCacheStats, StatsTracker};
use crate::error::CarouselError;

/// Convert a URL to the hex SHA-256 used as its file stem
pub fn url_to_hash(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// Source cache storing bytes under a directory.
#[derive(Debug)]
pub struct DiskSourceCache {
    root: PathBuf,
    stats: StatsTracker,
    write_seq: AtomicU64,
}

impl DiskSourceCache {
    /// Open (creating if needed) a cache rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, CarouselError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| cache_error(&root, "create directory", e))?;
        Ok(Self {
            root,
            stats: StatsTracker::default(),
            write_seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hit/miss counters plus the number of `.data` files under the root.
    pub async fn stats(&self) -> SourceCacheStats {
        let entries = match self.count_entries().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to count disk cache entries");
                0
            }
        };
        self.stats.snapshot(entries)
    }

    async fn count_entries(&self) -> Result<u64, CarouselError> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| cache_error(&self.root, "list", e))?;
        let mut count = 0;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| cache_error(&self.root, "list", e))?
        {
            if entry.path().extension().is_some_and(|ext| ext == "data") {
                count += 1;
            }
        }
        Ok(count)
    }

    fn data_path(&self, url: &str) -> PathBuf {
        self.root.join(format!("{}.data", url_to_hash(url)))
    }

    fn marker_path(&self, url: &str) -> PathBuf {
        self.root.join(format!("{}.fetched", url_to_hash(url)))
    }

    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), CarouselError> {
        let temp_path = self.temp_path(path);
        if let Err(e) = tokio::fs::write(&temp_path, contents).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(cache_error(&temp_path, "write", e));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(cache_error(path, "rename", e));
        }
        Ok(())
    }

    /// `<name>.<pid>-<seq>.tmp`, unique per write within and across processes.
    fn temp_path(&self, path: &Path) -> PathBuf {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{name}.{}-{seq}.tmp", std::process::id()))
    }
}

fn cache_error(path: &Path, action: &str, e: std::io::Error) -> CarouselError {
    CarouselError::Cache {
        message: format!("failed to {action} {}: {e}", path.display()),
    }
}

#[async_trait]
impl SourceCache for DiskSourceCache {
    async fn get(&self, url: &str) -> Result<Option<Bytes>, CarouselError> {
        let path = self.data_path(url);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                self.stats.record(true);
                Ok(Some(Bytes::from(data)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.stats.record(false);
                Ok(None)
            }
            Err(e) => Err(cache_error(&path, "read", e)),
        }
    }

    async fn put(&self, url: &str, bytes: Bytes) -> Result<(), CarouselError> {
        let path = self.data_path(url);
        self.write_atomic(&path, &bytes).await?;
        debug!(url = %url, path = %path.display(), size = bytes.len(), "Stored source on disk");
        Ok(())
    }

    async fn mark_fetched(&self, url: &str) -> Result<(), CarouselError> {
        let path = self.marker_path(url);
        self.write_atomic(&path, b"").await
    }

    async fn is_fetched(&self, url: &str) -> Result<bool, CarouselError> {
        let path = self.marker_path(url);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| cache_error(&path, "stat", e))
    }
}
