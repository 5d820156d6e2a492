//! Source fetching and caching configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS, DEFAULT_FETCH_CONCURRENCY,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_SOURCE_BYTES,
};
use crate::source::{FetchStrategy, HttpLoaderConfig};

fn default_timeout_seconds() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_max_source_bytes() -> usize {
    DEFAULT_MAX_SOURCE_BYTES
}

fn default_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

fn default_user_agent() -> String {
    concat!("carousel/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_entries() -> u64 {
    DEFAULT_CACHE_MAX_ENTRIES
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Sources larger than this are rejected (default: 50 MB)
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
    /// Fetches in flight per request (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_source_bytes: default_max_source_bytes(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn strategy(&self) -> FetchStrategy {
        FetchStrategy::from_concurrency(self.concurrency)
    }

    pub fn loader_config(&self) -> HttpLoaderConfig {
        HttpLoaderConfig {
            timeout: Duration::from_secs(self.timeout_seconds),
            max_bytes: self.max_source_bytes,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Which source cache backs the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    #[default]
    Memory,
    Disk,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub kind: CacheKind,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Required when `kind` is `disk`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            kind: CacheKind::default(),
            max_entries: default_max_entries(),
            ttl_seconds: default_ttl_seconds(),
            disk_path: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}
