//! Source acquisition: URL list decoding, caching, loading and validation.

pub mod acquire;
pub mod cache;
pub mod disk;
pub mod loader;
pub mod policy;
pub mod urls;

pub use acquire::{Acquirer, FetchStrategy};
pub use cache::{MemorySourceCache, NullSourceCache, SourceCache, SourceCacheStats};
pub use disk::DiskSourceCache;
pub use loader::{HttpLoaderConfig, HttpSourceLoader, LoadResult, SourceLoader};
pub use policy::{SourcePolicy, SourceValidator};
pub use urls::{decode_url_list, encode_url_list};
