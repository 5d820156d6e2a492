// Constants module - centralized default values for configuration
//
// Defaults shared by the configuration layer, the CLI and the library
// types live here so every surface agrees on them.

// =============================================================================
// Carousel defaults
// =============================================================================

/// Default number of visible tiles
pub const DEFAULT_IMG_COUNT: u32 = 1;

/// Default tile height in pixels
pub const DEFAULT_IMG_HEIGHT: u32 = 100;

/// Default gap between tiles in pixels
pub const DEFAULT_IMG_SPACING: u32 = 10;

/// Default strip background color
pub const DEFAULT_BACKGROUND_COLOR: &str = "ffffff";

/// Default overflow counter color
pub const DEFAULT_MORE_TEXT_COLOR: &str = "000000";

// =============================================================================
// Fetch defaults
// =============================================================================

/// Default source fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default maximum source size (50 MB)
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 50 * 1024 * 1024;

/// Default number of concurrent fetches (1 = sequential)
pub const DEFAULT_FETCH_CONCURRENCY: usize = 1;

// =============================================================================
// Cache defaults
// =============================================================================

/// Default maximum number of cached sources
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 1000;

/// Default cached source TTL in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

// =============================================================================
// Security defaults
// =============================================================================

/// Default maximum decoded source width
pub const DEFAULT_MAX_SOURCE_WIDTH: u32 = 10000;

/// Default maximum decoded source height
pub const DEFAULT_MAX_SOURCE_HEIGHT: u32 = 10000;

/// Default maximum decoded pixel count (100 megapixels)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

// =============================================================================
// Output defaults
// =============================================================================

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Default output path of the CLI
pub const DEFAULT_OUTPUT_PATH: &str = "carousel.jpg";
