//! Cache Module
//!
//! Persistent URL cache with a byte budget, insertion-age eviction and
//! lazy expiry.

mod bounded;
mod entry;
mod eviction;
mod stats;


// Re-export public types
pub use bounded::{entry_key, BoundedUrlCache};
pub use entry::{CacheEntry, EntryMeta};
pub use eviction::select_victims;
pub use stats::{CacheMetrics, CacheStats};

// == Public Constants ==
/// Storage key prefix of cache entry records
pub const CACHE_PREFIX: &str = "@cache_";

/// Storage key of the ordered cache index
pub const CACHE_INDEX_KEY: &str = "@cache_index";

/// Default expiry window: 24 hours in milliseconds
pub const DEFAULT_EXPIRY_MS: u64 = 24 * 60 * 60 * 1000;
