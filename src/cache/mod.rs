//! Cache Module
//!
//! Bounded in-memory cache with LRU eviction by entry count and byte
//! size, plus TTL expiration.

mod entry;
mod list;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub(crate) use list::RecencyList;
pub use stats::{hit_rate_percent, CacheStats};
pub use store::CacheStore;

// == Public Constants ==
/// Entry count used when a cache is built with capacity 0
pub const DEFAULT_CAPACITY: usize = 1000;

/// Byte ceiling used when a cache is built with max size 0
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024; // 100 MB
