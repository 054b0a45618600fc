//! Domain Caches Module
//!
//! Typed wrappers over [`CacheStore`](crate::cache::CacheStore) for the
//! payloads the rental service caches: rendered image variants and
//! listing/search/aggregate JSON.
//!
//! Each wrapper builds its keys from business identifiers and keeps its
//! own per-category hit/miss counters on top of the engine's.

mod counters;
mod image;
mod property;

pub use counters::{CategoryCounters, CategoryStats};
pub use image::{CachedImage, ImageCache, ImageCacheStats, ImageVariant};
pub use property::{
    PropertyCache, PropertyCacheStats, PropertyCategory, PropertyPayload, SearchQuery,
};

// == Sweepable ==
/// A cache that the background sweep can expire entries from.
pub trait Sweepable: Send + Sync {
    /// Name used in logs and the monitoring API.
    fn name(&self) -> &'static str;

    /// Removes expired entries, returning how many were removed.
    fn cleanup_expired(&self) -> usize;
}
