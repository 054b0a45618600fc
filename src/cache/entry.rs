//! Cache Entry Module
//!
//! Defines a single cached payload together with its declared byte cost
//! and the instant it was last written.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A cached value plus the metadata the engine needs for eviction.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key the entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Byte cost declared by the caller, trusted as given
    pub size: u64,
    /// When the entry was created or last replaced through `set`
    pub timestamp: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(key: String, value: V, size: u64) -> Self {
        Self {
            key,
            value,
            size,
            timestamp: Instant::now(),
        }
    }

    // == Replace ==
    /// Swaps in a new value and size, refreshing the timestamp.
    ///
    /// Returns the size that was previously declared so the caller can
    /// adjust its byte total by the delta.
    pub fn replace(&mut self, value: V, size: u64) -> u64 {
        let old_size = self.size;
        self.value = value;
        self.size = size;
        self.timestamp = Instant::now();
        old_size
    }

    // == Is Expired ==
    /// Checks whether the entry is older than `ttl` right now.
    ///
    /// A zero `ttl` means entries never expire.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(ttl, Instant::now())
    }

    /// Checks whether the entry is older than `ttl` at the given instant.
    ///
    /// Boundary condition: an entry whose age equals `ttl` exactly is
    /// still live; it expires once its age is strictly greater.
    pub fn is_expired_at(&self, ttl: Duration, now: Instant) -> bool {
        !ttl.is_zero() && now.saturating_duration_since(self.timestamp) > ttl
    }
}
