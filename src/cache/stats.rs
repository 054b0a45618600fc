//! Cache Statistics Module
//!
//! Running counters kept by the engine and the snapshot schema exposed
//! to monitoring code.

use serde::Serialize;

// == Counters ==
/// Monotonic counters owned by the engine, reset only by `clear`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Stats ==
/// Point-in-time view of a cache's counters and bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to satisfy the count or byte ceiling
    pub evictions: u64,
    /// Hits as a percentage of all lookups
    pub hit_rate: f64,
    /// Entries currently held
    pub size: usize,
    /// Configured maximum entry count
    pub capacity: usize,
    /// Sum of declared sizes currently held
    pub current_size: u64,
    /// Configured maximum byte total
    pub max_size: u64,
}

// == Hit Rate ==
/// Returns `hits / (hits + misses) * 100`, or 0.0 before any lookup.
pub fn hit_rate_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}
