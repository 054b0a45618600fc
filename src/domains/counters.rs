//! Per-category hit/miss tracking for domain caches

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::cache::hit_rate_percent;

/// Lock-free hit/miss counters for one category of lookups
#[derive(Debug, Default)]
pub struct CategoryCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CategoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a hit or a miss depending on whether the lookup found something.
    pub fn record<T>(&self, lookup: &Option<T>) {
        if lookup.is_some() {
            self.record_hit();
        } else {
            self.record_miss();
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Zero both counters
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CategoryStats {
        let hits = self.hits();
        let misses = self.misses();
        CategoryStats {
            hits,
            misses,
            hit_rate: hit_rate_percent(hits, misses),
        }
    }
}

/// Serializable view of one category's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryStats {
    pub hits: u64,
    pub misses: u64,
    /// Percentage, 0.0 before any lookup
    pub hit_rate: f64,
}
