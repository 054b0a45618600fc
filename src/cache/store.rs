//! Cache Store Module
//!
//! Main cache engine combining a key→slot map with the recency list,
//! bounded by entry count and total declared byte size, with lazy and
//! active TTL expiration.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::debug;

use crate::cache::stats::{hit_rate_percent, Counters};
use crate::cache::{CacheEntry, CacheStats, RecencyList, DEFAULT_CAPACITY, DEFAULT_MAX_SIZE};
use crate::config::{CacheConfig, SweepStrategy};

// == Inner State ==
/// Everything guarded by the engine lock.
struct Inner<V> {
    /// Key → arena slot
    map: HashMap<String, usize, RandomState>,
    /// Recency order, most recently used first
    list: RecencyList<V>,
    /// Sum of declared sizes of all held entries
    current_size: u64,
    counters: Counters,
}

impl<V> Inner<V> {
    fn new() -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
            list: RecencyList::new(),
            current_size: 0,
            counters: Counters::default(),
        }
    }

    /// Removes `key` from the map, the list and the byte total.
    fn remove_key(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let idx = self.map.remove(key)?;
        let entry = self.list.remove(idx)?;
        self.current_size -= entry.size;
        Some(entry)
    }

    /// Removes the entry at a known slot from the list, the map and the
    /// byte total.
    fn remove_slot(&mut self, idx: usize) -> Option<CacheEntry<V>> {
        let entry = self.list.remove(idx)?;
        self.map.remove(&entry.key);
        self.current_size -= entry.size;
        Some(entry)
    }

    /// Evicts from the LRU end until both ceilings hold.
    fn evict_if_needed(&mut self, capacity: usize, max_size: u64) {
        while self.map.len() > capacity {
            if !self.evict_lru() {
                break;
            }
        }
        while self.current_size > max_size {
            if !self.evict_lru() {
                break;
            }
        }
    }

    fn evict_lru(&mut self) -> bool {
        let Some(idx) = self.list.lru() else {
            return false;
        };
        match self.remove_slot(idx) {
            Some(entry) => {
                self.counters.record_eviction();
                debug!("Evicted '{}' ({} bytes)", entry.key, entry.size);
                true
            }
            None => false,
        }
    }
}

// == Cache Store ==
/// Thread-safe LRU cache bounded by entry count and total byte size.
///
/// Every operation that can reorder the list or touch counters takes the
/// exclusive lock, including `get`. Only the scalar reads take the
/// shared lock.
pub struct CacheStore<V> {
    inner: RwLock<Inner<V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Maximum sum of declared entry sizes
    max_size: u64,
    /// Entry lifetime, zero = never expire
    ttl: Duration,
    sweep: SweepStrategy,
}

impl<V> fmt::Debug for CacheStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("capacity", &self.capacity)
            .field("max_size", &self.max_size)
            .field("ttl", &self.ttl)
            .field("sweep", &self.sweep)
            .field("len", &self.size())
            .finish()
    }
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum entry count (0 selects `DEFAULT_CAPACITY`)
    /// * `max_size` - Maximum total declared bytes (0 selects `DEFAULT_MAX_SIZE`)
    /// * `ttl` - Entry lifetime; `Duration::ZERO` means never expire
    pub fn new(capacity: usize, max_size: u64, ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner::new()),
            capacity: if capacity == 0 { DEFAULT_CAPACITY } else { capacity },
            max_size: if max_size == 0 { DEFAULT_MAX_SIZE } else { max_size },
            ttl,
            sweep: SweepStrategy::default(),
        }
    }

    /// Creates a CacheStore from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.max_size, config.ttl).with_sweep(config.sweep)
    }

    /// Selects how `cleanup_expired` walks the list.
    pub fn with_sweep(mut self, sweep: SweepStrategy) -> Self {
        self.sweep = sweep;
        self
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// A live entry is promoted to most recently used and counted as a hit.
    /// An absent or expired entry is counted as a miss; an expired one is
    /// also removed.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_if(key, |_| true)
    }

    /// Like [`get`](Self::get), but a live entry whose value fails `accept`
    /// is removed and counted as a miss.
    ///
    /// The check and the removal happen under one exclusive lock, so a
    /// concurrent `set` of an acceptable value is never discarded.
    pub fn get_if(&self, key: &str, accept: impl FnOnce(&V) -> bool) -> Option<V> {
        let mut inner = self.inner.write();

        let Some(&idx) = inner.map.get(key) else {
            inner.counters.record_miss();
            return None;
        };

        let usable = match inner.list.get(idx) {
            Some(entry) if entry.is_expired(self.ttl) => {
                debug!("Expired '{}' on lookup", key);
                false
            }
            Some(entry) => accept(&entry.value),
            None => false,
        };
        if !usable {
            inner.remove_slot(idx);
            inner.counters.record_miss();
            return None;
        }

        inner.list.move_to_front(idx);
        inner.counters.record_hit();
        inner.list.get(idx).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key` with a declared byte cost of `size`.
    ///
    /// An existing entry is replaced in place and promoted. A value larger
    /// than `max_size` is never stored; if the key was present, its old
    /// entry is dropped. Eviction runs afterwards until both ceilings hold.
    pub fn set(&self, key: impl Into<String>, value: V, size: u64) {
        let key = key.into();
        let mut inner = self.inner.write();

        if size > self.max_size {
            if inner.remove_key(&key).is_some() {
                debug!("Dropped '{}': new value of {} bytes cannot fit", key, size);
            } else {
                debug!("Rejected '{}': {} bytes exceeds ceiling", key, size);
            }
            return;
        }

        if let Some(&idx) = inner.map.get(&key) {
            if let Some(entry) = inner.list.get_mut(idx) {
                let old_size = entry.replace(value, size);
                inner.current_size = inner.current_size - old_size + size;
            }
            inner.list.move_to_front(idx);
        } else {
            let idx = inner.list.push_front(CacheEntry::new(key.clone(), value, size));
            inner.map.insert(key, idx);
            inner.current_size += size;
        }

        inner.evict_if_needed(self.capacity, self.max_size);
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    ///
    /// Hit and miss counters are untouched.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.write().remove_key(key).is_some()
    }

    // == Clear ==
    /// Drops every entry and resets all counters.
    ///
    /// This is a reset, not an eviction: the eviction counter goes to zero.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.map.clear();
        inner.list.clear();
        inner.current_size = 0;
        inner.counters.reset();
    }

    // == Contains ==
    /// Checks for a live entry without promoting it or touching counters.
    pub fn contains(&self, key: &str) -> bool {
        let inner = self.inner.read();
        inner
            .map
            .get(key)
            .and_then(|&idx| inner.list.get(idx))
            .map_or(false, |entry| !entry.is_expired(self.ttl))
    }

    // == Keys ==
    /// Returns every held key in unspecified order.
    pub fn keys(&self) -> Vec<String> {
        let inner = self.inner.write();
        inner.map.keys().cloned().collect()
    }

    // == Stats ==
    /// Returns a snapshot of counters and bounds.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.write();
        let Counters {
            hits,
            misses,
            evictions,
        } = inner.counters;

        CacheStats {
            hits,
            misses,
            evictions,
            hit_rate: hit_rate_percent(hits, misses),
            size: inner.map.len(),
            capacity: self.capacity,
            current_size: inner.current_size,
            max_size: self.max_size,
        }
    }

    // == Cleanup Expired ==
    /// Removes expired entries, walking from the least recently used end.
    ///
    /// Returns the number of entries removed; 0 when the TTL is disabled.
    /// With [`SweepStrategy::StopAtFirstFresh`] the walk ends at the first
    /// live entry.
    pub fn cleanup_expired(&self) -> usize {
        if self.ttl.is_zero() {
            return 0;
        }

        let now = Instant::now();
        let mut inner = self.inner.write();
        let mut removed = 0;
        let mut cursor = inner.list.lru();

        while let Some(idx) = cursor {
            cursor = inner.list.newer(idx);

            let expired = inner
                .list
                .get(idx)
                .map_or(false, |entry| entry.is_expired_at(self.ttl, now));
            if expired {
                inner.remove_slot(idx);
                removed += 1;
            } else if self.sweep == SweepStrategy::StopAtFirstFresh {
                break;
            }
        }

        removed
    }
}

impl<V> CacheStore<V> {
    // == Size ==
    /// Returns the current number of entries.
    pub fn size(&self) -> usize {
        self.inner.read().map.len()
    }

    /// Returns the current sum of declared entry sizes.
    pub fn current_size(&self) -> u64 {
        self.inner.read().current_size
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sweep_strategy(&self) -> SweepStrategy {
        self.sweep
    }

    /// Walks the list and map and panics if they disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let inner = self.inner.read();
        let listed: Vec<&CacheEntry<V>> = inner.list.iter().collect();

        assert_eq!(listed.len(), inner.map.len(), "list/map length mismatch");
        assert_eq!(listed.len(), inner.list.len(), "list length counter drift");
        let total: u64 = listed.iter().map(|entry| entry.size).sum();
        assert_eq!(total, inner.current_size, "byte total drift");
        for entry in listed {
            let idx = inner.map.get(&entry.key).copied();
            assert!(idx.is_some(), "listed key '{}' missing from map", entry.key);
            assert_eq!(
                idx.and_then(|idx| inner.list.get(idx)).map(|e| e.key.as_str()),
                Some(entry.key.as_str())
            );
        }
    }

    /// Keys from most recently used to least recently used.
    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<String> {
        self.inner.read().list.iter().map(|e| e.key.clone()).collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread::sleep;

    fn store(capacity: usize, max_size: u64) -> CacheStore<Vec<u8>> {
        CacheStore::new(capacity, max_size, Duration::ZERO)
    }

    fn key_set(store: &CacheStore<Vec<u8>>) -> HashSet<String> {
        store.keys().into_iter().collect()
    }

    #[test]
    fn test_store_new() {
        let store = store(100, 1000);
        assert_eq!(store.size(), 0);
        assert_eq!(store.current_size(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.max_size(), 1000);
    }

    #[test]
    fn test_store_zero_bounds_fall_back_to_defaults() {
        let store = store(0, 0);
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
        assert_eq!(store.max_size(), DEFAULT_MAX_SIZE);
        assert!(store.ttl().is_zero());
    }

    #[test]
    fn test_store_from_config() {
        let config = CacheConfig {
            capacity: 3,
            max_size: 30,
            ttl: Duration::from_secs(5),
            sweep: SweepStrategy::FullScan,
        };
        let store: CacheStore<u8> = CacheStore::from_config(&config);

        assert_eq!(store.capacity(), 3);
        assert_eq!(store.max_size(), 30);
        assert_eq!(store.ttl(), Duration::from_secs(5));
        assert_eq!(store.sweep_strategy(), SweepStrategy::FullScan);
    }

    #[test]
    fn test_store_set_and_get() {
        let store = store(100, 1000);

        store.set("key1", b"value1".to_vec(), 6);

        assert_eq!(store.get("key1"), Some(b"value1".to_vec()));
        assert_eq!(store.size(), 1);
        assert_eq!(store.current_size(), 6);
        store.assert_consistent();
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = store(100, 1000);

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_accepts_empty_key_and_zero_size() {
        let store = store(100, 1000);

        store.set("", Vec::new(), 0);

        assert_eq!(store.get(""), Some(Vec::new()));
        assert_eq!(store.current_size(), 0);
    }

    #[test]
    fn test_store_delete() {
        let store = store(100, 1000);

        store.set("key1", b"v".to_vec(), 10);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.current_size(), 0);
        assert_eq!(store.get("key1"), None);
        store.assert_consistent();
    }

    #[test]
    fn test_store_delete_nonexistent_touches_no_counters() {
        let store = store(100, 1000);

        assert!(!store.delete("nonexistent"));

        let stats = store.stats();
        assert_eq!((stats.hits, stats.misses, stats.evictions), (0, 0, 0));
    }

    #[test]
    fn test_store_overwrite_adjusts_size() {
        let store = store(100, 1000);

        store.set("key1", b"value1".to_vec(), 100);
        store.set("key1", b"value2".to_vec(), 40);

        assert_eq!(store.get("key1"), Some(b"value2".to_vec()));
        assert_eq!(store.size(), 1);
        assert_eq!(store.current_size(), 40);
        store.assert_consistent();
    }

    #[test]
    fn test_store_overwrite_promotes() {
        let store = store(2, 1000);

        store.set("a", vec![], 1);
        store.set("b", vec![], 1);
        store.set("a", vec![1], 1);
        store.set("c", vec![], 1);

        assert_eq!(key_set(&store), HashSet::from(["a".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_store_lru_eviction() {
        let store = store(3, 1000);

        store.set("key1", vec![], 1);
        store.set("key2", vec![], 1);
        store.set("key3", vec![], 1);
        store.set("key4", vec![], 1);

        assert_eq!(store.size(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let store = store(3, 1000);

        store.set("key1", vec![], 1);
        store.set("key2", vec![], 1);
        store.set("key3", vec![], 1);

        store.get("key1");
        store.set("key4", vec![], 1);

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_store_size_eviction() {
        let store = store(100, 100);

        store.set("a", vec![], 40);
        store.set("b", vec![], 40);
        store.set("c", vec![], 40);

        // 120 > 100 drops the oldest
        assert_eq!(key_set(&store), HashSet::from(["b".to_string(), "c".to_string()]));
        assert_eq!(store.current_size(), 80);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_size_eviction_is_exhaustive() {
        let store = store(100, 100);

        for key in ["a", "b", "c", "d", "e"] {
            store.set(key, vec![], 20);
        }
        store.set("big", vec![], 90);

        assert_eq!(store.keys(), vec!["big".to_string()]);
        assert_eq!(store.current_size(), 90);
        assert_eq!(store.stats().evictions, 5);
        store.assert_consistent();
    }

    #[test]
    fn test_store_growing_overwrite_evicts_others() {
        let store = store(100, 100);

        store.set("a", vec![], 30);
        store.set("b", vec![], 30);
        store.set("b", vec![], 80);

        assert_eq!(store.keys(), vec!["b".to_string()]);
        assert_eq!(store.current_size(), 80);
    }

    #[test]
    fn test_store_rejects_oversized_value() {
        let store = store(100, 100);
        store.set("a", vec![], 10);

        store.set("x", vec![], 101);

        assert!(!store.contains("x"));
        assert_eq!(store.size(), 1);
        assert_eq!(store.current_size(), 10);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_oversized_overwrite_removes_old_entry() {
        let store = store(100, 100);
        store.set("a", b"old".to_vec(), 10);

        store.set("a", b"huge".to_vec(), 500);

        assert!(!store.contains("a"));
        assert!(store.is_empty());
        assert_eq!(store.current_size(), 0);
        store.assert_consistent();
    }

    #[test]
    fn test_store_value_equal_to_max_size_fits() {
        let store = store(100, 100);

        store.set("exact", vec![], 100);

        assert!(store.contains("exact"));
        assert_eq!(store.current_size(), 100);
    }

    #[test]
    fn test_store_ttl_expiration_on_get() {
        let store: CacheStore<Vec<u8>> = CacheStore::new(100, 1000, Duration::from_millis(100));

        store.set("a", b"v".to_vec(), 1);
        assert!(store.get("a").is_some());

        sleep(Duration::from_millis(150));

        assert_eq!(store.get("a"), None);
        assert_eq!(store.size(), 0);
        assert_eq!(store.current_size(), 0);
        let stats = store.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        store.assert_consistent();
    }

    #[test]
    fn test_store_get_if_rejected_value_is_removed_as_miss() {
        let store = store(10, 1000);
        store.set("a", vec![1], 1);
        store.set("b", vec![2], 1);

        assert_eq!(store.get_if("a", |value| value.len() > 1), None);
        assert_eq!(store.get_if("b", |value| value == &vec![2]), Some(vec![2]));

        assert_eq!(key_set(&store), HashSet::from(["b".to_string()]));
        assert_eq!(store.current_size(), 1);
        let stats = store.stats();
        assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 1, 0));
        store.assert_consistent();
    }

    #[test]
    fn test_store_get_if_skips_predicate_for_expired_entry() {
        let store: CacheStore<u8> = CacheStore::new(10, 1000, Duration::from_millis(50));
        store.set("a", 1, 1);
        sleep(Duration::from_millis(80));

        assert_eq!(
            store.get_if("a", |_| panic!("expired value must not be inspected")),
            None
        );
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_store_contains_ignores_expired_without_removing() {
        let store: CacheStore<u8> = CacheStore::new(100, 1000, Duration::from_millis(30));
        store.set("a", 1, 1);

        sleep(Duration::from_millis(60));

        assert!(!store.contains("a"));
        assert_eq!(store.size(), 1);
        assert_eq!(store.stats().misses, 0);
    }

    #[test]
    fn test_store_get_does_not_refresh_timestamp() {
        let store: CacheStore<u8> = CacheStore::new(100, 1000, Duration::from_millis(80));
        store.set("a", 1, 1);

        sleep(Duration::from_millis(50));
        assert!(store.get("a").is_some());
        sleep(Duration::from_millis(50));

        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_store_set_refreshes_timestamp() {
        let store: CacheStore<u8> = CacheStore::new(100, 1000, Duration::from_millis(80));
        store.set("a", 1, 1);

        sleep(Duration::from_millis(50));
        store.set("a", 2, 1);
        sleep(Duration::from_millis(50));

        assert_eq!(store.get("a"), Some(2));
    }

    #[test]
    fn test_store_stats() {
        let store = store(100, 1000);

        store.set("key1", vec![], 7);
        store.get("key1");
        store.get("key1");
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 75.0).abs() < 1e-9);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.current_size, 7);
        assert_eq!(stats.max_size, 1000);
    }

    #[test]
    fn test_store_stats_no_lookups() {
        let store = store(10, 10);
        assert_eq!(store.stats().hit_rate, 0.0);
    }

    #[test]
    fn test_store_clear_resets_everything() {
        let store = store(2, 1000);

        store.set("a", vec![], 5);
        store.set("b", vec![], 5);
        store.set("c", vec![], 5);
        store.get("b");
        store.get("zzz");

        store.clear();

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.current_size, 0);
        assert_eq!((stats.hits, stats.misses, stats.evictions), (0, 0, 0));
        assert!(store.keys().is_empty());
        store.assert_consistent();

        store.set("d", vec![], 1);
        assert_eq!(store.get("d"), Some(vec![]));
    }

    #[test]
    fn test_store_end_to_end_scenario() {
        let store = store(2, 1000);

        store.set("a", vec![1], 1);
        store.set("b", vec![1], 1);
        store.set("c", vec![1], 1);

        assert_eq!(key_set(&store), HashSet::from(["b".to_string(), "c".to_string()]));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_cleanup_expired_disabled_without_ttl() {
        let store = store(10, 100);
        store.set("a", vec![], 1);

        assert_eq!(store.cleanup_expired(), 0);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_cleanup_expired_removes_old_tail() {
        let store: CacheStore<u8> = CacheStore::new(10, 100, Duration::from_millis(60));

        store.set("old1", 1, 10);
        store.set("old2", 1, 10);
        sleep(Duration::from_millis(100));
        store.set("fresh", 1, 10);

        assert_eq!(store.cleanup_expired(), 2);
        assert_eq!(store.keys(), vec!["fresh".to_string()]);
        assert_eq!(store.current_size(), 10);
        // Sweeping is not eviction
        assert_eq!(store.stats().evictions, 0);
        store.assert_consistent();
    }

    /// Leaves a stale entry promoted above a live one at the LRU end.
    fn promoted_stale_entry(sweep: SweepStrategy) -> CacheStore<u8> {
        let store = CacheStore::new(10, 100, Duration::from_millis(200)).with_sweep(sweep);

        store.set("stale", 1, 1);
        sleep(Duration::from_millis(100));
        store.set("fresh", 1, 1);
        // Promotes without refreshing the timestamp
        assert!(store.get("stale").is_some());
        sleep(Duration::from_millis(150));

        assert_eq!(store.keys_by_recency(), vec!["stale", "fresh"]);
        store
    }

    #[test]
    fn test_cleanup_stops_at_first_fresh_entry() {
        let store = promoted_stale_entry(SweepStrategy::StopAtFirstFresh);

        assert_eq!(store.cleanup_expired(), 0);
        assert_eq!(store.size(), 2);

        // Still caught lazily
        assert_eq!(store.get("stale"), None);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_cleanup_full_scan_reaches_promoted_stale_entries() {
        let store = promoted_stale_entry(SweepStrategy::FullScan);

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.keys(), vec!["fresh".to_string()]);
        assert_eq!(store.current_size(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_store_concurrent_access_keeps_invariants() {
        use std::sync::Arc;
        use std::thread;

        let store: Arc<CacheStore<Vec<u8>>> = Arc::new(CacheStore::new(64, 4096, Duration::ZERO));
        let mut handles = Vec::new();

        for writer in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    store.set(format!("w{}-{}", writer, i), vec![0; 8], 8 + (i % 50) as u64);
                }
            }));
        }
        for reader in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let _ = store.get(&format!("w{}-{}", reader, i));
                    if i % 97 == 0 {
                        store.delete(&format!("w{}-{}", (reader + 1) % 4, i));
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        store.assert_consistent();
        assert!(store.size() <= 64);
        assert!(store.current_size() <= 4096);
        let stats = store.stats();
        assert_eq!(stats.hits + stats.misses, 2000);
    }
}
