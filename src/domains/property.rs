//! Property Cache
//!
//! Holds serialized listing details, search result pages and aggregated
//! statistics. All three share one engine, so values are a closed enum and
//! every read checks it got the variant its key promises.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::domains::{CategoryCounters, CategoryStats, Sweepable};

const LISTING_PREFIX: &str = "property:";
const SEARCH_PREFIX: &str = "search:";
const AGGREGATE_PREFIX: &str = "stats:";

// == Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyCategory {
    Listing,
    Search,
    Aggregate,
}

impl PropertyCategory {
    pub const ALL: [PropertyCategory; 3] = [
        PropertyCategory::Listing,
        PropertyCategory::Search,
        PropertyCategory::Aggregate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::Listing => "listing",
            PropertyCategory::Search => "search",
            PropertyCategory::Aggregate => "aggregate",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Payload ==
/// JSON bytes tagged with what they encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPayload {
    Listing(Arc<[u8]>),
    SearchPage(Arc<[u8]>),
    Aggregate(Arc<[u8]>),
}

impl PropertyPayload {
    pub fn category(&self) -> PropertyCategory {
        match self {
            PropertyPayload::Listing(_) => PropertyCategory::Listing,
            PropertyPayload::SearchPage(_) => PropertyCategory::Search,
            PropertyPayload::Aggregate(_) => PropertyCategory::Aggregate,
        }
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        match self {
            PropertyPayload::Listing(bytes)
            | PropertyPayload::SearchPage(bytes)
            | PropertyPayload::Aggregate(bytes) => bytes,
        }
    }

    fn into_bytes(self) -> Arc<[u8]> {
        match self {
            PropertyPayload::Listing(bytes)
            | PropertyPayload::SearchPage(bytes)
            | PropertyPayload::Aggregate(bytes) => bytes,
        }
    }
}

// == Search Query ==
/// Listing search parameters.
///
/// Filters live in a sorted map, so two queries with the same filters in a
/// different order produce the same cache key. Names are lowercased and
/// values trimmed whether the query is built or deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "deserialize_filters")]
    pub filters: BTreeMap<String, String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

fn normalize_filter(name: &str, value: &str) -> (String, String) {
    (name.trim().to_ascii_lowercase(), value.trim().to_string())
}

fn deserialize_filters<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .iter()
        .map(|(name, value)| normalize_filter(name, value))
        .collect())
}

/// Escapes the characters the key format uses as separators.
fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for ch in part.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            '&' => escaped.push_str("%26"),
            '=' => escaped.push_str("%3D"),
            '|' => escaped.push_str("%7C"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl SearchQuery {
    pub fn new() -> Self {
        Self {
            filters: BTreeMap::new(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }

    /// Adds a filter. Names are case-insensitive; values are trimmed.
    pub fn filter(mut self, name: &str, value: &str) -> Self {
        let (name, value) = normalize_filter(name, value);
        self.filters.insert(name, value);
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Canonical key: `search:{name=value&...}|page={n}|size={n}`.
    ///
    /// Filters are normalized again here since `filters` is public, and
    /// separator characters inside names and values are percent-escaped.
    pub fn cache_key(&self) -> String {
        let normalized: BTreeMap<String, String> = self
            .filters
            .iter()
            .map(|(name, value)| normalize_filter(name, value))
            .collect();
        let filters: Vec<String> = normalized
            .iter()
            .map(|(name, value)| {
                format!("{}={}", escape_key_part(name), escape_key_part(value))
            })
            .collect();
        format!(
            "{}{}|page={}|size={}",
            SEARCH_PREFIX,
            filters.join("&"),
            self.page,
            self.page_size
        )
    }
}

// == Property Cache Stats ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyCacheStats {
    pub engine: CacheStats,
    pub categories: BTreeMap<&'static str, CategoryStats>,
}

// == Property Cache ==
#[derive(Debug)]
pub struct PropertyCache {
    store: CacheStore<PropertyPayload>,
    categories: [CategoryCounters; 3],
}

impl PropertyCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            store: CacheStore::from_config(config),
            categories: Default::default(),
        }
    }

    pub fn listing_key(property_id: u64) -> String {
        format!("{}{}", LISTING_PREFIX, property_id)
    }

    pub fn aggregate_key(scope: &str) -> String {
        format!("{}{}", AGGREGATE_PREFIX, scope)
    }

    // == Listings ==
    pub fn get_listing(&self, property_id: u64) -> Option<Arc<[u8]>> {
        self.lookup(&Self::listing_key(property_id), PropertyCategory::Listing)
    }

    pub fn put_listing(&self, property_id: u64, json: impl Into<Arc<[u8]>>) {
        self.store_payload(
            Self::listing_key(property_id),
            PropertyPayload::Listing(json.into()),
        );
    }

    /// Drops a listing and every cached search page, since any page may
    /// contain the changed listing. Returns the number of entries removed.
    pub fn invalidate_listing(&self, property_id: u64) -> usize {
        let mut removed = usize::from(self.store.delete(&Self::listing_key(property_id)));
        removed += self.delete_prefixed(SEARCH_PREFIX);
        debug!(
            "Invalidated listing {} ({} entries removed)",
            property_id, removed
        );
        removed
    }

    // == Search Pages ==
    pub fn get_search(&self, query: &SearchQuery) -> Option<Arc<[u8]>> {
        self.lookup(&query.cache_key(), PropertyCategory::Search)
    }

    pub fn put_search(&self, query: &SearchQuery, json: impl Into<Arc<[u8]>>) {
        self.store_payload(query.cache_key(), PropertyPayload::SearchPage(json.into()));
    }

    // == Aggregates ==
    pub fn get_aggregate(&self, scope: &str) -> Option<Arc<[u8]>> {
        self.lookup(&Self::aggregate_key(scope), PropertyCategory::Aggregate)
    }

    pub fn put_aggregate(&self, scope: &str, json: impl Into<Arc<[u8]>>) {
        self.store_payload(
            Self::aggregate_key(scope),
            PropertyPayload::Aggregate(json.into()),
        );
    }

    /// Drops every cached aggregate.
    pub fn invalidate_aggregates(&self) -> usize {
        self.delete_prefixed(AGGREGATE_PREFIX)
    }

    // == Maintenance ==
    /// Full reset of the engine and the per-category counters.
    pub fn clear(&self) {
        self.store.clear();
        for counters in &self.categories {
            counters.reset();
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    pub fn stats(&self) -> PropertyCacheStats {
        PropertyCacheStats {
            engine: self.store.stats(),
            categories: PropertyCategory::ALL
                .into_iter()
                .map(|category| {
                    (
                        category.as_str(),
                        self.categories[category.index()].snapshot(),
                    )
                })
                .collect(),
        }
    }

    // == Internals ==
    /// Reads `key`, treating a payload of the wrong category as a miss and
    /// discarding it.
    fn lookup(&self, key: &str, expected: PropertyCategory) -> Option<Arc<[u8]>> {
        let found = self
            .store
            .get_if(key, |payload| {
                let found = payload.category();
                if found != expected {
                    warn!(
                        "Discarding '{}': expected {} payload, found {}",
                        key, expected, found
                    );
                }
                found == expected
            })
            .map(PropertyPayload::into_bytes);
        self.categories[expected.index()].record(&found);
        found
    }

    fn store_payload(&self, key: String, payload: PropertyPayload) {
        let size = (key.len() + payload.bytes().len()) as u64;
        self.store.set(key, payload, size);
    }

    fn delete_prefixed(&self, prefix: &str) -> usize {
        self.store
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .filter(|key| self.store.delete(key))
            .count()
    }
}

impl Sweepable for PropertyCache {
    fn name(&self) -> &'static str {
        "properties"
    }

    fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }
}
