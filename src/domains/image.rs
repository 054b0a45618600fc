//! Image Cache
//!
//! Holds rendered image variants so resizing only happens once per TTL.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::domains::{CategoryCounters, CategoryStats, Sweepable};

// == Image Variant ==
/// Rendered size of a listing photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageVariant {
    Original,
    Large,
    Medium,
    Thumbnail,
}

impl ImageVariant {
    pub const ALL: [ImageVariant; 4] = [
        ImageVariant::Original,
        ImageVariant::Large,
        ImageVariant::Medium,
        ImageVariant::Thumbnail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageVariant::Original => "original",
            ImageVariant::Large => "large",
            ImageVariant::Medium => "medium",
            ImageVariant::Thumbnail => "thumbnail",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ImageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

// == Cached Image ==
/// Encoded image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl CachedImage {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Byte cost declared to the engine.
    pub fn byte_size(&self) -> u64 {
        (self.bytes.len() + self.content_type.len()) as u64
    }
}

// == Image Cache Stats ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageCacheStats {
    pub engine: CacheStats,
    pub variants: BTreeMap<&'static str, CategoryStats>,
}

// == Image Cache ==
/// Cache of rendered images keyed `image:{image_id}:{variant}`.
#[derive(Debug)]
pub struct ImageCache {
    store: CacheStore<Arc<CachedImage>>,
    variants: [CategoryCounters; 4],
}

impl ImageCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            store: CacheStore::from_config(config),
            variants: Default::default(),
        }
    }

    /// Key for one variant of one image.
    pub fn key(image_id: u64, variant: ImageVariant) -> String {
        format!("image:{}:{}", image_id, variant)
    }

    pub fn get(&self, image_id: u64, variant: ImageVariant) -> Option<Arc<CachedImage>> {
        let found = self.store.get(&Self::key(image_id, variant));
        self.variants[variant.index()].record(&found);
        found
    }

    /// Caches a rendered variant and returns the shared handle to it.
    pub fn put(&self, image_id: u64, variant: ImageVariant, image: CachedImage) -> Arc<CachedImage> {
        let size = image.byte_size();
        let image = Arc::new(image);
        self.store
            .set(Self::key(image_id, variant), Arc::clone(&image), size);
        image
    }

    /// Drops every cached variant of an image, returning how many were held.
    pub fn invalidate(&self, image_id: u64) -> usize {
        let removed = ImageVariant::ALL
            .into_iter()
            .filter(|variant| self.store.delete(&Self::key(image_id, *variant)))
            .count();
        if removed > 0 {
            debug!("Invalidated {} variants of image {}", removed, image_id);
        }
        removed
    }

    /// Full reset of the engine and the per-variant counters.
    pub fn clear(&self) {
        self.store.clear();
        for counters in &self.variants {
            counters.reset();
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    pub fn stats(&self) -> ImageCacheStats {
        ImageCacheStats {
            engine: self.store.stats(),
            variants: ImageVariant::ALL
                .into_iter()
                .map(|variant| (variant.as_str(), self.variants[variant.index()].snapshot()))
                .collect(),
        }
    }
}

impl Sweepable for ImageCache {
    fn name(&self) -> &'static str {
        "images"
    }

    fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }
}
