//! Response DTOs for the monitoring API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::domains::{ImageCacheStats, PropertyCacheStats};

/// Statistics of a single named cache (GET /stats/:cache)
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CacheStatsResponse {
    Images(ImageCacheStats),
    Properties(PropertyCacheStats),
}

/// Statistics of every cache (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct AllStatsResponse {
    pub images: ImageCacheStats,
    pub properties: PropertyCacheStats,
}

/// Keys currently held by a cache (GET /keys/:cache)
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Cache name
    pub cache: String,
    /// Number of keys returned
    pub count: usize,
    /// Keys in unspecified order
    pub keys: Vec<String>,
}

impl KeysResponse {
    pub fn new(cache: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            cache: cache.into(),
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for DELETE /cache/:cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// The cache that was cleared
    pub cache: String,
}

impl ClearResponse {
    pub fn new(cache: impl Into<String>) -> Self {
        let cache = cache.into();
        Self {
            message: format!("Cache '{}' cleared", cache),
            cache,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
