//! API Handlers
//!
//! HTTP request handlers for the monitoring endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::domains::{ImageCache, PropertyCache};
use crate::error::{AppError, Result};
use crate::models::{
    AllStatsResponse, CacheStatsResponse, ClearResponse, HealthResponse, KeysResponse,
};

/// Application state shared across all handlers.
///
/// The caches lock internally, so handlers share them through plain `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub images: Arc<ImageCache>,
    pub properties: Arc<PropertyCache>,
}

/// One of the caches the state owns, resolved from a path segment.
enum NamedCache<'a> {
    Images(&'a ImageCache),
    Properties(&'a PropertyCache),
}

impl AppState {
    /// Creates a new AppState with the given caches.
    pub fn new(images: ImageCache, properties: PropertyCache) -> Self {
        Self {
            images: Arc::new(images),
            properties: Arc::new(properties),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ImageCache::new(&config.images),
            PropertyCache::new(&config.properties),
        )
    }

    fn named(&self, name: &str) -> Result<NamedCache<'_>> {
        match name {
            "images" => Ok(NamedCache::Images(&self.images)),
            "properties" => Ok(NamedCache::Properties(&self.properties)),
            other => Err(AppError::UnknownCache(other.to_string())),
        }
    }
}

/// Handler for GET /stats
///
/// Returns the statistics of every cache.
pub async fn all_stats_handler(State(state): State<AppState>) -> Json<AllStatsResponse> {
    Json(AllStatsResponse {
        images: state.images.stats(),
        properties: state.properties.stats(),
    })
}

/// Handler for GET /stats/:cache
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(cache): Path<String>,
) -> Result<Json<CacheStatsResponse>> {
    let stats = match state.named(&cache)? {
        NamedCache::Images(images) => CacheStatsResponse::Images(images.stats()),
        NamedCache::Properties(properties) => CacheStatsResponse::Properties(properties.stats()),
    };
    Ok(Json(stats))
}

/// Handler for GET /keys/:cache
///
/// Lists held keys for diagnostics; the order carries no meaning.
pub async fn keys_handler(
    State(state): State<AppState>,
    Path(cache): Path<String>,
) -> Result<Json<KeysResponse>> {
    let keys = match state.named(&cache)? {
        NamedCache::Images(images) => images.keys(),
        NamedCache::Properties(properties) => properties.keys(),
    };
    Ok(Json(KeysResponse::new(cache, keys)))
}

/// Handler for DELETE /cache/:cache
///
/// Fully resets the named cache, counters included.
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(cache): Path<String>,
) -> Result<Json<ClearResponse>> {
    match state.named(&cache)? {
        NamedCache::Images(images) => images.clear(),
        NamedCache::Properties(properties) => properties.clear(),
    }
    info!("Cache '{}' cleared via API", cache);
    Ok(Json(ClearResponse::new(cache)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
