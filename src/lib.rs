//! Rental Cache - bounded in-memory caches for a rental listing service
//!
//! An LRU engine bounded by entry count and byte size with TTL expiration,
//! typed caches for images and listing data, a background sweep and a
//! small monitoring API.

pub mod api;
pub mod cache;
pub mod config;
pub mod domains;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore};
pub use config::{CacheConfig, Config, SweepStrategy};
pub use tasks::spawn_cleanup_task;
