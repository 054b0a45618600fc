//! Configuration Module
//!
//! Loads cache bounds and service settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_MAX_SIZE};
use crate::error::{AppError, Result};

const MIB: u64 = 1024 * 1024;

// == Sweep Strategy ==
/// How `cleanup_expired` walks the recency list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepStrategy {
    /// Walk from the LRU end and stop at the first live entry.
    ///
    /// Entries promoted by `get` keep their old timestamp, so an expired
    /// entry closer to the head can be missed until its next lookup.
    #[default]
    StopAtFirstFresh,
    /// Walk the whole list and remove every expired entry.
    FullScan,
}

impl FromStr for SweepStrategy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" | "stop_at_first_fresh" => Ok(SweepStrategy::StopAtFirstFresh),
            "full" | "full_scan" => Ok(SweepStrategy::FullScan),
            _ => Err(()),
        }
    }
}

// == Cache Config ==
/// Construction parameters for one cache instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of entries; 0 selects the default
    pub capacity: usize,
    /// Maximum sum of declared entry sizes in bytes; 0 selects the default
    pub max_size: u64,
    /// Entry lifetime; zero means entries never expire
    pub ttl: Duration,
    /// Active expiration walk
    pub sweep: SweepStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_size: DEFAULT_MAX_SIZE,
            ttl: Duration::ZERO,
            sweep: SweepStrategy::default(),
        }
    }
}

impl CacheConfig {
    /// Reads `{PREFIX}_CAPACITY`, `{PREFIX}_MAX_BYTES`, `{PREFIX}_TTL_SECS`
    /// and `{PREFIX}_SWEEP`, falling back to `defaults` when unset.
    pub fn from_env_prefixed(prefix: &str, defaults: CacheConfig) -> Result<Self> {
        Ok(Self {
            capacity: env_or(&format!("{}_CAPACITY", prefix), defaults.capacity)?,
            max_size: env_or(&format!("{}_MAX_BYTES", prefix), defaults.max_size)?,
            ttl: Duration::from_secs(env_or(
                &format!("{}_TTL_SECS", prefix),
                defaults.ttl.as_secs(),
            )?),
            sweep: env_or(&format!("{}_SWEEP", prefix), defaults.sweep)?,
        })
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Rendered image variants
    pub images: CacheConfig,
    /// Listings, search pages and aggregates
    pub properties: CacheConfig,
    /// Background sweep interval in seconds; 0 disables the sweep
    pub cleanup_interval: u64,
    /// HTTP port of the monitoring API
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `IMAGE_CACHE_CAPACITY` / `_MAX_BYTES` / `_TTL_SECS` / `_SWEEP`
    ///   (default: 500 entries, 200 MiB, 3600s, fast)
    /// - `PROPERTY_CACHE_CAPACITY` / `_MAX_BYTES` / `_TTL_SECS` / `_SWEEP`
    ///   (default: 1000 entries, 50 MiB, 300s, fast)
    /// - `CLEANUP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Unset variables use the default; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            images: CacheConfig::from_env_prefixed("IMAGE_CACHE", defaults.images)?,
            properties: CacheConfig::from_env_prefixed("PROPERTY_CACHE", defaults.properties)?,
            cleanup_interval: env_or("CLEANUP_INTERVAL_SECS", defaults.cleanup_interval)?,
            server_port: env_or("SERVER_PORT", defaults.server_port)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images: CacheConfig {
                capacity: 500,
                max_size: 200 * MIB,
                ttl: Duration::from_secs(3600),
                sweep: SweepStrategy::StopAtFirstFresh,
            },
            properties: CacheConfig {
                capacity: 1000,
                max_size: 50 * MIB,
                ttl: Duration::from_secs(300),
                sweep: SweepStrategy::StopAtFirstFresh,
            },
            cleanup_interval: 60,
            server_port: 3000,
        }
    }
}

/// Parses `var` if it is set, otherwise returns `default`.
fn env_or<T: FromStr>(var: &str, default: T) -> Result<T> {
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| AppError::InvalidConfig {
            var: var.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
