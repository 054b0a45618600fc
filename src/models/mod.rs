//! Response models for the monitoring API
//!
//! DTOs serialized into the HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    AllStatsResponse, CacheStatsResponse, ClearResponse, HealthResponse, KeysResponse,
};
