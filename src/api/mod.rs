//! API Module
//!
//! HTTP handlers and routing for the cache monitoring API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Statistics of every cache
//! - `GET /stats/:cache` - Statistics of one cache
//! - `GET /keys/:cache` - Keys held by one cache
//! - `DELETE /cache/:cache` - Clear one cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
