//! API Routes
//!
//! Configures the Axum router with the monitoring endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    all_stats_handler, clear_handler, health_handler, keys_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Statistics of every cache
/// - `GET /stats/:cache` - Statistics of one cache
/// - `GET /keys/:cache` - Keys held by one cache
/// - `DELETE /cache/:cache` - Clear one cache
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(all_stats_handler))
        .route("/stats/:cache", get(stats_handler))
        .route("/keys/:cache", get(keys_handler))
        .route("/cache/:cache", delete(clear_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
