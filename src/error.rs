//! Error types for the cache service
//!
//! The cache engine itself never fails; these errors cover configuration
//! loading and the monitoring API around it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the service surrounding the caches.
#[derive(Error, Debug)]
pub enum AppError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidConfig { var: String, value: String },

    /// A cache name that the service does not know about
    #[error("Unknown cache: {0}")]
    UnknownCache(String),

    /// Socket or other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UnknownCache(_) => StatusCode::NOT_FOUND,
            AppError::InvalidConfig { .. } => StatusCode::BAD_REQUEST,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, AppError>;
