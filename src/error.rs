//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the store, the policy wrappers and the HTTP driver.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (HTTP layer only, lookups return `Option`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Operation used against a key holding the other kind of value
    #[error("Wrong type for key '{key}': expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Stored bytes could not be converted to the requested type
    #[error("Cannot decode value at '{key}': {reason}")]
    Decode { key: String, reason: String },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Wrapped operation failed
    #[error("Producer failed: {0}")]
    Producer(String),

    /// Remote resource could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Backing store could not serve the request; raised by store
    /// implementations, never retried
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Builds a decode error for `key`.
    pub fn decode(key: &str, reason: impl Into<String>) -> Self {
        CacheError::Decode {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status the driver answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::WrongType { .. } => StatusCode::CONFLICT,
            CacheError::Decode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Producer(_) | CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
