//! Response DTOs for the driver API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::fetch::{FetchStats, Fetched, Outcome};
use crate::replay::{Replay, ReplayEntry};

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub content: String,
    /// "hit" or "miss"
    pub cache: Outcome,
    /// Accesses of this URL, this one included
    pub access_count: i64,
}

impl PageResponse {
    /// Creates a new PageResponse from a fetch result
    pub fn new(url: impl Into<String>, fetched: Fetched<String>) -> Self {
        Self {
            url: url.into(),
            content: fetched.value,
            cache: fetched.outcome,
            access_count: fetched.access_count,
        }
    }
}

/// Response body for GET /count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub url: String,
    pub access_count: i64,
}

/// Response body for PUT /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    /// Generated key holding the data
    pub key: String,
}

impl StoreResponse {
    /// Creates a new StoreResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Data stored under '{}'", key),
            key,
        }
    }
}

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for GET /replay/:identity
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub identity: String,
    pub calls: usize,
    pub entries: Vec<ReplayEntry>,
    /// Human-readable rendering, one line per call after the summary
    pub lines: Vec<String>,
}

impl From<Replay> for ReplayResponse {
    fn from(replay: Replay) -> Self {
        let lines = replay.lines();
        Self {
            identity: replay.identity,
            calls: replay.calls,
            entries: replay.entries,
            lines,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Page requests served from the store
    pub hits: u64,
    /// Page requests that went to the network
    pub misses: u64,
    /// Failed network fetches
    pub producer_errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<FetchStats> for StatsResponse {
    fn from(stats: FetchStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            producer_errors: stats.producer_errors,
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

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
