//! Request DTOs for the driver API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::data::Data;

/// Query string for the page and count endpoints (`?url=...`)
#[derive(Debug, Clone, Deserialize)]
pub struct UrlQuery {
    /// The resource to fetch or inspect
    pub url: String,
}

impl UrlQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Some("URL must start with http:// or https://".to_string());
        }
        None
    }
}

/// Request body for the STORE operation (PUT /store)
///
/// # Fields
/// - `data`: a string or a number to store under a generated key
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub data: Data,
}
