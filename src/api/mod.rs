//! API Module
//!
//! HTTP handlers and routing for the driver REST API.
//!
//! # Endpoints
//! - `GET /page?url=` - Fetch a page through the cache
//! - `GET /count?url=` - Access count of a page
//! - `PUT /store` - Store data under a generated key
//! - `GET /get/:key` - Read stored data
//! - `GET /replay/:identity` - Recorded call history
//! - `GET /stats` - Page cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
