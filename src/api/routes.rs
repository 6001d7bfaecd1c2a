//! API Routes
//!
//! Configures the Axum router with all driver endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    count_handler, get_handler, health_handler, page_handler, replay_handler, stats_handler,
    store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /page?url=` - Fetch a page through the cache
/// - `GET /count?url=` - Access count of a page
/// - `PUT /store` - Store data under a generated key
/// - `GET /get/:key` - Read stored data
/// - `GET /replay/:identity` - Recorded call history
/// - `GET /stats` - Page cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/page", get(page_handler))
        .route("/count", get(count_handler))
        .route("/store", put(store_handler))
        .route("/get/:key", get(get_handler))
        .route("/replay/:identity", get(replay_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
