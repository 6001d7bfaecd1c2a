//! API Handlers
//!
//! HTTP request handlers for each driver endpoint. Each one is a thin shell
//! over the fetch-through cache, the data cache or replay.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::data::DataCache;
use crate::error::{CacheError, Result};
use crate::fetch::{FetchThroughCache, Producer};
use crate::models::{
    CountResponse, GetResponse, HealthResponse, PageResponse, ReplayResponse, StatsResponse,
    StoreRequest, StoreResponse, UrlQuery,
};
use crate::replay::replay;
use crate::store::KeyValueStore;

/// Page producer shared by all handlers.
pub type PageProducer = Arc<dyn Producer<Output = String>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing key-value store
    pub store: Arc<dyn KeyValueStore>,
    /// Fetch-through cache for remote pages
    pub pages: Arc<FetchThroughCache<PageProducer>>,
    /// Random-key data cache with accounted writes
    pub data: DataCache,
}

impl AppState {
    /// Creates a new AppState around `store` and `producer`.
    pub fn new(store: Arc<dyn KeyValueStore>, producer: PageProducer, config: &Config) -> Self {
        let pages = FetchThroughCache::new(store.clone(), producer, config.cache_ttl)
            .with_single_flight(config.single_flight);
        let data = DataCache::new(store.clone(), config.track_history);

        Self {
            store,
            pages: Arc::new(pages),
            data,
        }
    }
}

/// Handler for GET /page?url=...
///
/// Returns the page body, from the cache while fresh.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let fetched = state.pages.get_with_outcome(&query.url).await?;
    info!(
        url = %query.url,
        outcome = ?fetched.outcome,
        access_count = fetched.access_count,
        "page served"
    );

    Ok(Json(PageResponse::new(query.url, fetched)))
}

/// Handler for GET /count?url=...
///
/// Returns how often a page has been requested.
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<CountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(CountResponse {
        url: query.url,
        access_count,
    }))
}

/// Handler for PUT /store
///
/// Stores the data under a generated key and returns the key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.data.store(req.data).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Retrieves stored data as text.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .data
        .get_str(&key)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /replay/:identity
///
/// Returns the recorded call history of an accounted operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let replay = replay(state.store.as_ref(), &identity).await?;

    Ok(Json(ReplayResponse::from(replay)))
}

/// Handler for GET /stats
///
/// Returns page cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.pages.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
