//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Cache operations are
//! short and non-blocking, so handlers call the cache directly.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{ttl_millis, CacheBuilder, ExpiringCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// String-keyed cache served over HTTP
pub type SharedCache = Arc<ExpiringCache<String, String>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe expiring cache
    pub cache: SharedCache,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: ExpiringCache<String, String>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the expiry worker when a TTL is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = CacheBuilder::from_config(config).build()?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair. A null value removes the key; a request without
/// a key is accepted and ignored.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let Some(key) = req.defined_key().map(str::to_owned) else {
        return Ok(Json(SetResponse::ignored()));
    };

    let response = match req.value {
        Some(_) => SetResponse::stored(key.clone()),
        None => SetResponse::removed(key.clone()),
    };
    state.cache.add(key, req.value);

    Ok(Json(response))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deleting a missing key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.remove(&key);
    Json(DeleteResponse::new(key))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    Json(ClearResponse::new())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    let ttl_ms = state.cache.ttl().map(ttl_millis);

    Json(StatsResponse::new(&stats, ttl_ms))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
