//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, PromptCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, LookupRequest, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache does its own locking, so handlers share it through a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe response cache
    pub cache: Arc<PromptCache<Value>>,
    /// TTL applied when a set request omits one
    pub default_ttl: i64,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: PromptCache<Value>, default_ttl: i64) -> Self {
        Self {
            cache: Arc::new(cache),
            default_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = PromptCache::new(config.capacity)?;
        Ok(Self::new(cache, config.default_ttl))
    }
}

fn lookup_key(req: &LookupRequest) -> Result<CacheKey> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }
    Ok(CacheKey::derive(&req.tenant_id, &req.model, &req.prompt))
}

/// Handler for PUT /set
///
/// Caches a response for (tenant, model, prompt) with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let key = lookup_key(&req.lookup)?;
    let ttl = req.ttl.unwrap_or(state.default_ttl);
    let shown = key.to_string();
    state.cache.set_key(key, req.value, ttl)?;
    debug!(key = %shown, ttl, "cached response");

    Ok(Json(SetResponse::new(shown)))
}

/// Handler for POST /get
///
/// Looks up a cached response; misses and expired entries are 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<GetResponse>> {
    let key = lookup_key(&req)?;

    match state.cache.get_key(&key) {
        Some(value) => Ok(Json(GetResponse::new(key.to_string(), value))),
        None => Err(CacheError::NotFound(key.to_string())),
    }
}

/// Handler for DELETE /del
///
/// Removes a cached response. Absent keys are not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<DeleteResponse>> {
    let key = lookup_key(&req)?;
    let removed = state.cache.delete_key(&key);

    Ok(Json(DeleteResponse::new(key.to_string(), removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
