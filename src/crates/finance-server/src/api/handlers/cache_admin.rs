//! Projection cache administration handlers

use axum::extract::State;

use crate::api::{
    error::ApiResult,
    models::{CacheStatsResponse, CacheSweepResponse},
    response,
    routes::AppState,
};

/// Global cache statistics
///
/// GET /api/v1/financial-projection/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> ApiResult<impl axum::response::IntoResponse> {
    let store = state.cache_store();
    let stats = store.stats().await?;
    Ok(response::ok(CacheStatsResponse {
        stats,
        ttl_seconds: store.default_ttl().as_secs(),
    }))
}

/// Physically remove expired entries now
///
/// POST /api/v1/financial-projection/cache/sweep
pub async fn sweep_cache(State(state): State<AppState>) -> ApiResult<impl axum::response::IntoResponse> {
    let removed = state.cache_store().sweep_expired().await?;
    Ok(response::ok(CacheSweepResponse { removed }))
}
