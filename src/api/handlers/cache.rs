//! Handlers for redirect cache diagnostics and manual invalidation.

use axum::{Json, extract::State, http::StatusCode};

use crate::infrastructure::cache::CacheStats;
use crate::state::AppState;

/// Reports redirect cache size and age.
///
/// # Endpoint
///
/// `GET /api/cache`
///
/// # Response
///
/// ```json
/// {
///   "entries": 12,
///   "snapshot_loaded": true,
///   "snapshot_rules": 9,
///   "snapshot_age_ms": 48211
/// }
/// ```
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.redirect_cache.stats().await)
}

/// Clears the redirect cache.
///
/// # Endpoint
///
/// `DELETE /api/cache`
///
/// For rule changes made directly in the database; API writes invalidate on
/// their own.
pub async fn invalidate_cache_handler(State(state): State<AppState>) -> StatusCode {
    state.redirect_cache.invalidate().await;
    StatusCode::NO_CONTENT
}
