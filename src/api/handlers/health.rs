//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Database unreachable or hit queue closed
///
/// A cache without a snapshot is reported but does not degrade the service:
/// lookups load it on demand and fall back to "no redirect".
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "hit_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "redirect_cache": { "status": "ok", "message": "9 rules, 48s old (ttl 300s), 12 keys" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let queue_check = check_hit_queue(&state);
    let cache_check = check_cache(&state).await;

    let all_healthy = db_check.is_ok() && queue_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            hit_queue: queue_check,
            redirect_cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.redirect_service.check_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_hit_queue(state: &AppState) -> CheckStatus {
    if state.hit_logger.is_closed() {
        CheckStatus::error("Hit queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.hit_logger.capacity()))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let stats = state.redirect_cache.stats().await;

    match stats.snapshot_age {
        Some(age) => CheckStatus::ok(format!(
            "{} rules, {}s old (ttl {}s), {} keys",
            stats.snapshot_rules,
            age.as_secs(),
            state.redirect_cache.ttl().as_secs(),
            stats.entries
        )),
        None => CheckStatus::ok("Snapshot not loaded"),
    }
}
