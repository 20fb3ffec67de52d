//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: store, hit queue, redirect cache (public)
//! - `/api/*`        - Admin API (Bearer token required)
//! - `/*`            - Site pages: redirect rules first, then content resolution
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Redirects** - Cached rule lookup ahead of page handling
//! - **Rate limiting** - Per-IP token bucket on the admin API
//! - **Authentication** - Bearer token on the admin API
//!
//! Paths are not rewritten before routing; the redirect cache
//! applies its own normalization so `/Tours/` and `/tours` hit the same rule.

use crate::api;
use crate::api::handlers::{health_handler, page_not_found_handler};
use crate::api::middleware::{auth, rate_limit, redirect, tracing};
use crate::state::AppState;
use axum::routing::{any, get};
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::admin_layer());

    let pages = Router::new()
        .route("/", any(page_not_found_handler))
        .route("/{*path}", any(page_not_found_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            redirect::layer,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(pages)
        .with_state(state)
        .layer(tracing::layer())
}
