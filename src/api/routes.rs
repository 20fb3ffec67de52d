//! Admin API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    cache_stats_handler, create_redirect_handler, delete_redirect_handler, get_redirect_handler,
    invalidate_cache_handler, redirect_list_handler, update_redirect_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /redirects`        - List all redirect rules
/// - `POST   /redirects`        - Create a rule
/// - `GET    /redirects/{id}`   - Fetch a single rule
/// - `PATCH  /redirects/{id}`   - Partially update a rule
/// - `DELETE /redirects/{id}`   - Delete a rule
/// - `GET    /cache`            - Redirect cache diagnostics
/// - `DELETE /cache`            - Drop all cached redirect state
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/redirects",
            get(redirect_list_handler).post(create_redirect_handler),
        )
        .route(
            "/redirects/{id}",
            get(get_redirect_handler)
                .patch(update_redirect_handler)
                .delete(delete_redirect_handler),
        )
        .route(
            "/cache",
            get(cache_stats_handler).delete(invalidate_cache_handler),
        )
}
