//! Fallback for requests that did not redirect.

use axum::http::Uri;
use serde_json::json;

use crate::error::AppError;

/// Answers requests that reach content resolution.
///
/// Page rendering lives outside this service, so every path that was not
/// redirected is reported as not found.
pub async fn page_not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Page not found", json!({ "path": uri.path() }))
}
