//! Handlers for redirect rule management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::redirect_rule::{
    CreateRedirectRequest, RedirectRuleItem, RedirectRuleListResponse, UpdateRedirectRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists all redirect rules, newest first.
///
/// # Endpoint
///
/// `GET /api/redirects`
pub async fn redirect_list_handler(
    State(state): State<AppState>,
) -> Result<Json<RedirectRuleListResponse>, AppError> {
    let rules = state.redirect_service.list_rules().await?;

    Ok(Json(RedirectRuleListResponse {
        items: rules.into_iter().map(RedirectRuleItem::from).collect(),
    }))
}

/// Returns a single redirect rule.
///
/// # Endpoint
///
/// `GET /api/redirects/{id}`
///
/// # Errors
///
/// Returns 404 if the rule does not exist.
pub async fn get_redirect_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<RedirectRuleItem>, AppError> {
    let rule = state.redirect_service.get_rule(id).await?;
    Ok(Json(rule.into()))
}

/// Creates a redirect rule.
///
/// # Endpoint
///
/// `POST /api/redirects`
///
/// # Request Body
///
/// ```json
/// {
///   "source_path": "/tours/iceland-2024",
///   "destination_path": "/tours/iceland",
///   "kind": "permanent",
///   "is_active": true
/// }
/// ```
///
/// The redirect cache is invalidated once the rule is stored.
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if an active rule already uses the same normalized source.
pub async fn create_redirect_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRedirectRequest>,
) -> Result<(StatusCode, Json<RedirectRuleItem>), AppError> {
    payload.validate()?;

    let rule = state.redirect_service.create_rule(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(rule.into())))
}

/// Partially updates a redirect rule.
///
/// # Endpoint
///
/// `PATCH /api/redirects/{id}`
///
/// Setting `is_active` to `false` deactivates the rule without deleting it.
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 404 if the rule does not exist.
/// Returns 409 on a source path collision.
pub async fn update_redirect_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateRedirectRequest>,
) -> Result<Json<RedirectRuleItem>, AppError> {
    payload.validate()?;

    let rule = state.redirect_service.update_rule(id, payload.into()).await?;

    Ok(Json(rule.into()))
}

/// Deletes a redirect rule.
///
/// # Endpoint
///
/// `DELETE /api/redirects/{id}`
///
/// # Errors
///
/// Returns 404 if the rule does not exist.
pub async fn delete_redirect_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.redirect_service.delete_rule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
