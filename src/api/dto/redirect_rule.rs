//! DTOs for redirect rule management endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;
use validator::{Validate, ValidationError};

use crate::domain::entities::{NewRedirectRule, RedirectKind, RedirectRule, RedirectRulePatch};

/// Absolute, unencoded request path without query string or fragment.
///
/// Request paths are percent-decoded before lookup, so sources must be
/// written in decoded form (`/safari/übersicht`, not `/safari/%C3%BCbersicht`).
static SOURCE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[^\s?#%]*$").unwrap());

/// Accepts a site-relative path or an absolute `http`/`https` URL.
///
/// Protocol-relative destinations (`//host/...`) are rejected.
fn validate_destination(destination: &str) -> Result<(), ValidationError> {
    if destination.starts_with('/') && !destination.starts_with("//") {
        return Ok(());
    }

    match Url::parse(destination) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(()),
        _ => Err(ValidationError::new("destination")
            .with_message("Destination must be a path or an http(s) URL".into())),
    }
}

fn default_kind() -> RedirectKind {
    RedirectKind::Permanent
}

fn default_active() -> bool {
    true
}

/// Request body for `POST /api/redirects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRedirectRequest {
    /// Path to match, e.g. `/tours/iceland-2024`. Stored as written.
    #[validate(length(min = 1, max = 2048))]
    #[validate(regex(path = "*SOURCE_PATH_REGEX", message = "Source must be an absolute, unencoded path"))]
    pub source_path: String,

    #[validate(length(min = 1, max = 2048))]
    #[validate(custom(function = "validate_destination"))]
    pub destination_path: String,

    /// Defaults to `permanent`.
    #[serde(default = "default_kind")]
    pub kind: RedirectKind,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<CreateRedirectRequest> for NewRedirectRule {
    fn from(req: CreateRedirectRequest) -> Self {
        Self {
            source_path: req.source_path,
            destination_path: req.destination_path,
            kind: req.kind,
            is_active: req.is_active,
        }
    }
}

/// Request body for `PATCH /api/redirects/{id}`.
///
/// All fields are optional; only provided fields are changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRedirectRequest {
    #[validate(length(min = 1, max = 2048))]
    #[validate(regex(path = "*SOURCE_PATH_REGEX", message = "Source must be an absolute, unencoded path"))]
    pub source_path: Option<String>,

    #[validate(length(min = 1, max = 2048))]
    #[validate(custom(function = "validate_destination"))]
    pub destination_path: Option<String>,

    pub kind: Option<RedirectKind>,

    pub is_active: Option<bool>,
}

impl From<UpdateRedirectRequest> for RedirectRulePatch {
    fn from(req: UpdateRedirectRequest) -> Self {
        Self {
            source_path: req.source_path,
            destination_path: req.destination_path,
            kind: req.kind,
            is_active: req.is_active,
        }
    }
}

/// A redirect rule as returned by the API.
#[derive(Debug, Serialize)]
pub struct RedirectRuleItem {
    pub id: i64,
    pub source_path: String,
    pub destination_path: String,
    pub kind: RedirectKind,
    pub is_active: bool,
    pub hit_count: i64,
    pub last_hit_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RedirectRule> for RedirectRuleItem {
    fn from(rule: RedirectRule) -> Self {
        Self {
            id: rule.id,
            source_path: rule.source_path,
            destination_path: rule.destination_path,
            kind: rule.kind,
            is_active: rule.is_active,
            hit_count: rule.hit_count,
            last_hit_at: rule.last_hit_at,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RedirectRuleListResponse {
    pub items: Vec<RedirectRuleItem>,
}
