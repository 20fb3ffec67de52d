//! Redirect rule entity representing one configured path redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Redirect semantics attached to a rule.
///
/// The cache treats this as opaque and passes it through unchanged; only the
/// routing layer turns it into a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectKind {
    Permanent,
    Temporary,
}

impl RedirectKind {
    /// Storage representation used in the `redirect_rules.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectKind::Permanent => "permanent",
            RedirectKind::Temporary => "temporary",
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored kind is not one of the known values.
#[derive(Debug, thiserror::Error)]
#[error("Unknown redirect kind: {0}")]
pub struct UnknownRedirectKind(pub String);

impl FromStr for RedirectKind {
    type Err = UnknownRedirectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(RedirectKind::Permanent),
            "temporary" => Ok(RedirectKind::Temporary),
            other => Err(UnknownRedirectKind(other.to_string())),
        }
    }
}

/// A configured redirect from one request path to another.
///
/// `source_path` is kept exactly as authored. Lookups compare its normalized
/// form (see [`crate::utils::path_normalizer::normalize_path`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
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

impl RedirectRule {
    /// Creates an active rule with no recorded hits.
    pub fn new(
        id: i64,
        source_path: impl Into<String>,
        destination_path: impl Into<String>,
        kind: RedirectKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            kind,
            is_active: true,
            hit_count: 0,
            last_hit_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input data for creating a new redirect rule.
#[derive(Debug, Clone)]
pub struct NewRedirectRule {
    pub source_path: String,
    pub destination_path: String,
    pub kind: RedirectKind,
    pub is_active: bool,
}

/// Partial update for an existing rule.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct RedirectRulePatch {
    pub source_path: Option<String>,
    pub destination_path: Option<String>,
    pub kind: Option<RedirectKind>,
    pub is_active: Option<bool>,
}

impl RedirectRulePatch {
    /// Returns true when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.source_path.is_none()
            && self.destination_path.is_none()
            && self.kind.is_none()
            && self.is_active.is_none()
    }
}
