//! Repository trait for redirect rule data access.

use crate::domain::entities::{NewRedirectRule, RedirectRule, RedirectRulePatch};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store adapter for redirect rules.
///
/// [`fetch_active`](Self::fetch_active) and [`record_hit`](Self::record_hit)
/// are the only methods the redirect cache and the hit worker use. The rest
/// back the admin API, whose callers must invalidate the cache after every
/// successful write.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_redirect.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Fetches every active rule.
    ///
    /// No ordering is guaranteed. Active rules are expected to have unique
    /// normalized source paths.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn fetch_active(&self) -> Result<Vec<RedirectRule>, AppError>;

    /// Increments the hit counter of a rule and sets its last-hit timestamp.
    ///
    /// Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_hit(&self, id: i64, hit_at: DateTime<Utc>) -> Result<(), AppError>;

    /// Lists all rules, active or not, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<RedirectRule>, AppError>;

    /// Finds a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<RedirectRule>, AppError>;

    /// Creates a new rule.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an active rule already uses the same
    /// normalized source path.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_rule: NewRedirectRule) -> Result<RedirectRule, AppError>;

    /// Partially updates a rule.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has the given id.
    /// Returns [`AppError::Conflict`] on a source path collision.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, patch: RedirectRulePatch) -> Result<RedirectRule, AppError>;

    /// Deletes a rule.
    ///
    /// Returns `Ok(false)` if no rule had the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Performs a trivial round-trip to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn health_check(&self) -> Result<(), AppError>;
}
