//! Redirect rule management service.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{NewRedirectRule, RedirectRule, RedirectRulePatch};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::infrastructure::cache::RedirectCache;
use crate::utils::path_normalizer::decode_request_path;

/// Service for reading and changing redirect rules.
///
/// Every successful write invalidates the [`RedirectCache`] after the store
/// has committed, so the next lookup reloads the rule set.
pub struct RedirectService {
    repository: Arc<dyn RedirectRepository>,
    cache: Arc<RedirectCache>,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<dyn RedirectRepository>, cache: Arc<RedirectCache>) -> Self {
        Self { repository, cache }
    }

    /// Lists all rules, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_rules(&self) -> Result<Vec<RedirectRule>, AppError> {
        self.repository.list().await
    }

    /// Retrieves a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has the given id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_rule(&self, id: i64) -> Result<RedirectRule, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Redirect rule not found", json!({ "id": id })))
    }

    /// Creates a rule and invalidates the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an active rule already uses the same
    /// normalized source path.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_rule(&self, new_rule: NewRedirectRule) -> Result<RedirectRule, AppError> {
        let rule = self.repository.create(new_rule).await?;
        self.cache.invalidate().await;

        info!(
            rule_id = rule.id,
            source = %rule.source_path,
            destination = %rule.destination_path,
            kind = %rule.kind,
            "Redirect rule created"
        );
        Ok(rule)
    }

    /// Applies a partial update and invalidates the cache.
    ///
    /// An empty patch returns the current rule without writing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has the given id.
    /// Returns [`AppError::Conflict`] on a source path collision.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_rule(
        &self,
        id: i64,
        patch: RedirectRulePatch,
    ) -> Result<RedirectRule, AppError> {
        if patch.is_empty() {
            return self.get_rule(id).await;
        }

        let rule = self.repository.update(id, patch).await?;
        self.cache.invalidate().await;

        info!(rule_id = rule.id, active = rule.is_active, "Redirect rule updated");
        Ok(rule)
    }

    /// Deletes a rule and invalidates the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has the given id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_rule(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(
                "Redirect rule not found",
                json!({ "id": id }),
            ));
        }

        self.cache.invalidate().await;

        info!(rule_id = id, "Redirect rule deleted");
        Ok(())
    }

    /// Resolves a raw request path the way the routing layer does.
    ///
    /// Unlike a plain cache lookup, an unreachable store is reported instead
    /// of being answered as "no redirect".
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    pub async fn resolve(&self, path: &str) -> Result<Option<RedirectRule>, AppError> {
        self.repository.health_check().await?;
        Ok(self.cache.check_redirect(&decode_request_path(path)).await)
    }

    /// Checks that the store answers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.health_check().await
    }
}
