//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewRedirectRule, RedirectKind, RedirectRule, RedirectRulePatch};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

const RULE_COLUMNS: &str = "id, source_path, destination_path, kind, is_active, hit_count, \
     last_hit_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RedirectRuleRow {
    id: i64,
    source_path: String,
    destination_path: String,
    kind: String,
    is_active: bool,
    hit_count: i64,
    last_hit_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RedirectRuleRow> for RedirectRule {
    type Error = AppError;

    fn try_from(row: RedirectRuleRow) -> Result<Self, Self::Error> {
        let kind: RedirectKind = row.kind.parse().map_err(|e| {
            AppError::internal(
                "Corrupt redirect rule",
                json!({ "id": row.id, "reason": format!("{e}") }),
            )
        })?;

        Ok(RedirectRule {
            id: row.id,
            source_path: row.source_path,
            destination_path: row.destination_path,
            kind,
            is_active: row.is_active,
            hit_count: row.hit_count,
            last_hit_at: row.last_hit_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_rules(rows: Vec<RedirectRuleRow>) -> Result<Vec<RedirectRule>, AppError> {
    rows.into_iter().map(RedirectRule::try_from).collect()
}

/// PostgreSQL repository for redirect rules.
///
/// Queries are bound at runtime so the crate builds without a live database.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn fetch_active(&self) -> Result<Vec<RedirectRule>, AppError> {
        let rows = sqlx::query_as::<_, RedirectRuleRow>(&format!(
            "SELECT {RULE_COLUMNS} FROM redirect_rules WHERE is_active"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        into_rules(rows)
    }

    async fn record_hit(&self, id: i64, hit_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE redirect_rules
            SET hit_count = hit_count + 1,
                last_hit_at = GREATEST(COALESCE(last_hit_at, $2), $2)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hit_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<RedirectRule>, AppError> {
        let rows = sqlx::query_as::<_, RedirectRuleRow>(&format!(
            "SELECT {RULE_COLUMNS} FROM redirect_rules ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        into_rules(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RedirectRule>, AppError> {
        let row = sqlx::query_as::<_, RedirectRuleRow>(&format!(
            "SELECT {RULE_COLUMNS} FROM redirect_rules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(RedirectRule::try_from).transpose()
    }

    async fn create(&self, new_rule: NewRedirectRule) -> Result<RedirectRule, AppError> {
        let row = sqlx::query_as::<_, RedirectRuleRow>(&format!(
            r#"
            INSERT INTO redirect_rules (source_path, destination_path, kind, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(&new_rule.source_path)
        .bind(&new_rule.destination_path)
        .bind(new_rule.kind.as_str())
        .bind(new_rule.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn update(&self, id: i64, patch: RedirectRulePatch) -> Result<RedirectRule, AppError> {
        let row = sqlx::query_as::<_, RedirectRuleRow>(&format!(
            r#"
            UPDATE redirect_rules
            SET source_path      = COALESCE($2, source_path),
                destination_path = COALESCE($3, destination_path),
                kind             = COALESCE($4, kind),
                is_active        = COALESCE($5, is_active),
                updated_at       = NOW()
            WHERE id = $1
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.source_path)
        .bind(patch.destination_path)
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or_else(|| AppError::not_found("Redirect rule not found", json!({ "id": id })))?
            .try_into()
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM redirect_rules WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
