use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::ExpressionRule;

#[derive(Debug, sqlx::FromRow)]
struct RuleRow {
    id: Uuid,
    ng_expression: String,
    recommended_expression: String,
    description: Option<String>,
    is_active: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RuleRow> for ExpressionRule {
    fn from(row: RuleRow) -> Self {
        ExpressionRule {
            id: row.id,
            ng_expression: row.ng_expression,
            recommended_expression: row.recommended_expression,
            description: row.description,
            is_active: row.is_active,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Persistence seam for expression rules.
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn save(&self, rule: &ExpressionRule) -> Result<(), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ExpressionRule>, sqlx::Error>;
    async fn list(&self) -> Result<Vec<ExpressionRule>, sqlx::Error>;
    async fn list_active(&self) -> Result<Vec<ExpressionRule>, sqlx::Error>;
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

pub struct ExpressionRuleRepo {
    pool: PgPool,
}

impl ExpressionRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleStore for ExpressionRuleRepo {
    async fn save(&self, rule: &ExpressionRule) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO expression_rules
                (id, ng_expression, recommended_expression, description, is_active,
                 created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                ng_expression = EXCLUDED.ng_expression,
                recommended_expression = EXCLUDED.recommended_expression,
                description = EXCLUDED.description,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(rule.id)
        .bind(&rule.ng_expression)
        .bind(&rule.recommended_expression)
        .bind(&rule.description)
        .bind(rule.is_active)
        .bind(rule.created_by)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ExpressionRule>, sqlx::Error> {
        let row = sqlx::query_as::<_, RuleRow>("SELECT * FROM expression_rules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ExpressionRule::from))
    }

    async fn list(&self) -> Result<Vec<ExpressionRule>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RuleRow>(
            "SELECT * FROM expression_rules ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExpressionRule::from).collect())
    }

    async fn list_active(&self) -> Result<Vec<ExpressionRule>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RuleRow>(
            "SELECT * FROM expression_rules WHERE is_active = TRUE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExpressionRule::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM expression_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
