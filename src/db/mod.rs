use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

pub mod articles;
pub mod embeddings;
pub mod rules;
pub mod users;

pub use articles::{ArticleStore, KnowledgeArticleRepo};
pub use embeddings::{EmbeddingStore, KnowledgeEmbeddingRepo};
pub use rules::{ExpressionRuleRepo, RuleStore};
pub use users::UserRepo;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await?;

    // Test connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> Result<bool> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(true)
}
