use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{KnowledgeArticle, SourceType};

#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    content: String,
    source_type: String,
    source_url: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for KnowledgeArticle {
    type Error = sqlx::Error;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let source_type = row
            .source_type
            .parse::<SourceType>()
            .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?;

        Ok(KnowledgeArticle {
            id: row.id,
            title: row.title,
            content: row.content,
            source_type,
            source_url: row.source_url,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Persistence seam for knowledge articles.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn save(&self, article: &KnowledgeArticle) -> Result<(), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<KnowledgeArticle>, sqlx::Error>;
    async fn list(&self) -> Result<Vec<KnowledgeArticle>, sqlx::Error>;
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

pub struct KnowledgeArticleRepo {
    pool: PgPool,
}

impl KnowledgeArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for KnowledgeArticleRepo {
    async fn save(&self, article: &KnowledgeArticle) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO knowledge_articles
                (id, title, content, source_type, source_url, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                content = EXCLUDED.content,
                source_type = EXCLUDED.source_type,
                source_url = EXCLUDED.source_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.source_type.to_string())
        .bind(&article.source_url)
        .bind(article.created_by)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<KnowledgeArticle>, sqlx::Error> {
        let row = sqlx::query_as::<_, ArticleRow>("SELECT * FROM knowledge_articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(KnowledgeArticle::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<KnowledgeArticle>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT * FROM knowledge_articles ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(KnowledgeArticle::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM knowledge_articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
