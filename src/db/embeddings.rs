//! Embedding rows over the pgvector extension
//!
//! Vectors cross the wire as `[v1,v2,...]` text literals cast to
//! `::vector`, and come back through an `embedding::text` cast, so the
//! queries need no vector-aware driver support.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::KnowledgeEmbedding;

#[derive(Debug, sqlx::FromRow)]
struct EmbeddingRow {
    id: Uuid,
    knowledge_article_id: Uuid,
    chunk_index: i32,
    chunk_text: String,
    embedding: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EmbeddingRow> for KnowledgeEmbedding {
    type Error = sqlx::Error;

    fn try_from(row: EmbeddingRow) -> Result<Self, Self::Error> {
        let embedding = parse_vector(&row.embedding)
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(KnowledgeEmbedding {
            id: row.id,
            knowledge_article_id: row.knowledge_article_id,
            chunk_index: row.chunk_index,
            chunk_text: row.chunk_text,
            embedding,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Persistence seam for embedding rows.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    async fn save_many(&self, embeddings: &[KnowledgeEmbedding]) -> Result<(), sqlx::Error>;
    async fn delete_by_article(&self, article_id: Uuid) -> Result<(), sqlx::Error>;
    async fn search_similar(
        &self,
        embedding: &[f32],
        limit: i64,
    ) -> Result<Vec<KnowledgeEmbedding>, sqlx::Error>;
}

pub struct KnowledgeEmbeddingRepo {
    pool: PgPool,
}

impl KnowledgeEmbeddingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmbeddingStore for KnowledgeEmbeddingRepo {
    async fn save_many(&self, embeddings: &[KnowledgeEmbedding]) -> Result<(), sqlx::Error> {
        for embedding in embeddings {
            sqlx::query(
                r#"
                INSERT INTO knowledge_embeddings
                    (id, knowledge_article_id, chunk_index, chunk_text, embedding,
                     created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5::vector, $6, $7)
                ON CONFLICT (id) DO UPDATE SET
                    chunk_index = EXCLUDED.chunk_index,
                    chunk_text = EXCLUDED.chunk_text,
                    embedding = EXCLUDED.embedding,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(embedding.id)
            .bind(embedding.knowledge_article_id)
            .bind(embedding.chunk_index)
            .bind(&embedding.chunk_text)
            .bind(vector_literal(&embedding.embedding))
            .bind(embedding.created_at)
            .bind(embedding.updated_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn delete_by_article(&self, article_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM knowledge_embeddings WHERE knowledge_article_id = $1")
            .bind(article_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Nearest neighbors by L2 distance, closest first.
    async fn search_similar(
        &self,
        embedding: &[f32],
        limit: i64,
    ) -> Result<Vec<KnowledgeEmbedding>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmbeddingRow>(
            r#"
            SELECT
                id,
                knowledge_article_id,
                chunk_index,
                chunk_text,
                embedding::text AS embedding,
                created_at,
                updated_at
            FROM knowledge_embeddings
            ORDER BY embedding <-> $1::vector
            LIMIT $2
            "#,
        )
        .bind(vector_literal(embedding))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(KnowledgeEmbedding::try_from).collect()
    }
}

fn vector_literal(values: &[f32]) -> String {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}

fn parse_vector(literal: &str) -> Result<Vec<f32>, String> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("malformed vector literal: {literal:?}"))?;

    if inner.trim().is_empty() {
        return Ok(vec![]);
    }

    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("malformed vector component {part:?}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_literal_formats_pgvector_input() {
        assert_eq!(vector_literal(&[0.5, -1.0, 2.25]), "[0.5,-1,2.25]");
        assert_eq!(vector_literal(&[]), "[]");
    }

    #[test]
    fn parse_vector_reads_pgvector_text_output() {
        assert_eq!(parse_vector("[0.5,-1,2.25]").unwrap(), vec![0.5, -1.0, 2.25]);
        assert_eq!(parse_vector("[]").unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn literal_and_parse_round_trip() {
        let original = vec![0.125, -0.25, 3.5, 0.0];
        assert_eq!(parse_vector(&vector_literal(&original)).unwrap(), original);
    }

    #[test]
    fn parse_vector_rejects_garbage() {
        assert!(parse_vector("0.5,1.0").is_err());
        assert!(parse_vector("[a,b]").is_err());
    }
}
