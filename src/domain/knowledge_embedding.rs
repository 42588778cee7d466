use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DomainError;

/// One embedded chunk of a knowledge article. The current pipeline
/// stores a single chunk per article at index 0.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KnowledgeEmbedding {
    pub id: Uuid,
    pub knowledge_article_id: Uuid,
    pub chunk_index: i32,
    pub chunk_text: String,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeEmbedding {
    pub fn create(
        id: Uuid,
        knowledge_article_id: Uuid,
        chunk_index: i32,
        chunk_text: String,
        embedding: Vec<f32>,
    ) -> Result<Self, DomainError> {
        if chunk_index < 0 {
            return Err(DomainError::Invalid(
                "Chunk index must be non-negative".to_string(),
            ));
        }
        if chunk_text.trim().is_empty() {
            return Err(DomainError::EmptyField("Chunk text"));
        }
        if embedding.is_empty() {
            return Err(DomainError::EmptyField("Embedding"));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            knowledge_article_id,
            chunk_index,
            chunk_text,
            embedding,
            created_at: now,
            updated_at: now,
        })
    }
}
