// Embedding generation gateway

pub mod openai;

pub use openai::OpenAiEmbeddingGateway;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("embedding API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("embedding API returned no data")]
    EmptyResponse,

    #[error("expected {expected}-dimensional embedding, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Turns text into a fixed-length vector for similarity search.
#[async_trait]
pub trait EmbeddingGateway: Send + Sync {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
