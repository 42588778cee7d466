use std::sync::Arc;

use sqlx::PgPool;

use crate::ai::EmbeddingGateway;
use crate::config::Config;
use crate::domain::{ExpressionRule, KnowledgeArticle, KnowledgeEmbedding, SourceType, User};
use crate::note::{NoteArticleSummary, NoteScraper};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub embeddings: Arc<dyn EmbeddingGateway>,
    pub scraper: Arc<dyn NoteScraper>,
}

// API request/response types

#[derive(Debug, serde::Deserialize)]
pub struct CreateRuleRequest {
    pub ng_expression: String,
    pub recommended_expression: String,
    pub description: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct UpdateRuleRequest {
    pub ng_expression: String,
    pub recommended_expression: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ListRulesQuery {
    pub active: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
pub struct RuleResponse {
    pub id: uuid::Uuid,
    pub ng_expression: String,
    pub recommended_expression: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ExpressionRule> for RuleResponse {
    fn from(rule: ExpressionRule) -> Self {
        Self {
            id: rule.id,
            ng_expression: rule.ng_expression,
            recommended_expression: rule.recommended_expression,
            description: rule.description,
            is_active: rule.is_active,
            created_by: rule.created_by,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub source_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ArticleResponse {
    pub id: uuid::Uuid,
    pub title: String,
    pub content: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub created_by: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<KnowledgeArticle> for ArticleResponse {
    fn from(article: KnowledgeArticle) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            source_type: article.source_type,
            source_url: article.source_url,
            created_by: article.created_by,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ImportNoteArticlesRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct NoteArticleSummaryResponse {
    pub title: String,
    pub url: String,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<NoteArticleSummary> for NoteArticleSummaryResponse {
    fn from(summary: NoteArticleSummary) -> Self {
        Self {
            title: summary.title,
            url: summary.url,
            published_at: summary.published_at,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchKnowledgeRequest {
    pub query: String,
    pub limit: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
pub struct SearchHitResponse {
    pub knowledge_article_id: uuid::Uuid,
    pub chunk_index: i32,
    pub chunk_text: String,
}

impl From<KnowledgeEmbedding> for SearchHitResponse {
    fn from(embedding: KnowledgeEmbedding) -> Self {
        Self {
            knowledge_article_id: embedding.knowledge_article_id,
            chunk_index: embedding.chunk_index,
            chunk_text: embedding.chunk_text,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            name: user.name,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
