use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DomainError;

/// Where an article came from: authored by hand or imported from the
/// note publishing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Manual,
    Note,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Manual => write!(f, "manual"),
            SourceType::Note => write!(f, "note"),
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(SourceType::Manual),
            "note" => Ok(SourceType::Note),
            other => Err(DomainError::Invalid(format!("Invalid source type: {other}"))),
        }
    }
}

/// A reference document consumed as context by the downstream content
/// check. Each article owns exactly one embedding chunk.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KnowledgeArticle {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeArticle {
    pub fn create(
        id: Uuid,
        title: &str,
        content: &str,
        source_type: SourceType,
        source_url: Option<String>,
        created_by: Uuid,
    ) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyField("Title"));
        }
        if content.trim().is_empty() {
            return Err(DomainError::EmptyField("Content"));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            title: title.to_string(),
            content: content.to_string(),
            source_type,
            source_url,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&self, title: &str, content: &str) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyField("Title"));
        }
        if content.trim().is_empty() {
            return Err(DomainError::EmptyField("Content"));
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            updated_at: Utc::now(),
            ..self.clone()
        })
    }
}
