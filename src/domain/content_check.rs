//! Models for the downstream content check. The scoring pipeline itself
//! is not implemented here; these types define the states and result
//! shapes it will produce.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DomainError;

const MAX_CONTENT_LENGTH: usize = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pending => write!(f, "pending"),
            CheckStatus::Processing => write!(f, "processing"),
            CheckStatus::Completed => write!(f, "completed"),
            CheckStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    FactCheck,
    KnowledgeConsistency,
    ExpressionRule,
    RiskAssessment,
    Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A submitted piece of text moving through the check lifecycle:
/// pending -> processing -> completed, with failure allowed from the
/// first two states.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentCheck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub status: CheckStatus,
    pub failed_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentCheck {
    pub fn create(id: Uuid, user_id: Uuid, content: String) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::EmptyField("Content"));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(DomainError::Invalid(format!(
                "Content cannot exceed {MAX_CONTENT_LENGTH} characters"
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            user_id,
            content,
            status: CheckStatus::Pending,
            failed_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn start_processing(&self) -> Result<Self, DomainError> {
        if self.status != CheckStatus::Pending {
            return Err(DomainError::Invalid(format!(
                "Cannot start processing from status: {}",
                self.status
            )));
        }

        Ok(Self {
            status: CheckStatus::Processing,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    pub fn complete(&self) -> Result<Self, DomainError> {
        if self.status != CheckStatus::Processing {
            return Err(DomainError::Invalid(format!(
                "Cannot complete from status: {}",
                self.status
            )));
        }

        Ok(Self {
            status: CheckStatus::Completed,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    pub fn fail(&self, reason: Option<String>) -> Result<Self, DomainError> {
        if self.status != CheckStatus::Pending && self.status != CheckStatus::Processing {
            return Err(DomainError::Invalid(format!(
                "Cannot fail from status: {}",
                self.status
            )));
        }

        Ok(Self {
            status: CheckStatus::Failed,
            failed_reason: reason,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }
}

/// A single finding produced by one check type against one segment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckResult {
    pub id: Uuid,
    pub segment_id: Uuid,
    pub content_check_id: Uuid,
    pub check_type: CheckType,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CheckResult {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: Uuid,
        segment_id: Uuid,
        content_check_id: Uuid,
        check_type: CheckType,
        severity: Severity,
        message: String,
        suggestion: Option<String>,
    ) -> Result<Self, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::EmptyField("Message"));
        }

        Ok(Self {
            id,
            segment_id,
            content_check_id,
            check_type,
            severity,
            message,
            suggestion,
            created_at: Utc::now(),
        })
    }
}

/// A contiguous slice of the submitted content, checked independently.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentSegment {
    pub id: Uuid,
    pub content_check_id: Uuid,
    pub text: String,
    pub segment_index: i32,
    pub created_at: DateTime<Utc>,
}

impl ContentSegment {
    pub fn create(
        id: Uuid,
        content_check_id: Uuid,
        text: String,
        segment_index: i32,
    ) -> Result<Self, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::EmptyField("Segment text"));
        }
        if segment_index < 0 {
            return Err(DomainError::Invalid(
                "Segment index must be a non-negative integer".to_string(),
            ));
        }

        Ok(Self {
            id,
            content_check_id,
            text,
            segment_index,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct SeveritySummary {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

/// Count check results per severity.
pub fn summarize(results: &[CheckResult]) -> SeveritySummary {
    let mut summary = SeveritySummary::default();
    for result in results {
        match result.severity {
            Severity::Error => summary.error += 1,
            Severity::Warning => summary.warning += 1,
            Severity::Info => summary.info += 1,
        }
    }
    summary
}
