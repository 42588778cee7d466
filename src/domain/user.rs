use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use super::DomainError;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap())
}

/// A validated, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn create(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim().to_lowercase();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyField("Email"));
        }
        if !email_regex().is_match(&trimmed) {
            return Err(DomainError::Invalid(format!("Invalid email format: {value}")));
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A staff user, mirrored from the auth provider on sign-in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn create(
        id: Uuid,
        email: &str,
        name: &str,
        avatar_url: Option<String>,
    ) -> Result<Self, DomainError> {
        let email = Email::create(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyField("Name"));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            email,
            name: name.to_string(),
            avatar_url,
            created_at: now,
            updated_at: now,
        })
    }
}
