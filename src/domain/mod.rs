// Domain models with constructor-enforced validation

pub mod content_check;
pub mod expression_rule;
pub mod knowledge_article;
pub mod knowledge_embedding;
pub mod user;

pub use content_check::*;
pub use expression_rule::*;
pub use knowledge_article::*;
pub use knowledge_embedding::*;
pub use user::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{0}")]
    Invalid(String),
}
