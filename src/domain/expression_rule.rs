use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DomainError;

/// An NG-phrase to recommended-phrase mapping used for style and
/// compliance checking. New rules start out active.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExpressionRule {
    pub id: Uuid,
    pub ng_expression: String,
    pub recommended_expression: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpressionRule {
    pub fn create(
        id: Uuid,
        ng_expression: &str,
        recommended_expression: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> Result<Self, DomainError> {
        let (ng, recommended, description) =
            validate_fields(ng_expression, recommended_expression, description)?;

        let now = Utc::now();
        Ok(Self {
            id,
            ng_expression: ng,
            recommended_expression: recommended,
            description,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(
        &self,
        ng_expression: &str,
        recommended_expression: &str,
        description: Option<&str>,
    ) -> Result<Self, DomainError> {
        let (ng, recommended, description) =
            validate_fields(ng_expression, recommended_expression, description)?;

        Ok(Self {
            ng_expression: ng,
            recommended_expression: recommended,
            description,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    pub fn activate(&self) -> Self {
        Self {
            is_active: true,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn deactivate(&self) -> Self {
        Self {
            is_active: false,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

fn validate_fields(
    ng_expression: &str,
    recommended_expression: &str,
    description: Option<&str>,
) -> Result<(String, String, Option<String>), DomainError> {
    let ng = ng_expression.trim();
    if ng.is_empty() {
        return Err(DomainError::EmptyField("NG expression"));
    }

    let recommended = recommended_expression.trim();
    if recommended.is_empty() {
        return Err(DomainError::EmptyField("Recommended expression"));
    }

    // An all-whitespace description is stored as absent.
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok((ng.to_string(), recommended.to_string(), description))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_rule() -> ExpressionRule {
        ExpressionRule::create(
            Uuid::new_v4(),
            "  絶対に儲かる  ",
            "リターンが期待できる",
            Some("investment claims"),
            Uuid::new_v4(),
        )
        .unwrap()
    }

    #[test]
    fn create_trims_expressions_and_starts_active() {
        let rule = new_rule();
        assert_eq!(rule.ng_expression, "絶対に儲かる");
        assert_eq!(rule.recommended_expression, "リターンが期待できる");
        assert!(rule.is_active);
    }

    #[test]
    fn create_rejects_empty_ng_expression() {
        let result = ExpressionRule::create(Uuid::new_v4(), "   ", "ok", None, Uuid::new_v4());
        assert_eq!(result, Err(DomainError::EmptyField("NG expression")));
    }

    #[test]
    fn create_rejects_empty_recommended_expression() {
        let result = ExpressionRule::create(Uuid::new_v4(), "ng", "", None, Uuid::new_v4());
        assert_eq!(result, Err(DomainError::EmptyField("Recommended expression")));
    }

    #[test]
    fn blank_description_becomes_none() {
        let rule =
            ExpressionRule::create(Uuid::new_v4(), "ng", "ok", Some("   "), Uuid::new_v4()).unwrap();
        assert_eq!(rule.description, None);
    }

    #[test]
    fn update_replaces_fields_and_keeps_identity() {
        let rule = new_rule();
        let updated = rule.update("new ng", "new ok", None).unwrap();
        assert_eq!(updated.id, rule.id);
        assert_eq!(updated.created_by, rule.created_by);
        assert_eq!(updated.ng_expression, "new ng");
        assert_eq!(updated.description, None);
    }

    #[test]
    fn update_rejects_empty_fields() {
        let rule = new_rule();
        assert!(rule.update("", "ok", None).is_err());
        assert!(rule.update("ng", "  ", None).is_err());
    }

    #[test]
    fn deactivate_and_activate_toggle_is_active() {
        let rule = new_rule();
        let inactive = rule.deactivate();
        assert!(!inactive.is_active);
        assert!(inactive.activate().is_active);
    }
}
