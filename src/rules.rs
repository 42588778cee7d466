//! Expression-rule operations

use tracing::info;
use uuid::Uuid;

use crate::db::RuleStore;
use crate::domain::ExpressionRule;
use crate::types::{AppError, AppResult};

pub struct CreateRuleInput {
    pub ng_expression: String,
    pub recommended_expression: String,
    pub description: Option<String>,
    pub created_by: Uuid,
}

pub struct UpdateRuleInput {
    pub id: Uuid,
    pub ng_expression: String,
    pub recommended_expression: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn create_rule(rules: &dyn RuleStore, input: CreateRuleInput) -> AppResult<ExpressionRule> {
    let rule = ExpressionRule::create(
        Uuid::new_v4(),
        &input.ng_expression,
        &input.recommended_expression,
        input.description.as_deref(),
        input.created_by,
    )?;

    rules.save(&rule).await?;

    info!(rule_id = %rule.id, "Expression rule created");
    Ok(rule)
}

pub async fn update_rule(rules: &dyn RuleStore, input: UpdateRuleInput) -> AppResult<ExpressionRule> {
    let existing = rules
        .find_by_id(input.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ExpressionRule not found: {}", input.id)))?;

    let mut updated = existing.update(
        &input.ng_expression,
        &input.recommended_expression,
        input.description.as_deref(),
    )?;

    if let Some(active) = input.is_active {
        updated = if active { updated.activate() } else { updated.deactivate() };
    }

    rules.save(&updated).await?;

    info!(rule_id = %updated.id, is_active = updated.is_active, "Expression rule updated");
    Ok(updated)
}

pub async fn delete_rule(rules: &dyn RuleStore, id: Uuid) -> AppResult<()> {
    let existing = rules.find_by_id(id).await?;
    if existing.is_none() {
        return Err(AppError::NotFound(format!("ExpressionRule not found: {id}")));
    }

    rules.delete(id).await?;

    info!(rule_id = %id, "Expression rule deleted");
    Ok(())
}

pub async fn list_rules(rules: &dyn RuleStore, active_only: bool) -> AppResult<Vec<ExpressionRule>> {
    let rules = if active_only {
        rules.list_active().await?
    } else {
        rules.list().await?
    };

    Ok(rules)
}
