use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use uuid::Uuid;

use crate::db::ExpressionRuleRepo;
use crate::middleware::AuthUser;
use crate::models::{AppState, CreateRuleRequest, ListRulesQuery, RuleResponse, UpdateRuleRequest};
use crate::rules::{self, CreateRuleInput, UpdateRuleInput};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/rules", get(list_rules).post(create_rule))
        .route("/api/rules/{id}", put(update_rule).delete(delete_rule))
        .with_state(state)
}

async fn list_rules(
    State(state): State<AppState>,
    Query(query): Query<ListRulesQuery>,
) -> AppResult<Json<Vec<RuleResponse>>> {
    let repo = ExpressionRuleRepo::new(state.pool.clone());
    let rules = rules::list_rules(&repo, query.active.unwrap_or(false)).await?;
    Ok(Json(rules.into_iter().map(RuleResponse::from).collect()))
}

async fn create_rule(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateRuleRequest>,
) -> AppResult<(StatusCode, Json<RuleResponse>)> {
    let repo = ExpressionRuleRepo::new(state.pool.clone());
    let rule = rules::create_rule(
        &repo,
        CreateRuleInput {
            ng_expression: request.ng_expression,
            recommended_expression: request.recommended_expression,
            description: request.description,
            created_by: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(rule.into())))
}

async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRuleRequest>,
) -> AppResult<Json<RuleResponse>> {
    let repo = ExpressionRuleRepo::new(state.pool.clone());
    let rule = rules::update_rule(
        &repo,
        UpdateRuleInput {
            id,
            ng_expression: request.ng_expression,
            recommended_expression: request.recommended_expression,
            description: request.description,
            is_active: request.is_active,
        },
    )
    .await?;

    Ok(Json(rule.into()))
}

async fn delete_rule(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    let repo = ExpressionRuleRepo::new(state.pool.clone());
    rules::delete_rule(&repo, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
