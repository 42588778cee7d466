use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::db;
use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match db::health_check(&state.pool).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "error".to_string(),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
    })
}
