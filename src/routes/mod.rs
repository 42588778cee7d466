//! API Routes
//!
//! - `/api/health` - Health check
//! - `/api/rules` - Expression rule CRUD
//! - `/api/knowledge` - Knowledge articles, note import and similarity search
//! - `/api/auth` - Current user and user-row sync
//!
//! Everything except the health check sits behind the auth middleware.

pub mod auth;
pub mod health;
pub mod knowledge;
pub mod rules;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::auth_middleware;
use crate::models::AppState;

pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .merge(rules::router(state.clone()))
        .merge(knowledge::router(state.clone()))
        .merge(auth::router(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::router(state))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
