// Content Reviewer - backend for expression rules and a vector-searchable knowledge base

pub mod ai;
pub mod config;
pub mod db;
pub mod domain;
pub mod knowledge;
pub mod middleware;
pub mod models;
pub mod note;
pub mod routes;
pub mod rules;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
