use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use crate::db::UserRepo;
use crate::domain::User;
use crate::middleware::AuthUser;
use crate::models::{AppState, UserResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/me", get(current_user))
        .route("/api/auth/sync", post(sync_user))
        .with_state(state)
}

/// Returns the synced user row when present, otherwise the identity
/// straight from the verified token.
async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<UserResponse>> {
    let users = UserRepo::new(state.pool.clone());
    if let Some(user) = users.find_by_id(auth.id).await? {
        return Ok(Json(user.into()));
    }

    Ok(Json(UserResponse {
        id: auth.id,
        email: auth.email,
        name: auth.name,
        avatar_url: None,
    }))
}

/// Mirror the auth-provider identity into the local users table so
/// created_by references resolve.
async fn sync_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<UserResponse>> {
    let user = User::create(auth.id, &auth.email, &auth.name, None)?;
    UserRepo::new(state.pool.clone()).upsert(&user).await?;

    Ok(Json(user.into()))
}
