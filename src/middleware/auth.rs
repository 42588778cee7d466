//! Bearer-token authentication
//!
//! Sign-in itself happens at the SaaS auth provider; this middleware
//! only verifies the HS256 JWT the provider issued and attaches the
//! caller's identity to the request. `AUTH_MODE=none` skips
//! verification and injects a fixed development user.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AppState;
use crate::types::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
}

/// Verified caller identity, attached as a request extension.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    fn dev() -> Self {
        Self {
            id: Uuid::nil(),
            email: "dev@localhost.dev".to_string(),
            name: "Local Developer".to_string(),
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = if state.config.auth.mode == "none" {
        AuthUser::dev()
    } else {
        let token = bearer_token(&req)
            .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;
        verify_token(token, &state.config.auth.jwt_secret)?
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| AppError::Auth(format!("Invalid token: {e}")))?;

    let claims = data.claims;
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Auth(format!("Invalid subject claim: {}", claims.sub)))?;

    let name = claims
        .name
        .unwrap_or_else(|| claims.email.split('@').next().unwrap_or_default().to_string());

    Ok(AuthUser {
        id,
        email: claims.email,
        name,
    })
}
