use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub embedding: EmbeddingConfig,
    pub note: NoteConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub openai_api_key: String,
    pub api_base: String,
    pub model: String,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret the auth provider signs its JWTs with.
    pub jwt_secret: String,
    /// "jwt" verifies bearer tokens; "none" injects a fixed dev user.
    pub mode: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let auth = AuthConfig {
            jwt_secret: env::var("AUTH_JWT_SECRET").unwrap_or_default(),
            mode: env::var("AUTH_MODE").unwrap_or_else(|_| "none".to_string()),
        };

        if auth.mode == "jwt" && auth.jwt_secret.is_empty() {
            anyhow::bail!("AUTH_JWT_SECRET must be set when AUTH_MODE=jwt");
        }

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            embedding: EmbeddingConfig {
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                api_base: env::var("OPENAI_API_BASE")
                    .unwrap_or_else(|_| "https://api.openai.com".to_string()),
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
                dimensions: env::var("EMBEDDING_DIMENSIONS")
                    .unwrap_or_else(|_| "1536".to_string())
                    .parse()?,
            },
            note: NoteConfig {
                base_url: env::var("NOTE_BASE_URL")
                    .unwrap_or_else(|_| "https://note.com".to_string()),
            },
            auth,
        })
    }
}
