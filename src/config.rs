//! Runtime configuration.
//!
//! Settings come from the environment (optionally seeded by a `.env` file)
//! and are collected once at startup into an explicit `Config` value. The
//! token-signing secret lives here and is handed to the token service at
//! construction; nothing reads it afterwards.

use std::env;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr =
            env::var("INKPRESS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let database_path =
            env::var("INKPRESS_DB_PATH").unwrap_or_else(|_| "inkpress.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("⚠️  JWT_SECRET not set, using development default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(30);

        Self {
            bind_addr,
            database_path,
            jwt_secret,
            token_ttl_minutes,
        }
    }
}
