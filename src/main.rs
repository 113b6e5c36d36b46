//! Inkpress - Articles, tags, and the people who write them
//! Mission: Small CRUD API with token auth and role-based access

use anyhow::{Context, Result};
use dotenv::dotenv;
use inkpress_backend::{api::create_router, auth::JwtHandler, config::Config, db::Database};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    info!("🚀 Inkpress backend starting");

    let store = Arc::new(Database::new(&config.database_path)?);
    let jwt = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.token_ttl_minutes,
    ));
    info!("🔐 Authentication initialized, store at: {}", config.database_path);

    let app = create_router(store, jwt);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with an env-filter override hook.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpress_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
