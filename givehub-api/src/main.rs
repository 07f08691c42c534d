//! # GiveHub API Server
//!
//! This is the API server for GiveHub, a donation platform backend:
//! user registration/auth, campaign CRUD, donation recording, and reporting
//! aggregates.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - Authentication (JWT bearer tokens, Argon2id password hashing)
//! - Campaign management with image hosting via an external object store
//! - A transactional donation ledger
//! - Reporting aggregates over the full donation history
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p givehub-api
//! ```

use std::sync::Arc;

use givehub_api::{
    app::{build_router, AppState},
    config::Config,
};
use givehub_shared::{
    db::{migrations, pool},
    storage::HttpImageStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "givehub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "GiveHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // The pool is created once here and shared via AppState for the life of
    // the process
    let db = pool::create_pool(givehub_shared::db::pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let images = Arc::new(HttpImageStore::new(&config.images.upload_url));

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, images);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
