mod config;
mod db;
mod errors;
mod models;
mod progress;
mod routes;
mod state;
mod tasks;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ProgressBackend};
use crate::db::{create_pool, ensure_schema};
use crate::progress::{
    InMemoryProgressStore, JsonFileProgressStore, PgProgressStore, ProgressStore, SystemClock,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Spectrum API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    let state = AppState {
        store,
        clock: Arc::new(SystemClock),
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins to the web client's domain
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the progress backend selected by PROGRESS_BACKEND.
async fn build_store(config: &Config) -> Result<Arc<dyn ProgressStore>> {
    let store: Arc<dyn ProgressStore> = match config.backend {
        ProgressBackend::Memory => {
            info!("Progress store: in-memory (state is lost on restart)");
            Arc::new(InMemoryProgressStore::new())
        }
        ProgressBackend::File => {
            info!("Progress store: JSON file {}", config.progress_file.display());
            Arc::new(JsonFileProgressStore::open(&config.progress_file).await?)
        }
        ProgressBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            info!("Progress store: PostgreSQL");
            Arc::new(PgProgressStore::new(pool))
        }
    };
    Ok(store)
}
