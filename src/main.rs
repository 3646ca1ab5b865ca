use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use worktracker_api::clock::SystemClock;
use worktracker_api::config;
use worktracker_api::database::{DatabaseManager, DocumentStore, MemoryStore, PgDocumentStore};
use worktracker_api::services::seed;
use worktracker_api::{app, is_production, AppState};

#[derive(Parser, Debug)]
#[command(name = "worktracker-api")]
#[command(about = "Work Hours Tracker API server")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8001)]
    port: u16,

    /// Keep all data in process memory instead of Postgres
    #[arg(long)]
    in_memory: bool,

    /// Skip creating the default admin, settings and holidays
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting Work Hours Tracker API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set in {:?} mode", config.environment);
    }

    let store: Arc<dyn DocumentStore> = if cli.in_memory {
        if is_production!() {
            bail!("--in-memory is not allowed in production");
        }
        tracing::warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("DATABASE_URL is required unless --in-memory is given")?;
        Arc::new(PgDocumentStore::new(pool))
    };

    let state = AppState::new(store, Arc::new(config.clone()), Arc::new(SystemClock));

    if cli.no_seed {
        state.store.ensure_schema().await.context("creating document schema")?;
    } else {
        seed::run(&state).await.context("seeding defaults")?;
    }

    let bind_addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Work Hours Tracker API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
