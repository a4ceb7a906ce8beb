//! demo-app: HTTP service entry point.
//!
//! Initializes tracing, reads configuration from the environment, creates the
//! PostgreSQL pool, builds the Axum router and serves until a shutdown signal.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demo_app::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use demo_app::http::start_server;
use demo_app::{create_pool, create_router, AppState};

/// Demo HTTP service with database-backed health probes
#[derive(Parser, Debug)]
#[command(name = "demo-app", version, about)]
struct Args {
    /// Log level filter (e.g., "demo_app=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    // Read ahead of the full config so config errors use the requested format
    let logging = LoggingConfig::from_env();

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
    })?;

    tracing::info!(
        db_host = %config.database.host,
        db_port = config.database.port,
        db_name = %config.database.name,
        db_ssl = config.database.ssl,
        environment = %config.environment,
        "Loaded configuration"
    );

    if config.database.ssl {
        tracing::warn!("DB_SSL enabled without certificate verification; not for production use");
    }

    let pool = create_pool(&config.database);
    let state = AppState::new(config.clone(), Arc::new(pool.clone()));
    let app = create_router(state);

    start_server(app, &config).await?;

    pool.close().await;
    tracing::info!("Server stopped, database pool closed");

    Ok(())
}
