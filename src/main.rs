//! healthz: a standalone liveness/readiness server.
//!
//! This is the application entry point. It loads configuration from a TOML
//! file, initializes tracing, sets up the Axum router with the probe routes,
//! and serves until SIGTERM/SIGINT.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthz::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use healthz::routes::create_router;
use healthz::server::start_server;
use healthz::state::{AppState, Readiness};

/// healthz: liveness and readiness probes over HTTP
#[derive(Parser, Debug)]
#[command(name = "healthz", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "healthz=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: it selects the log format
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(config = %args.config, "Loaded configuration");

    let readiness = Readiness::new();
    let state = AppState::new(config.clone(), readiness.clone());
    let app = create_router(state);

    start_server(app, &config, readiness).await?;

    Ok(())
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
