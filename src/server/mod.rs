//! HTTP server startup with graceful shutdown.
//!
//! On SIGTERM/SIGINT the readiness flag is cleared first, then the listener
//! stops accepting connections and waits for in-flight requests to finish.

mod shutdown;

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;
use crate::state::Readiness;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse the configured `http.host` and `http.port` into a socket address.
pub fn listen_addr(config: &AppConfig) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| {
            ServerError::Address(format!(
                "{}:{} ({})",
                config.http.host, config.http.port, e
            ))
        })
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(
    app: Router,
    config: &AppConfig,
    readiness: Readiness,
) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let handle = Handle::new();

    shutdown::setup_shutdown_handler(handle.clone(), readiness, config.shutdown.clone());

    tracing::info!(
        %addr,
        liveness = %config.health.liveness_path,
        readiness = %config.health.readiness_path,
        "Starting HTTP server"
    );

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
