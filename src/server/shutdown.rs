//! Graceful shutdown and signal handling.
//!
//! Handles SIGTERM/SIGINT by marking the process as draining, keeping the
//! listener open for the drain delay so probes observe the 503, and then
//! asking the server to finish in-flight connections.

use std::time::Duration;

use axum_server::Handle;

use crate::config::ShutdownConfig;
use crate::state::Readiness;

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// When either signal is received:
/// 1. The readiness probe starts answering 503
/// 2. After `drain_delay`, the server stops accepting new connections
/// 3. Existing connections get up to `grace_period` to complete
pub fn setup_shutdown_handler(handle: Handle, readiness: Readiness, config: ShutdownConfig) {
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(signal, "Initiating graceful shutdown");
        drain(&readiness, &handle, config.drain_delay(), config.grace_period()).await;
    });
}

/// Clear readiness, wait `drain_delay`, then start the graceful shutdown of `handle`.
pub(crate) async fn drain(
    readiness: &Readiness,
    handle: &Handle,
    drain_delay: Duration,
    grace_period: Duration,
) {
    readiness.mark_draining();
    tracing::info!(
        drain_delay_secs = drain_delay.as_secs(),
        "Readiness cleared, still accepting connections"
    );

    if !drain_delay.is_zero() {
        tokio::time::sleep(drain_delay).await;
    }

    handle.graceful_shutdown(Some(grace_period));
    tracing::info!(
        grace_period_secs = grace_period.as_secs(),
        "Listener closed, waiting for connections to finish"
    );
}

/// Resolves with the name of the first termination signal received.
async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
