//! Shared application state for request handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub readiness: Readiness,
}

impl AppState {
    /// Creates a new application state from the given configuration and readiness flag.
    pub fn new(config: AppConfig, readiness: Readiness) -> Self {
        Self {
            config: Arc::new(config),
            readiness,
        }
    }
}

/// Process-wide readiness flag.
///
/// Starts ready. Flipped once, by the shutdown handler, so the readiness probe
/// reports 503 while in-flight requests drain. Clones share the flag.
#[derive(Clone, Debug)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn mark_draining(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}
