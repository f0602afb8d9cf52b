//! HTTP route handlers.
//!
//! The probe routes are configurable and carry `Cache-Control: no-store`.
//! Everything else falls through to a 404 page. Request tracing is enabled via
//! middleware that generates a unique request ID for each incoming request.

pub mod health;

use axum::{http::Uri, middleware, routing::any, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_HEALTH;
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with the probe routes.
pub fn create_router(state: AppState) -> Router {
    let probes = &state.config.health;

    // Probes answer every method, never cached
    let health_routes = Router::new()
        .route(&probes.liveness_path, any(health::liveness))
        .route_service(&probes.readiness_path, health::readiness(&state.readiness))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(health_routes)
        .fallback(not_found)
        .with_state(state.clone())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn_with_state(state, request_id_layer))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
