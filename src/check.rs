//! Predicate-driven health responder.
//!
//! A [`Check`] wraps a caller-supplied predicate and answers every request with
//! one of two fixed HTML pages: a green page with `200 OK` when the predicate
//! holds, a red page with `503 Service Unavailable` when it does not. The
//! request itself is never inspected, so the responder can be mounted on any
//! route and method.
//!
//! The predicate runs synchronously, once per request, on whatever task the
//! server dispatched the request to. A panicking predicate is not caught here;
//! it unwinds into the server's own fault handling.

use std::convert::Infallible;
use std::fmt;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use const_format::formatcp;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use tower::Service;

/// Background color of the page served when the predicate holds.
pub const COLOR_UP: &str = "green";

/// Background color of the page served when the predicate fails.
pub const COLOR_DOWN: &str = "red";

/// Content-Type of both health pages.
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// Page served with `200 OK`.
pub const BODY_UP: &str = formatcp!(
    r#"<!DOCTYPE html><html><body style="background-color: {}"></body></html>"#,
    COLOR_UP
);

/// Page served with `503 Service Unavailable`.
pub const BODY_DOWN: &str = formatcp!(
    r#"<!DOCTYPE html><html><body style="background-color: {}"></body></html>"#,
    COLOR_DOWN
);

/// Outcome of a single predicate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// Predicate held: `200 OK`, green page.
    Up,
    /// Predicate failed: `503 Service Unavailable`, red page.
    Down,
}

impl Health {
    /// Whether the predicate held.
    pub fn is_up(self) -> bool {
        matches!(self, Health::Up)
    }

    /// Status code sent for this outcome.
    pub fn status(self) -> StatusCode {
        match self {
            Health::Up => StatusCode::OK,
            Health::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// HTML page sent for this outcome.
    pub fn body(self) -> &'static str {
        match self {
            Health::Up => BODY_UP,
            Health::Down => BODY_DOWN,
        }
    }
}

impl From<bool> for Health {
    fn from(healthy: bool) -> Self {
        if healthy {
            Health::Up
        } else {
            Health::Down
        }
    }
}

impl IntoResponse for Health {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body()));
        *response.status_mut() = self.status();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML));
        response
    }
}

/// Health responder parameterized by a predicate.
///
/// Cloning is cheap and shares the predicate, so a `Check` can be handed to
/// `Router::route_service` even when the predicate itself is not `Clone`.
pub struct Check<F> {
    predicate: Arc<F>,
}

/// Creates a health responder from `predicate`.
///
/// ```ignore
/// let app = Router::new().route_service("/healthz", healthz::check(|| db_pool_is_warm()));
/// ```
pub fn check<F>(predicate: F) -> Check<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Check::new(predicate)
}

impl<F> Check<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    /// Wraps `predicate`; same as [`check`].
    pub fn new(predicate: F) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluates the predicate exactly once.
    pub fn health(&self) -> Health {
        let health = Health::from((self.predicate)());
        if health.is_up() {
            tracing::debug!(status = health.status().as_u16(), "Health check passed");
        } else {
            tracing::warn!(status = health.status().as_u16(), "Health check failed");
        }
        health
    }

    /// Evaluates the predicate and renders the matching page.
    pub fn respond(&self) -> Response {
        self.health().into_response()
    }
}

impl<F> Clone for Check<F> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<F> fmt::Debug for Check<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").finish_non_exhaustive()
    }
}

impl<F, B> Service<http::Request<B>> for Check<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Ready<Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _request: http::Request<B>) -> Self::Future {
        ready(Ok(self.respond()))
    }
}

fn always_true() -> bool {
    true
}

/// The always-up responder as a service, for `Router::route_service`.
pub fn always_up_service() -> Check<fn() -> bool> {
    check(always_true as fn() -> bool)
}

/// Handler that reports healthy for every request.
///
/// For processes with no health logic of their own: if the process can answer
/// HTTP at all, it is alive.
pub async fn always_up(request: Request) -> Response {
    match always_up_service().call(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
