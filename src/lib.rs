//! healthz - predicate-driven liveness and readiness endpoints.
//!
//! The core is [`check()`]: hand it a `Fn() -> bool` and mount the returned
//! service on a route. A true predicate answers `200 OK` with a green page,
//! a false one `503 Service Unavailable` with a red page. [`always_up()`] is the
//! same responder with a constant-true predicate.
//!
//! ```ignore
//! use axum::{routing::any, Router};
//!
//! let app = Router::new()
//!     .route("/healthz", any(healthz::always_up))
//!     .route_service("/readyz", healthz::check(|| cache_is_warm()));
//! ```
//!
//! The remaining modules make up the `healthz` server binary, which mounts both
//! responders and flips readiness off during graceful shutdown.

pub mod check;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use check::{always_up, always_up_service, check, Check, Health};
pub use error::*;
