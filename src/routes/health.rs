//! Probe endpoints for container orchestration.
//!
//! Liveness is the always-up responder: if the process can answer HTTP, it is
//! alive. Readiness reads the process-wide readiness flag, so it turns 503 as
//! soon as shutdown begins and load balancers stop sending new traffic.

use crate::check::{check, Check};
use crate::state::Readiness;

pub use crate::check::always_up as liveness;

/// Readiness responder bound to `flag`.
pub fn readiness(flag: &Readiness) -> Check<impl Fn() -> bool + Send + Sync + 'static> {
    let flag = flag.clone();
    check(move || flag.is_ready())
}
