//! # vigil-guard
//!
//! The interceptor placed in front of any sensitive operation.
//!
//! A [`Guard`] is built once per protected operation with fixed action-type
//! and risk-level tags, then reused for every call. On each invocation it
//! snapshots the call's primary argument, asks the decision engine, and only
//! runs the wrapped operation on ALLOW. DENY and REQUIRE_HUMAN short-circuit
//! with structured errors carrying the correlation id; any failure in the
//! check pipeline itself fails closed — the operation is never invoked on a
//! broken check, because letting it through would defeat the gateway.
//!
//! Works the same in front of externally reachable operations and for
//! background jobs: when no caller identity is supplied the actor is
//! `system`.

pub mod error;
pub mod guard;
pub mod identity;

pub use error::GuardError;
pub use guard::Guard;
pub use identity::CallerIdentity;
