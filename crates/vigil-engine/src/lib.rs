//! # vigil-engine
//!
//! The decision engine of the Vigil gateway.
//!
//! The engine owns one call's worth of work: assemble a [`CheckRequest`],
//! hand it to the [`RuleEvaluator`], derive the initial approval status from
//! the verdict, write exactly one audit entry, and return a
//! [`CheckResult`] to the caller.
//!
//! The rule catalogue itself lives outside this crate. Any rule set —
//! threshold checks, velocity checks, allow/deny lists — plugs in through
//! the one-method [`RuleEvaluator`] trait; the engine neither retries nor
//! caches its output, and never substitutes a verdict of its own. If the
//! evaluator fails, the failure propagates and nothing is logged; defaulting
//! to ALLOW here would defeat the gateway.
//!
//! [`CheckRequest`]: vigil_core::CheckRequest
//! [`CheckResult`]: vigil_core::CheckResult

pub mod engine;
pub mod error;
pub mod evaluator;

pub use engine::DecisionEngine;
pub use error::{EngineError, ValidationError, ValidationErrorKind};
pub use evaluator::{FnEvaluator, PermitAllEvaluator, RuleEvaluator, RuleOutcome, StaticEvaluator};
