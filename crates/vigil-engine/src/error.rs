//! Error types for the decision engine.

use thiserror::Error;
use vigil_store::StoreError;

/// Errors surfaced by [`crate::DecisionEngine::evaluate`].
///
/// None of these default to ALLOW: a validation failure means nothing was
/// written, an evaluator failure means nothing was written, and a store
/// failure means the decision could not be made durable. Callers are
/// expected to fail closed on all of them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was malformed; rejected before any log entry was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The rule evaluator raised. No entry was written for this call.
    #[error("rule evaluator failed: {0}")]
    Evaluator(#[source] anyhow::Error),

    /// The audit store could not record the decision.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A malformed check request.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The kind of validation failure.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The actor identifier was missing or blank.
    pub fn missing_actor_id() -> Self {
        Self::new(
            ValidationErrorKind::MissingActorId,
            "check request requires a non-blank actor id",
        )
    }
}

/// Categories of request validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Actor id was empty or whitespace.
    MissingActorId,
}
