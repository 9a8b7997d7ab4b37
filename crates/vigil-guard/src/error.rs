//! Error types for guarded operations.

use thiserror::Error;
use vigil_engine::EngineError;

/// Outcome of a guarded call that did not run to completion.
///
/// `Denied`, `CheckFailed`, and `Snapshot` are all deny-equivalent: the
/// protected operation was never invoked. `PendingApproval` tells the caller
/// to resubmit the identical request once a reviewer has decided.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The rules said no. Carries the reasons for the caller.
    #[error("action denied ({correlation_id}): {}", .reasons.join("; "))]
    Denied {
        correlation_id: String,
        reasons: Vec<String>,
    },

    /// The action is parked for human review; retry after a decision.
    #[error("{message} ({correlation_id})")]
    PendingApproval {
        correlation_id: String,
        message: String,
    },

    /// The decision pipeline itself failed; failing closed.
    #[error("double-check failed, action blocked: {0}")]
    CheckFailed(#[source] EngineError),

    /// The operation input could not be snapshotted; failing closed.
    #[error("failed to snapshot operation input, action blocked: {0}")]
    Snapshot(#[source] serde_json::Error),

    /// The protected operation itself failed after an ALLOW.
    #[error(transparent)]
    Operation(anyhow::Error),
}

impl GuardError {
    /// Whether this outcome blocked the operation (fail-closed included).
    pub fn is_denied(&self) -> bool {
        matches!(
            self,
            GuardError::Denied { .. } | GuardError::CheckFailed(_) | GuardError::Snapshot(_)
        )
    }

    /// The correlation id, when a decision was actually recorded.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            GuardError::Denied { correlation_id, .. }
            | GuardError::PendingApproval { correlation_id, .. } => Some(correlation_id),
            _ => None,
        }
    }
}
