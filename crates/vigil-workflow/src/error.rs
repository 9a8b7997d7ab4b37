//! Error types for the approval workflow and query surface.

use thiserror::Error;
use vigil_core::ApprovalStatus;
use vigil_store::StoreError;

/// Errors surfaced to reviewers and operators.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No entry with this correlation id exists.
    #[error("audit entry not found: {0}")]
    NotFound(String),

    /// The entry has already been resolved; carries the current status so a
    /// UI can explain "already handled".
    #[error("entry '{id}' is not pending review (current status: {current})")]
    InvalidState { id: String, current: ApprovalStatus },

    /// The audit store failed underneath us.
    #[error(transparent)]
    Store(#[from] StoreError),
}
