//! Error types for the audit store.

use thiserror::Error;
use vigil_core::ApprovalStatus;

/// Errors that can occur during audit store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry with this correlation id already exists. Correlation ids are
    /// caller-generated and unique; a collision indicates a bug upstream.
    #[error("audit entry with correlation id '{0}' already exists")]
    Conflict(String),

    /// `update_approval_status` was called with a status that is not a
    /// reviewer decision.
    #[error("'{0}' is not a valid decision status; only APPROVED and REJECTED may be applied")]
    InvalidDecision(ApprovalStatus),

    /// Infrastructure failure reaching the store.
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Shorthand for a poisoned-lock failure.
    pub(crate) fn lock() -> Self {
        StoreError::Unavailable("store lock poisoned".to_string())
    }
}
