//! Reviewer decisions over pending entries.

use crate::error::WorkflowError;
use std::sync::Arc;
use vigil_core::{ApprovalStatus, AuditLogEntry};
use vigil_store::AuditStore;

/// Approve/reject operations restricted to entries pending human review.
///
/// Both operations run the same shape: fetch, check the state, then the
/// store's conditional update. Two reviewers racing for the same entry both
/// pass the pre-check at worst; the compare-and-swap lets exactly one
/// through and the loser sees [`WorkflowError::InvalidState`] with the
/// now-current status — never a silent overwrite.
pub struct ApprovalWorkflow {
    store: Arc<dyn AuditStore>,
}

impl ApprovalWorkflow {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Approve a pending entry, recording the approver.
    ///
    /// This flips the gate only. The originally attempted operation is not
    /// re-executed; its caller is expected to resubmit.
    pub async fn approve(
        &self,
        entry_id: &str,
        approver_id: &str,
    ) -> Result<AuditLogEntry, WorkflowError> {
        self.decide(entry_id, ApprovalStatus::Approved, approver_id, None)
            .await
    }

    /// Reject a pending entry, recording the rejecter and an optional reason.
    ///
    /// Rejection is terminal: a rejected action can only come back as a
    /// brand-new request through the decision engine.
    pub async fn reject(
        &self,
        entry_id: &str,
        rejecter_id: &str,
        reason: Option<&str>,
    ) -> Result<AuditLogEntry, WorkflowError> {
        self.decide(entry_id, ApprovalStatus::Rejected, rejecter_id, reason)
            .await
    }

    async fn decide(
        &self,
        entry_id: &str,
        new_status: ApprovalStatus,
        decider_id: &str,
        reason: Option<&str>,
    ) -> Result<AuditLogEntry, WorkflowError> {
        let entry = self
            .store
            .get(entry_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(entry_id.to_string()))?;

        if entry.approval_status != ApprovalStatus::PendingFounder {
            return Err(WorkflowError::InvalidState {
                id: entry_id.to_string(),
                current: entry.approval_status,
            });
        }

        let matched = self
            .store
            .update_approval_status(entry_id, new_status, decider_id, reason)
            .await?;

        if !matched {
            // Lost the race; report whatever the winner left behind.
            let current = self
                .store
                .get(entry_id)
                .await?
                .ok_or_else(|| WorkflowError::NotFound(entry_id.to_string()))?
                .approval_status;
            tracing::warn!(
                entry_id = %entry_id,
                current = %current,
                "concurrent decision lost the conditional update"
            );
            return Err(WorkflowError::InvalidState {
                id: entry_id.to_string(),
                current,
            });
        }

        self.store
            .get(entry_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(entry_id.to_string()))
    }
}
