//! The audit store trait.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Duration;
use vigil_core::{ActionType, ApprovalStatus, AuditLogEntry};

/// Append-mostly storage for double-check decisions.
///
/// Implementations must make `update_approval_status` an atomic conditional
/// update: it succeeds only while the stored status is still
/// `PENDING_FOUNDER`, which is what prevents two reviewers from both
/// "successfully" deciding the same entry. No ordering is required between
/// unrelated entries.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Insert a new entry. Returns its correlation id.
    ///
    /// Fails with [`StoreError::Conflict`] if an entry with the same
    /// correlation id already exists.
    async fn append(&self, entry: AuditLogEntry) -> Result<String, StoreError>;

    /// Fetch an entry by correlation id.
    async fn get(&self, correlation_id: &str) -> Result<Option<AuditLogEntry>, StoreError>;

    /// Entries waiting for human review, newest-first, at most `limit`.
    async fn list_pending(&self, limit: usize) -> Result<Vec<AuditLogEntry>, StoreError>;

    /// The only permitted mutation: move a pending entry to a decision.
    ///
    /// `new_status` must be `APPROVED` or `REJECTED`. Returns `false` when no
    /// pending entry matched (already resolved, or the id does not exist) —
    /// the compare-and-swap lost, never a silent overwrite.
    async fn update_approval_status(
        &self,
        correlation_id: &str,
        new_status: ApprovalStatus,
        actor_id: &str,
        reason: Option<&str>,
    ) -> Result<bool, StoreError>;

    /// Per-actor history, newest-first, optionally filtered by action type.
    async fn list_by_actor(
        &self,
        actor_id: &str,
        action_type: Option<ActionType>,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, StoreError>;

    /// How many entries this actor produced for `action_type` within the
    /// trailing `since_window`. The primitive behind velocity checks.
    async fn count_recent(
        &self,
        actor_id: &str,
        action_type: ActionType,
        since_window: Duration,
    ) -> Result<usize, StoreError>;
}
