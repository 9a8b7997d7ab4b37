//! In-memory audit store.

use crate::error::StoreError;
use crate::index::EntryIndex;
use crate::store::AuditStore;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::RwLock;
use vigil_core::{ActionType, ApprovalStatus, AuditLogEntry};

/// Audit store holding everything in process memory.
///
/// Entries do not survive the process; use [`crate::FileStore`] when the
/// trail must outlive it. The compare-and-swap in `update_approval_status`
/// holds the write lock across the read-check-write, so concurrent deciders
/// serialize and exactly one wins.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<EntryIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, entry: AuditLogEntry) -> Result<String, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::lock())?;
        let id = entry.correlation_id.clone();
        inner.insert(entry).map_err(StoreError::Conflict)?;
        tracing::debug!(correlation_id = %id, "audit entry appended");
        Ok(id)
    }

    async fn get(&self, correlation_id: &str) -> Result<Option<AuditLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.get(correlation_id).cloned())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<AuditLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.pending(limit))
    }

    async fn update_approval_status(
        &self,
        correlation_id: &str,
        new_status: ApprovalStatus,
        actor_id: &str,
        reason: Option<&str>,
    ) -> Result<bool, StoreError> {
        if !new_status.is_decision() {
            return Err(StoreError::InvalidDecision(new_status));
        }

        let mut inner = self.inner.write().map_err(|_| StoreError::lock())?;
        let updated =
            inner.apply_decision(correlation_id, new_status, actor_id, reason, Utc::now());

        if let Some(ref entry) = updated {
            tracing::info!(
                correlation_id = %entry.correlation_id,
                status = %entry.approval_status,
                decided_by = %actor_id,
                "approval status updated"
            );
        }
        Ok(updated.is_some())
    }

    async fn list_by_actor(
        &self,
        actor_id: &str,
        action_type: Option<ActionType>,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.by_actor(actor_id, action_type, limit))
    }

    async fn count_recent(
        &self,
        actor_id: &str,
        action_type: ActionType,
        since_window: Duration,
    ) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.count_since(actor_id, action_type, Utc::now() - since_window))
    }
}
