//! Read-only projections over the audit store.

use crate::error::WorkflowError;
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use vigil_core::{ActionType, AuditLogEntry, GatewayConfig};
use vigil_store::AuditStore;

/// Operator-facing reads: pending queue, lookups, history, rate counts.
///
/// Limits are caller-supplied and clamped to the configured page ceiling;
/// nothing here mutates state or re-evaluates rules.
pub struct QuerySurface {
    store: Arc<dyn AuditStore>,
    config: GatewayConfig,
}

impl QuerySurface {
    pub fn new(store: Arc<dyn AuditStore>, config: GatewayConfig) -> Self {
        Self { store, config }
    }

    /// Entries awaiting review, newest-first.
    pub async fn pending(&self, limit: Option<usize>) -> Result<Vec<AuditLogEntry>, WorkflowError> {
        let limit = self.clamp(limit);
        Ok(self.store.list_pending(limit).await?)
    }

    /// A single entry by correlation id.
    pub async fn entry(&self, entry_id: &str) -> Result<AuditLogEntry, WorkflowError> {
        self.store
            .get(entry_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(entry_id.to_string()))
    }

    /// Full action history for an actor, optionally filtered by action type.
    pub async fn actor_history(
        &self,
        actor_id: &str,
        action_type: Option<ActionType>,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLogEntry>, WorkflowError> {
        let limit = self.clamp(limit);
        Ok(self.store.list_by_actor(actor_id, action_type, limit).await?)
    }

    /// How many entries this actor produced for an action type within the
    /// trailing window (the configured velocity window when `None`).
    pub async fn recent_count(
        &self,
        actor_id: &str,
        action_type: ActionType,
        window: Option<Duration>,
    ) -> Result<usize, WorkflowError> {
        let window =
            window.unwrap_or_else(|| Duration::hours(self.config.review.velocity_window_hours));
        Ok(self.store.count_recent(actor_id, action_type, window).await?)
    }

    /// Liveness summary. Unauthenticated by design, so it must never carry
    /// secrets; the config summary is the secret-free subset.
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            config: self.config.summary(),
        }
    }

    fn clamp(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.config.review.default_page_limit)
            .min(self.config.review.max_page_limit)
    }
}

/// Payload of the liveness probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub config: serde_json::Value,
}
