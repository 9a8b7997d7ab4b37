//! The persisted audit record.
//!
//! One [`AuditLogEntry`] is written per evaluated request. Every field except
//! the approval-state group (`approval_status`, `approved_by`, `rejected_by`,
//! `approval_timestamp`, `rejection_reason`) is write-once at creation; the
//! store enforces that no other mutation exists.

use crate::action::{ActionType, ActorKind, RiskLevel};
use crate::approval::{ApprovalStatus, Verdict};
use crate::request::CheckRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single decision, as it goes to the audit store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Stable identity of this record.
    pub entry_id: Uuid,

    /// The caller-visible identifier; unique across the store.
    pub correlation_id: String,

    pub action_type: ActionType,
    pub risk_level: RiskLevel,
    pub actor_kind: ActorKind,
    pub actor_id: String,

    /// Descriptor of what was acted on, snapshotted at evaluation time.
    pub target: Map<String, Value>,
    /// The attempted input, snapshotted at evaluation time.
    pub payload: Map<String, Value>,

    /// Rule identifiers the evaluator ran, in order.
    pub rules_evaluated: Vec<String>,
    /// The one-time verdict.
    pub verdict: Verdict,
    /// Reasons backing the verdict, in order.
    pub reasons: Vec<String>,

    // ===== The only mutable field group =====
    /// Lifecycle state; transitions at most once out of PENDING_FOUNDER.
    pub approval_status: ApprovalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Free-form extras carried over from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Fold an evaluated request into its audit record.
    ///
    /// Consumes the ephemeral request; the initial approval status is derived
    /// from the verdict and nothing else.
    pub fn record(
        correlation_id: impl Into<String>,
        request: CheckRequest,
        verdict: Verdict,
        reasons: Vec<String>,
        rules_evaluated: Vec<String>,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            correlation_id: correlation_id.into(),
            action_type: request.action_type,
            risk_level: request.risk_level,
            actor_kind: request.actor_kind,
            actor_id: request.actor_id,
            target: request.target,
            payload: request.payload,
            rules_evaluated,
            verdict,
            reasons,
            approval_status: verdict.initial_status(),
            approved_by: None,
            rejected_by: None,
            approval_timestamp: None,
            rejection_reason: None,
            metadata: request.metadata,
            created_at: Utc::now(),
        }
    }

    /// Whether this entry is waiting in the review queue.
    pub fn is_pending(&self) -> bool {
        self.approval_status == ApprovalStatus::PendingFounder
    }

    /// One-line human-readable form for console output.
    ///
    /// Format: `[timestamp] ACTION risk=.. actor=.. verdict=.. status=..`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} risk={} actor={} verdict={} status={}",
            self.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.action_type,
            self.risk_level,
            self.actor_id,
            self.verdict,
            self.approval_status,
        );

        if let Some(ref by) = self.approved_by {
            line.push_str(&format!(" approved_by={}", by));
        }
        if let Some(ref by) = self.rejected_by {
            line.push_str(&format!(" rejected_by={}", by));
        }
        if !self.reasons.is_empty() {
            line.push_str(&format!(" reasons=[{}]", self.reasons.join("; ")));
        }

        line
    }
}
