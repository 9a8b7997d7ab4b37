//! The ephemeral request/result pair.
//!
//! A [`CheckRequest`] is assembled for every guarded call and lives only for
//! the duration of one decision; the persisted record is
//! [`crate::AuditLogEntry`]. The [`CheckResult`] is what the caller gets back.

use crate::action::{ActionType, ActorKind, RiskLevel};
use crate::approval::{ApprovalStatus, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything the rule evaluator needs to judge one attempted call.
///
/// Never persisted as-is; the decision engine folds it into an audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// What kind of sensitive operation is being attempted.
    pub action_type: ActionType,
    /// Caller-supplied severity tag, independent of the action type.
    pub risk_level: RiskLevel,
    /// Whether a person or an automated process is acting.
    pub actor_kind: ActorKind,
    /// Identifier of the actor (user id, service name, "system").
    pub actor_id: String,
    /// Key/value descriptor of what is being acted on.
    pub target: Map<String, Value>,
    /// Snapshot of the attempted input.
    pub payload: Map<String, Value>,
    /// Free-form extras, e.g. the originating operation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CheckRequest {
    /// Create a request with empty target and payload snapshots.
    pub fn new(
        action_type: ActionType,
        risk_level: RiskLevel,
        actor_kind: ActorKind,
        actor_id: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            risk_level,
            actor_kind,
            actor_id: actor_id.into(),
            target: Map::new(),
            payload: Map::new(),
            metadata: None,
        }
    }

    /// Set the target descriptor.
    pub fn with_target(mut self, target: Map<String, Value>) -> Self {
        self.target = target;
        self
    }

    /// Set the payload snapshot.
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Attach free-form metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Insert a single metadata entry, creating the map if needed.
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }
}

/// What the decision engine hands back to the caller of a guarded operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Identifier threading this decision through logs, review UI, and caller.
    pub correlation_id: String,
    /// The one-time verdict.
    pub verdict: Verdict,
    /// Human-readable reasons, in the order the evaluator produced them.
    pub reasons: Vec<String>,
    /// Identifiers of the rules the evaluator ran, in order.
    pub rules_evaluated: Vec<String>,
    /// Initial approval status derived from the verdict.
    pub approval_status: ApprovalStatus,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    /// Whether the guarded operation may run right now.
    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }
}
