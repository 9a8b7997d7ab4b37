//! The decision engine.

use crate::error::{EngineError, ValidationError};
use crate::evaluator::RuleEvaluator;
use std::sync::Arc;
use vigil_core::{AuditLogEntry, CheckRequest, CheckResult, new_correlation_id};
use vigil_store::AuditStore;

/// Orchestrates one double-check: evaluate rules, log the decision, answer.
///
/// The engine is request-scoped and stateless between calls; both
/// collaborators are injected and shared. One call produces at most one
/// audit entry — none at all when validation or the evaluator fails.
pub struct DecisionEngine {
    evaluator: Arc<dyn RuleEvaluator>,
    store: Arc<dyn AuditStore>,
}

impl DecisionEngine {
    pub fn new(evaluator: Arc<dyn RuleEvaluator>, store: Arc<dyn AuditStore>) -> Self {
        Self { evaluator, store }
    }

    /// Evaluate one request end-to-end.
    ///
    /// Generates the correlation id, delegates to the rule evaluator, maps
    /// the verdict to its initial approval status, writes exactly one audit
    /// entry, and returns the result. Evaluator and store failures propagate
    /// as typed errors — the engine never converts a failure into ALLOW.
    pub async fn evaluate(&self, request: CheckRequest) -> Result<CheckResult, EngineError> {
        Self::validate(&request)?;

        let correlation_id = new_correlation_id();
        tracing::debug!(
            correlation_id = %correlation_id,
            action = %request.action_type,
            risk = %request.risk_level,
            actor = %request.actor_id,
            "evaluating check request"
        );

        let outcome = self
            .evaluator
            .evaluate(&request)
            .await
            .map_err(EngineError::Evaluator)?;

        let entry = AuditLogEntry::record(
            correlation_id,
            request,
            outcome.verdict,
            outcome.reasons,
            outcome.rules_evaluated,
        );

        let result = CheckResult {
            correlation_id: entry.correlation_id.clone(),
            verdict: entry.verdict,
            reasons: entry.reasons.clone(),
            rules_evaluated: entry.rules_evaluated.clone(),
            approval_status: entry.approval_status,
            timestamp: entry.created_at,
        };

        self.store.append(entry).await?;
        tracing::info!(
            correlation_id = %result.correlation_id,
            verdict = %result.verdict,
            status = %result.approval_status,
            "double-check decided"
        );

        Ok(result)
    }

    fn validate(request: &CheckRequest) -> Result<(), ValidationError> {
        if request.actor_id.trim().is_empty() {
            return Err(ValidationError::missing_actor_id());
        }
        Ok(())
    }
}
