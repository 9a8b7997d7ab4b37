//! The rule-evaluation contract.
//!
//! Vigil does not implement the risk rules; it defines the contract they
//! satisfy. A rule set is anything that can look at one [`CheckRequest`] and
//! produce a verdict with its supporting reasons and the identifiers of the
//! rules it ran.

use async_trait::async_trait;
use vigil_core::{CheckRequest, Verdict};

/// What a rule set returns for one request.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// The verdict.
    pub verdict: Verdict,
    /// Human-readable reasons, in evaluation order.
    pub reasons: Vec<String>,
    /// Identifiers of the rules that were evaluated, in order.
    pub rules_evaluated: Vec<String>,
}

impl RuleOutcome {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            reasons: Vec::new(),
            rules_evaluated: Vec::new(),
        }
    }

    /// An ALLOW with no reasons.
    pub fn allow() -> Self {
        Self::new(Verdict::Allow)
    }

    /// A DENY carrying one reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::new(Verdict::Deny).with_reason(reason)
    }

    /// A REQUIRE_HUMAN carrying one reason.
    pub fn require_human(reason: impl Into<String>) -> Self {
        Self::new(Verdict::RequireHuman).with_reason(reason)
    }

    /// Append a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Record a rule identifier as evaluated.
    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rules_evaluated.push(rule_id.into());
        self
    }
}

/// A pluggable rule set.
///
/// Treated as a pure function of its input for the duration of one call: the
/// engine does not retry or cache. Implementations may run their rules
/// concurrently internally; that is opaque to the engine.
#[async_trait]
pub trait RuleEvaluator: Send + Sync {
    async fn evaluate(&self, request: &CheckRequest) -> anyhow::Result<RuleOutcome>;
}

/// Rule set that allows everything. Useful for wiring checks and tests;
/// never deploy it in front of anything that matters.
pub struct PermitAllEvaluator;

#[async_trait]
impl RuleEvaluator for PermitAllEvaluator {
    async fn evaluate(&self, request: &CheckRequest) -> anyhow::Result<RuleOutcome> {
        tracing::debug!(
            action = %request.action_type,
            actor = %request.actor_id,
            "permit-all evaluation"
        );
        Ok(RuleOutcome::allow().with_rule("permit_all"))
    }
}

/// Rule set that returns a fixed outcome regardless of input.
pub struct StaticEvaluator {
    outcome: RuleOutcome,
}

impl StaticEvaluator {
    pub fn new(outcome: RuleOutcome) -> Self {
        Self { outcome }
    }
}

#[async_trait]
impl RuleEvaluator for StaticEvaluator {
    async fn evaluate(&self, _request: &CheckRequest) -> anyhow::Result<RuleOutcome> {
        Ok(self.outcome.clone())
    }
}

/// Adapter turning a closure into a [`RuleEvaluator`].
pub struct FnEvaluator<F>(F);

impl<F> FnEvaluator<F>
where
    F: Fn(&CheckRequest) -> anyhow::Result<RuleOutcome> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> RuleEvaluator for FnEvaluator<F>
where
    F: Fn(&CheckRequest) -> anyhow::Result<RuleOutcome> + Send + Sync,
{
    async fn evaluate(&self, request: &CheckRequest) -> anyhow::Result<RuleOutcome> {
        (self.0)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{ActionType, ActorKind, RiskLevel};

    fn request() -> CheckRequest {
        CheckRequest::new(
            ActionType::RoleGrant,
            RiskLevel::P1,
            ActorKind::Human,
            "admin-1",
        )
    }

    #[tokio::test]
    async fn permit_all_allows() {
        let outcome = PermitAllEvaluator.evaluate(&request()).await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Allow);
        assert_eq!(outcome.rules_evaluated, vec!["permit_all"]);
    }

    #[tokio::test]
    async fn static_evaluator_returns_its_outcome() {
        let evaluator = StaticEvaluator::new(
            RuleOutcome::deny("actor blocklisted").with_rule("actor.blocklist"),
        );
        let outcome = evaluator.evaluate(&request()).await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Deny);
        assert_eq!(outcome.reasons, vec!["actor blocklisted"]);
    }

    #[tokio::test]
    async fn fn_evaluator_sees_the_request() {
        let evaluator = FnEvaluator::new(|req: &CheckRequest| {
            if req.risk_level == RiskLevel::P0 {
                Ok(RuleOutcome::require_human("P0 actions always reviewed"))
            } else {
                Ok(RuleOutcome::allow())
            }
        });

        let low = evaluator.evaluate(&request()).await.unwrap();
        assert_eq!(low.verdict, Verdict::Allow);

        let mut p0 = request();
        p0.risk_level = RiskLevel::P0;
        let high = evaluator.evaluate(&p0).await.unwrap();
        assert_eq!(high.verdict, Verdict::RequireHuman);
    }
}
