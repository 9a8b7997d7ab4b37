//! The guard wrapper itself.

use crate::error::GuardError;
use crate::identity::CallerIdentity;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use vigil_core::{ActionType, CheckRequest, RiskLevel, Verdict};
use vigil_engine::DecisionEngine;

/// Extractor producing a key/value snapshot from the serialized input.
pub type SnapshotFn = Arc<dyn Fn(&Value) -> Map<String, Value> + Send + Sync>;

/// Extractor producing actor-specific context (e.g. a current balance) that
/// is injected into the payload for rules to read.
pub type ContextFn = Arc<dyn Fn(&CallerIdentity) -> Option<Value> + Send + Sync>;

/// Extractor deriving a caller identity from the serialized input, used when
/// the call site has none to pass explicitly.
pub type ActorFn = Arc<dyn Fn(&Value) -> Option<CallerIdentity> + Send + Sync>;

/// Payload key under which injected actor context lands.
const ACTOR_CONTEXT_KEY: &str = "actor_context";

/// Reusable wrapper placing a double-check in front of one operation.
///
/// Built once with fixed `action_type`/`risk_level` tags; the extractors are
/// optional overrides of the default snapshot behavior.
pub struct Guard {
    engine: Arc<DecisionEngine>,
    action_type: ActionType,
    risk_level: RiskLevel,
    operation: Option<String>,
    actor_fn: Option<ActorFn>,
    target_fn: Option<SnapshotFn>,
    payload_fn: Option<SnapshotFn>,
    context_fn: Option<ContextFn>,
}

impl Guard {
    pub fn new(engine: Arc<DecisionEngine>, action_type: ActionType, risk_level: RiskLevel) -> Self {
        Self {
            engine,
            action_type,
            risk_level,
            operation: None,
            actor_fn: None,
            target_fn: None,
            payload_fn: None,
            context_fn: None,
        }
    }

    /// Record the originating operation name in entry metadata.
    pub fn for_operation(mut self, name: impl Into<String>) -> Self {
        self.operation = Some(name.into());
        self
    }

    /// Derive the caller identity from the input when the call site passes
    /// none (e.g. a job payload carrying the triggering user).
    pub fn with_actor_extractor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<CallerIdentity> + Send + Sync + 'static,
    {
        self.actor_fn = Some(Arc::new(f));
        self
    }

    /// Override how the target descriptor is derived from the input.
    pub fn with_target_extractor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.target_fn = Some(Arc::new(f));
        self
    }

    /// Override how the payload snapshot is derived from the input.
    pub fn with_payload_extractor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.payload_fn = Some(Arc::new(f));
        self
    }

    /// Inject per-actor context (e.g. current balance) into the payload.
    pub fn with_actor_context<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallerIdentity) -> Option<Value> + Send + Sync + 'static,
    {
        self.context_fn = Some(Arc::new(f));
        self
    }

    /// Run `op` behind the double-check.
    ///
    /// On ALLOW the operation runs and its result is returned unchanged. On
    /// DENY or REQUIRE_HUMAN the operation is never invoked and no partial
    /// side effect occurs. Any failure before a verdict — snapshotting,
    /// validation, the rule evaluator, the audit store — fails closed.
    pub async fn protect<I, T, F, Fut>(
        &self,
        caller: Option<&CallerIdentity>,
        input: &I,
        op: F,
    ) -> Result<T, GuardError>
    where
        I: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let snapshot = serde_json::to_value(input).map_err(GuardError::Snapshot)?;
        let caller = match caller {
            Some(caller) => caller.clone(),
            None => self
                .actor_fn
                .as_ref()
                .and_then(|f| f(&snapshot))
                .unwrap_or_else(CallerIdentity::system),
        };

        let target = match &self.target_fn {
            Some(f) => f(&snapshot),
            None => default_target(&snapshot),
        };
        let mut payload = match &self.payload_fn {
            Some(f) => f(&snapshot),
            None => default_payload(&snapshot),
        };
        if let Some(context_fn) = &self.context_fn {
            if let Some(context) = context_fn(&caller) {
                payload.insert(ACTOR_CONTEXT_KEY.to_string(), context);
            }
        }

        let mut request = CheckRequest::new(
            self.action_type,
            self.risk_level,
            caller.kind,
            caller.actor_id,
        )
        .with_target(target)
        .with_payload(payload);
        if let Some(ref operation) = self.operation {
            request = request.with_meta_entry("operation", Value::String(operation.clone()));
        }

        let result = self
            .engine
            .evaluate(request)
            .await
            .map_err(GuardError::CheckFailed)?;

        match result.verdict {
            Verdict::Allow => op().await.map_err(GuardError::Operation),
            Verdict::Deny => {
                tracing::warn!(
                    correlation_id = %result.correlation_id,
                    action = %self.action_type,
                    "guarded operation denied"
                );
                Err(GuardError::Denied {
                    correlation_id: result.correlation_id,
                    reasons: result.reasons,
                })
            }
            Verdict::RequireHuman => Err(GuardError::PendingApproval {
                correlation_id: result.correlation_id.clone(),
                message: format!(
                    "action is awaiting human approval; resubmit after a reviewer decides (correlation id {})",
                    result.correlation_id
                ),
            }),
        }
    }
}

/// Default target descriptor: the identifying fields of the input, i.e.
/// `id` and any key ending in `_id`.
fn default_target(snapshot: &Value) -> Map<String, Value> {
    match snapshot.as_object() {
        Some(object) => object
            .iter()
            .filter(|(key, _)| key.as_str() == "id" || key.ends_with("_id"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => Map::new(),
    }
}

/// Default payload snapshot: the whole input object; non-object inputs are
/// wrapped under a `value` key.
fn default_payload(snapshot: &Value) -> Map<String, Value> {
    match snapshot.as_object() {
        Some(object) => object.clone(),
        None => {
            let mut map = Map::new();
            map.insert("value".to_string(), snapshot.clone());
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vigil_core::{ActorKind, ApprovalStatus};
    use vigil_engine::{FnEvaluator, RuleOutcome, StaticEvaluator};
    use vigil_store::{AuditStore, MemoryStore};

    #[derive(Serialize)]
    struct PayoutArgs {
        wallet_id: String,
        amount_cents: u64,
    }

    fn args() -> PayoutArgs {
        PayoutArgs {
            wallet_id: "wal-9".to_string(),
            amount_cents: 250_000,
        }
    }

    fn guard_with(outcome: RuleOutcome) -> (Guard, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(DecisionEngine::new(
            Arc::new(StaticEvaluator::new(outcome)),
            store.clone(),
        ));
        (
            Guard::new(engine, ActionType::WalletPayout, RiskLevel::P0),
            store,
        )
    }

    #[tokio::test]
    async fn allow_runs_the_operation_and_returns_its_result() {
        let (guard, store) = guard_with(RuleOutcome::allow());
        let calls = AtomicUsize::new(0);

        let paid = guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42u64)
            })
            .await
            .unwrap();

        assert_eq!(paid, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn deny_short_circuits_with_reasons() {
        let (guard, store) = guard_with(RuleOutcome::deny("actor blocklisted"));
        let calls = AtomicUsize::new(0);

        let err = guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 0, "operation must not run");
        assert!(err.is_denied());
        match err {
            GuardError::Denied { correlation_id, reasons } => {
                assert_eq!(reasons, vec!["actor blocklisted"]);
                let entry = store.get(&correlation_id).await.unwrap().unwrap();
                assert_eq!(entry.approval_status, ApprovalStatus::Auto);
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn require_human_pends_without_running() {
        let (guard, store) = guard_with(RuleOutcome::require_human("over limit"));
        let calls = AtomicUsize::new(0);

        let err = guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match err {
            GuardError::PendingApproval { correlation_id, message } => {
                assert!(message.contains("awaiting human approval"));
                let entry = store.get(&correlation_id).await.unwrap().unwrap();
                assert_eq!(entry.approval_status, ApprovalStatus::PendingFounder);
            }
            other => panic!("expected PendingApproval, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn evaluator_failure_fails_closed_and_logs_nothing() {
        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(DecisionEngine::new(
            Arc::new(FnEvaluator::new(|_: &CheckRequest| {
                anyhow::bail!("rule backend unreachable")
            })),
            store.clone(),
        ));
        let guard = Guard::new(engine, ActionType::WalletPayout, RiskLevel::P0);
        let calls = AtomicUsize::new(0);

        let err = guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 0, "operation must not run");
        assert!(err.is_denied(), "a broken check is deny-equivalent");
        assert!(matches!(err, GuardError::CheckFailed(_)));
        assert!(store.is_empty(), "no audit entry for a failed evaluation");
    }

    #[tokio::test]
    async fn missing_caller_defaults_to_system_actor() {
        let (guard, store) = guard_with(RuleOutcome::allow());

        guard
            .protect(None, &args(), || async { Ok(()) })
            .await
            .unwrap();

        let history = store.list_by_actor("system", None, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].actor_kind, ActorKind::System);
    }

    #[tokio::test]
    async fn actor_extractor_fills_in_a_missing_caller() {
        let (guard, store) = guard_with(RuleOutcome::allow());
        let guard = guard.with_actor_extractor(|snapshot| {
            snapshot
                .get("wallet_id")
                .and_then(Value::as_str)
                .map(|owner| CallerIdentity::service(format!("payout-job:{owner}")))
        });

        guard
            .protect(None, &args(), || async { Ok(()) })
            .await
            .unwrap();

        let history = store
            .list_by_actor("payout-job:wal-9", None, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);

        // An explicit caller still wins over the extractor.
        guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(store.list_by_actor("user-1", None, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn default_snapshots_split_target_and_payload() {
        let (guard, store) = guard_with(RuleOutcome::allow());

        guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                Ok(())
            })
            .await
            .unwrap();

        let entry = &store.list_by_actor("user-1", None, 1).await.unwrap()[0];
        assert_eq!(entry.target.get("wallet_id"), Some(&json!("wal-9")));
        assert!(entry.target.get("amount_cents").is_none());
        assert_eq!(entry.payload.get("amount_cents"), Some(&json!(250_000)));
    }

    #[tokio::test]
    async fn actor_context_is_injected_into_payload() {
        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(DecisionEngine::new(
            Arc::new(StaticEvaluator::new(RuleOutcome::allow())),
            store.clone(),
        ));
        let guard = Guard::new(engine, ActionType::WalletPayout, RiskLevel::P1)
            .for_operation("payoutWallet")
            .with_actor_context(|caller| {
                Some(json!({ "balance_cents": 900_000, "actor": caller.actor_id }))
            });

        guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                Ok(())
            })
            .await
            .unwrap();

        let entry = &store.list_by_actor("user-1", None, 1).await.unwrap()[0];
        let context = entry.payload.get("actor_context").unwrap();
        assert_eq!(context["balance_cents"], json!(900_000));
        let meta = entry.metadata.as_ref().unwrap();
        assert_eq!(meta.get("operation"), Some(&json!("payoutWallet")));
    }

    #[tokio::test]
    async fn custom_extractors_override_defaults() {
        let (guard, store) = guard_with(RuleOutcome::allow());
        let guard = guard.with_target_extractor(|snapshot| {
            let mut map = Map::new();
            map.insert("kind".to_string(), json!("wallet"));
            if let Some(id) = snapshot.get("wallet_id") {
                map.insert("ref".to_string(), id.clone());
            }
            map
        });

        guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                Ok(())
            })
            .await
            .unwrap();

        let entry = &store.list_by_actor("user-1", None, 1).await.unwrap()[0];
        assert_eq!(entry.target.get("kind"), Some(&json!("wallet")));
        assert_eq!(entry.target.get("ref"), Some(&json!("wal-9")));
    }

    #[tokio::test]
    async fn operation_error_is_distinguishable_from_denial() {
        let (guard, _store) = guard_with(RuleOutcome::allow());

        let result: Result<(), GuardError> = guard
            .protect(Some(&CallerIdentity::human("user-1")), &args(), || async {
                anyhow::bail!("upstream transfer failed")
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, GuardError::Operation(_)));
        assert!(!err.is_denied());
    }
}
