//! Shared in-memory index over audit entries.
//!
//! Both backends keep their working set here; the file backend layers
//! persistence on top. The index is not itself thread-safe — callers hold a
//! lock around it, and the compare-and-swap in [`EntryIndex::apply_decision`]
//! is atomic because it runs entirely under that lock.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use vigil_core::{ActionType, ApprovalStatus, AuditLogEntry};

#[derive(Default)]
pub(crate) struct EntryIndex {
    by_id: HashMap<String, AuditLogEntry>,
    /// Correlation ids in insertion order, oldest first.
    order: Vec<String>,
}

impl EntryIndex {
    /// Insert a new entry; `Err` with the id on a duplicate.
    pub(crate) fn insert(&mut self, entry: AuditLogEntry) -> Result<(), String> {
        let id = entry.correlation_id.clone();
        if self.by_id.contains_key(&id) {
            return Err(id);
        }
        self.order.push(id.clone());
        self.by_id.insert(id, entry);
        Ok(())
    }

    /// Insert-or-replace used when replaying a log file: a later record for
    /// the same correlation id supersedes the earlier one.
    pub(crate) fn replay(&mut self, entry: AuditLogEntry) {
        let id = entry.correlation_id.clone();
        if self.by_id.insert(id.clone(), entry).is_none() {
            self.order.push(id);
        }
    }

    pub(crate) fn get(&self, correlation_id: &str) -> Option<&AuditLogEntry> {
        self.by_id.get(correlation_id)
    }

    pub(crate) fn contains(&self, correlation_id: &str) -> bool {
        self.by_id.contains_key(correlation_id)
    }

    /// The conditional update. Succeeds only while the stored status is
    /// still `PENDING_FOUNDER`; returns the updated entry, or `None` when
    /// nothing matched.
    pub(crate) fn apply_decision(
        &mut self,
        correlation_id: &str,
        new_status: ApprovalStatus,
        actor_id: &str,
        reason: Option<&str>,
        decided_at: DateTime<Utc>,
    ) -> Option<AuditLogEntry> {
        let entry = self.by_id.get_mut(correlation_id)?;
        if entry.approval_status != ApprovalStatus::PendingFounder {
            return None;
        }

        entry.approval_status = new_status;
        entry.approval_timestamp = Some(decided_at);
        match new_status {
            ApprovalStatus::Approved => entry.approved_by = Some(actor_id.to_string()),
            ApprovalStatus::Rejected => {
                entry.rejected_by = Some(actor_id.to_string());
                entry.rejection_reason = reason.map(str::to_string);
            }
            // Callers validate before reaching here.
            ApprovalStatus::Auto | ApprovalStatus::PendingFounder => return None,
        }

        Some(entry.clone())
    }

    /// Pending entries, newest-first.
    pub(crate) fn pending(&self, limit: usize) -> Vec<AuditLogEntry> {
        self.newest_first(limit, |e| e.is_pending())
    }

    /// Per-actor history, newest-first.
    pub(crate) fn by_actor(
        &self,
        actor_id: &str,
        action_type: Option<ActionType>,
        limit: usize,
    ) -> Vec<AuditLogEntry> {
        self.newest_first(limit, |e| {
            e.actor_id == actor_id && action_type.is_none_or(|a| e.action_type == a)
        })
    }

    /// Entries for an actor/action pair created at or after `since`.
    pub(crate) fn count_since(
        &self,
        actor_id: &str,
        action_type: ActionType,
        since: DateTime<Utc>,
    ) -> usize {
        self.by_id
            .values()
            .filter(|e| {
                e.actor_id == actor_id && e.action_type == action_type && e.created_at >= since
            })
            .count()
    }

    fn newest_first<F>(&self, limit: usize, keep: F) -> Vec<AuditLogEntry>
    where
        F: Fn(&AuditLogEntry) -> bool,
    {
        let mut matched: Vec<AuditLogEntry> = self
            .order
            .iter()
            .rev()
            .filter_map(|id| self.by_id.get(id))
            .filter(|e| keep(e))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit);
        matched
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{ActorKind, CheckRequest, RiskLevel, Verdict};

    fn entry(id: &str, verdict: Verdict) -> AuditLogEntry {
        AuditLogEntry::record(
            id,
            CheckRequest::new(
                ActionType::WalletPayout,
                RiskLevel::P1,
                ActorKind::Human,
                "user-1",
            ),
            verdict,
            vec![],
            vec![],
        )
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut index = EntryIndex::default();
        index.insert(entry("adc-a", Verdict::Allow)).unwrap();
        let err = index.insert(entry("adc-a", Verdict::Allow)).unwrap_err();
        assert_eq!(err, "adc-a");
    }

    #[test]
    fn replay_last_record_wins() {
        let mut index = EntryIndex::default();
        let pending = entry("adc-b", Verdict::RequireHuman);
        let mut decided = pending.clone();
        decided.approval_status = ApprovalStatus::Approved;
        decided.approved_by = Some("founder-1".to_string());

        index.replay(pending);
        index.replay(decided);

        assert_eq!(index.len(), 1);
        let stored = index.get("adc-b").unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Approved);
    }

    #[test]
    fn apply_decision_is_conditional_on_pending() {
        let mut index = EntryIndex::default();
        index.insert(entry("adc-c", Verdict::RequireHuman)).unwrap();

        let updated = index
            .apply_decision(
                "adc-c",
                ApprovalStatus::Approved,
                "founder-1",
                None,
                Utc::now(),
            )
            .unwrap();
        assert_eq!(updated.approved_by.as_deref(), Some("founder-1"));

        // Second decision loses the compare-and-swap.
        let second = index.apply_decision(
            "adc-c",
            ApprovalStatus::Rejected,
            "founder-2",
            Some("late"),
            Utc::now(),
        );
        assert!(second.is_none());
    }

    #[test]
    fn apply_decision_ignores_auto_entries() {
        let mut index = EntryIndex::default();
        index.insert(entry("adc-d", Verdict::Allow)).unwrap();
        let result = index.apply_decision(
            "adc-d",
            ApprovalStatus::Approved,
            "founder-1",
            None,
            Utc::now(),
        );
        assert!(result.is_none());
    }
}
