//! Verdicts and the approval lifecycle.
//!
//! A [`Verdict`] is produced exactly once per evaluated request and never
//! changes. The [`ApprovalStatus`] is the mutable lifecycle field derived
//! from it: entries born `PENDING_FOUNDER` may transition exactly once to
//! `APPROVED` or `REJECTED`; every other status is terminal at birth.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The one-time output of rule evaluation for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The call may proceed automatically.
    Allow,
    /// The call must not proceed.
    Deny,
    /// The call is suspended until a human decides.
    RequireHuman,
}

impl Verdict {
    /// The initial approval status derived from this verdict.
    ///
    /// ALLOW and DENY need no human step; REQUIRE_HUMAN parks the entry in
    /// the founder review queue. This mapping is total and deterministic.
    pub fn initial_status(&self) -> ApprovalStatus {
        match self {
            Verdict::Allow | Verdict::Deny => ApprovalStatus::Auto,
            Verdict::RequireHuman => ApprovalStatus::PendingFounder,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allow => write!(f, "ALLOW"),
            Verdict::Deny => write!(f, "DENY"),
            Verdict::RequireHuman => write!(f, "REQUIRE_HUMAN"),
        }
    }
}

/// Lifecycle state of a persisted audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    /// Resolved automatically; no human step involved.
    Auto,
    /// Waiting in the founder review queue.
    PendingFounder,
    /// A reviewer approved the pending action.
    Approved,
    /// A reviewer rejected the pending action.
    Rejected,
}

impl ApprovalStatus {
    /// Whether any further transition is permitted from this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::PendingFounder)
    }

    /// Whether this status is a valid target for a reviewer decision.
    pub fn is_decision(&self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::Rejected)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Auto => write!(f, "AUTO"),
            ApprovalStatus::PendingFounder => write!(f, "PENDING_FOUNDER"),
            ApprovalStatus::Approved => write!(f, "APPROVED"),
            ApprovalStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}
