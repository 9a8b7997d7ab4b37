//! Classification axes for guarded calls.
//!
//! Every call that reaches the gateway is tagged with an action type and a
//! risk level. The two axes are independent: any action type may be submitted
//! at any risk level by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of sensitive operations the gateway recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Money leaving a wallet.
    WalletPayout,
    /// Money returned to a customer.
    WalletRefund,
    /// Structural database change.
    SchemaMigration,
    /// Bulk rewrite of existing records.
    DataBackfill,
    /// Granting or widening privileged access.
    RoleGrant,
    /// Suspending or reinstating an account.
    AccountSuspension,
}

impl ActionType {
    /// All known action types, in declaration order.
    pub const ALL: [ActionType; 6] = [
        ActionType::WalletPayout,
        ActionType::WalletRefund,
        ActionType::SchemaMigration,
        ActionType::DataBackfill,
        ActionType::RoleGrant,
        ActionType::AccountSuspension,
    ];

    /// The wire name, e.g. `WALLET_PAYOUT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::WalletPayout => "WALLET_PAYOUT",
            ActionType::WalletRefund => "WALLET_REFUND",
            ActionType::SchemaMigration => "SCHEMA_MIGRATION",
            ActionType::DataBackfill => "DATA_BACKFILL",
            ActionType::RoleGrant => "ROLE_GRANT",
            ActionType::AccountSuspension => "ACCOUNT_SUSPENSION",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action type '{}'", s))
    }
}

/// Risk tag supplied by the caller alongside the action type.
///
/// `P0` is the highest severity. The level does not decide the verdict by
/// itself; it is an input to whatever rule set the evaluator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    P0,
    P1,
    P2,
}

impl RiskLevel {
    /// Numeric severity rank; higher means more severe.
    pub fn severity(&self) -> u8 {
        match self {
            RiskLevel::P0 => 2,
            RiskLevel::P1 => 1,
            RiskLevel::P2 => 0,
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::P0 => write!(f, "P0"),
            RiskLevel::P1 => write!(f, "P1"),
            RiskLevel::P2 => write!(f, "P2"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0" | "p0" => Ok(RiskLevel::P0),
            "P1" | "p1" => Ok(RiskLevel::P1),
            "P2" | "p2" => Ok(RiskLevel::P2),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

/// Who is acting: a person or an automated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Human,
    System,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::Human => write!(f, "human"),
            ActorKind::System => write!(f, "system"),
        }
    }
}
