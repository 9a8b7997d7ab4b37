//! # vigil-core
//!
//! Shared domain types for the Vigil double-check gateway.
//!
//! This crate defines:
//! - The classification axes for guarded calls ([`ActionType`], [`RiskLevel`],
//!   [`ActorKind`])
//! - The decision vocabulary ([`Verdict`]) and the approval lifecycle
//!   ([`ApprovalStatus`])
//! - The ephemeral request/result pair ([`CheckRequest`], [`CheckResult`])
//! - The persisted audit record ([`AuditLogEntry`])
//! - Correlation-id generation and gateway configuration
//!
//! The crates that orchestrate decisions (`vigil-engine`), persist them
//! (`vigil-store`), and expose them to reviewers (`vigil-workflow`) all build
//! on these types.

pub mod action;
pub mod approval;
pub mod config;
pub mod correlation;
pub mod entry;
pub mod request;

pub use action::{ActionType, ActorKind, RiskLevel};
pub use approval::{ApprovalStatus, Verdict};
pub use config::{ConfigError, GatewayConfig, ReviewConfig, StoreBackend, StoreConfig};
pub use correlation::new_correlation_id;
pub use entry::AuditLogEntry;
pub use request::{CheckRequest, CheckResult};
