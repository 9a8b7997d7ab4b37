//! # vigil-workflow
//!
//! The human side of the Vigil gateway.
//!
//! [`ApprovalWorkflow`] moves entries out of the founder review queue —
//! approve or reject, at most once per entry, with one-writer-wins semantics
//! riding on the store's conditional update. Approving an entry only flips
//! the gate; the original caller resubmits the action, it never re-runs here.
//!
//! [`QuerySurface`] is the read-only projection for operators: the pending
//! queue, single-entry lookup, per-actor history, the velocity count, and a
//! secret-free health summary. Nothing in it mutates state, and neither
//! component re-evaluates rules.

pub mod approval;
pub mod error;
pub mod query;

pub use approval::ApprovalWorkflow;
pub use error::WorkflowError;
pub use query::{HealthStatus, QuerySurface};
