//! Caller identity for guarded calls.

use vigil_core::ActorKind;

/// Who is invoking a protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub actor_id: String,
    pub kind: ActorKind,
}

impl CallerIdentity {
    /// A person, identified by user id.
    pub fn human(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            kind: ActorKind::Human,
        }
    }

    /// An automated process, identified by service or job name.
    pub fn service(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            kind: ActorKind::System,
        }
    }

    /// The anonymous fallback used when no caller identity is available.
    pub fn system() -> Self {
        Self::service("system")
    }
}
