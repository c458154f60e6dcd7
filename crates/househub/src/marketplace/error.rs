use super::domain::{AgentId, CaseId, CaseStatus};

/// Typed failures surfaced by the lifecycle controller, coordinators, and
/// offer intake. Every rejected precondition names the condition that was not
/// met; callers present these to the acting user and never retry on their
/// own.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("cannot move case from {from} to {to}: {reason}")]
    InvalidTransition {
        from: CaseStatus,
        to: CaseStatus,
        reason: String,
    },
    #[error("cannot {action} while case is {status}")]
    IllegalState {
        status: CaseStatus,
        action: &'static str,
    },
    #[error("agent {agent_id:?} is already registered for the showing on case {case_id:?}")]
    DuplicateRegistration { case_id: CaseId, agent_id: AgentId },
    #[error("agent {agent_id:?} already submitted an offer on case {case_id:?}")]
    DuplicateOffer { case_id: CaseId, agent_id: AgentId },
    #[error("invalid showing date: {0}")]
    InvalidDate(String),
    #[error("invalid offer: {0}")]
    InvalidOffer(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{role} may not {action}")]
    Forbidden {
        role: &'static str,
        action: &'static str,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MarketplaceError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Error enumeration for entity-store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("case version conflict")]
    VersionConflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Notification dispatch error. Isolated and logged by the service; never
/// propagated to the caller of the triggering operation.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
