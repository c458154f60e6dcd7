//! Entity-store and notification-sink abstractions.
//!
//! The store is keyed per record kind. `compare_and_swap_case` is the one
//! concurrency primitive the whole crate relies on: every case mutation is a
//! fetch / guard / swap cycle on the case's version, which serializes
//! concurrent actors per case without any global lock. Registration and
//! offer records are written before the case swap and only become reachable
//! through a successful swap referencing their id; a record whose swap never
//! lands stays invisible and may be replaced by a later retry.

use super::domain::{
    AgentRegistration, Case, CaseId, Notification, Offer, OfferId,
};
use super::error::{NotifyError, StoreError};

pub trait MarketplaceStore: Send + Sync {
    /// Insert a new case. Fails with `Conflict` if the id is taken. The
    /// stored case starts at version 1.
    fn insert_case(&self, case: Case) -> Result<Case, StoreError>;

    fn fetch_case(&self, id: &CaseId) -> Result<Option<Case>, StoreError>;

    /// Replace a case if and only if the stored version equals
    /// `expected_version`; bumps the version on success. Fails with
    /// `VersionConflict` when another writer got there first.
    fn compare_and_swap_case(&self, expected_version: u64, case: Case) -> Result<Case, StoreError>;

    fn cases_for_seller(&self, seller_id: &str) -> Result<Vec<Case>, StoreError>;

    /// Insert or replace the registration keyed by its id. Only records
    /// referenced from a committed case are treated as live.
    fn insert_registration(&self, registration: AgentRegistration) -> Result<(), StoreError>;

    fn registrations_for_case(&self, case_id: &CaseId)
        -> Result<Vec<AgentRegistration>, StoreError>;

    /// Insert or replace the offer keyed by its id. Only records referenced
    /// from a committed case are treated as live.
    fn insert_offer(&self, offer: Offer) -> Result<(), StoreError>;

    fn fetch_offer(&self, id: &OfferId) -> Result<Option<Offer>, StoreError>;

    fn offers_for_case(&self, case_id: &CaseId) -> Result<Vec<Offer>, StoreError>;
}

/// Outbound notification boundary: fire-and-forget, at-least-once. The
/// service commits the state transition first and treats delivery failures
/// as log-and-continue.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}
