use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use househub::marketplace::{
    AgentId, AgentProfileProvider, AgentRegistration, AgentTrackRecord, Case, CaseId,
    MarketplaceStore, Notification, NotificationSink, Offer, OfferId,
};
use househub::marketplace::{NotifyError, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory store with per-case optimistic versioning.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMarketplaceStore {
    cases: Arc<Mutex<HashMap<CaseId, Case>>>,
    registrations: Arc<Mutex<Vec<AgentRegistration>>>,
    offers: Arc<Mutex<HashMap<OfferId, Offer>>>,
}

impl MarketplaceStore for InMemoryMarketplaceStore {
    fn insert_case(&self, case: Case) -> Result<Case, StoreError> {
        let mut guard = self.cases.lock().expect("case mutex poisoned");
        if guard.contains_key(&case.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn fetch_case(&self, id: &CaseId) -> Result<Option<Case>, StoreError> {
        let guard = self.cases.lock().expect("case mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn compare_and_swap_case(
        &self,
        expected_version: u64,
        mut case: Case,
    ) -> Result<Case, StoreError> {
        let mut guard = self.cases.lock().expect("case mutex poisoned");
        let stored = guard.get(&case.id).ok_or(StoreError::NotFound)?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict);
        }
        case.version = expected_version + 1;
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn cases_for_seller(&self, seller_id: &str) -> Result<Vec<Case>, StoreError> {
        let guard = self.cases.lock().expect("case mutex poisoned");
        let mut cases: Vec<Case> = guard
            .values()
            .filter(|case| case.seller_id == seller_id)
            .cloned()
            .collect();
        cases.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(cases)
    }

    fn insert_registration(&self, registration: AgentRegistration) -> Result<(), StoreError> {
        let mut guard = self
            .registrations
            .lock()
            .expect("registration mutex poisoned");
        guard.retain(|existing| existing.id != registration.id);
        guard.push(registration);
        Ok(())
    }

    fn registrations_for_case(
        &self,
        case_id: &CaseId,
    ) -> Result<Vec<AgentRegistration>, StoreError> {
        let guard = self
            .registrations
            .lock()
            .expect("registration mutex poisoned");
        Ok(guard
            .iter()
            .filter(|registration| &registration.case_id == case_id)
            .cloned()
            .collect())
    }

    fn insert_offer(&self, offer: Offer) -> Result<(), StoreError> {
        let mut guard = self.offers.lock().expect("offer mutex poisoned");
        guard.insert(offer.id.clone(), offer);
        Ok(())
    }

    fn fetch_offer(&self, id: &OfferId) -> Result<Option<Offer>, StoreError> {
        let guard = self.offers.lock().expect("offer mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn offers_for_case(&self, case_id: &CaseId) -> Result<Vec<Offer>, StoreError> {
        let guard = self.offers.lock().expect("offer mutex poisoned");
        Ok(guard
            .values()
            .filter(|offer| &offer.case_id == case_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct RecordingNotificationSink {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl RecordingNotificationSink {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Fixed agent track records, seeded at startup. Agents without a profile
/// fall back to the neutral record inside the scoring engine.
#[derive(Default, Clone)]
pub(crate) struct StaticAgentProfiles {
    records: Arc<Mutex<HashMap<AgentId, AgentTrackRecord>>>,
}

impl StaticAgentProfiles {
    pub(crate) fn set(&self, agent_id: AgentId, record: AgentTrackRecord) {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(agent_id, record);
    }
}

impl AgentProfileProvider for StaticAgentProfiles {
    fn track_record(&self, agent_id: &AgentId) -> Option<AgentTrackRecord> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        guard.get(agent_id).copied()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
