use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    Actor, AgentCaseStatus, AgentId, AgentRegistration, Case, CaseId, CaseStatus, MarketingMethod,
    Money, Notification, NotificationKind, Offer, OfferId, PropertyDetails, RegistrationId,
    RegistrationStatus, Role, SalePreferences, SellerContact, ShowingBooking, ShowingStatus,
};
use super::error::{MarketplaceError, StoreError};
use super::lifecycle;
use super::scoring::{
    compute_breakdown, rank_offers, AgentProfileProvider, OfferTerms, RankingQuery,
    ScoreBreakdown, ScoringConfig,
};
use super::showing::validate_showing_slot;
use super::store::{MarketplaceStore, NotificationSink};

/// External collaborator producing human-readable case numbers. Called once
/// per case at creation; the result is never regenerated.
pub trait CaseNumberFormatter: Send + Sync {
    fn next_case_number(&self, year: i32) -> String;
}

/// Default formatter producing `HH-<year>-<sequence>`.
#[derive(Debug)]
pub struct SequentialCaseNumbers {
    next: AtomicU64,
}

impl Default for SequentialCaseNumbers {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl CaseNumberFormatter for SequentialCaseNumbers {
    fn next_case_number(&self, year: i32) -> String {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        format!("HH-{year}-{sequence:04}")
    }
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("case-{id:06}"))
}

/// Seller intake payload that backs the `draft -> active` transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseIntake {
    pub property: PropertyDetails,
    pub expected_price_value: u64,
    pub preferences: SalePreferences,
    pub seller_contact: SellerContact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub agency_name: String,
    pub agent_name: String,
}

/// Terms an agent submits against a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferSubmission {
    pub agency_name: String,
    pub agent_name: String,
    pub expected_price_value: u64,
    pub commission_value: u64,
    pub binding_period_months: u8,
    pub marketing_methods: Vec<MarketingMethod>,
    pub sales_strategy: String,
}

/// One entry of the seller's ranked offer list. Agent identity stays
/// anonymized ("Agent N" by order of submission) until the seller commits a
/// selection; this is presentation hygiene, not a security boundary.
#[derive(Debug, Clone, Serialize)]
pub struct RankedOfferView {
    pub offer_id: OfferId,
    pub display_name: String,
    pub anonymized: bool,
    pub selected: bool,
    pub expected_price: Money,
    pub commission: Money,
    pub binding_period_months: u8,
    pub marketing_methods: Vec<MarketingMethod>,
    pub sales_strategy: String,
    pub submitted_at: DateTime<Utc>,
    pub score: u8,
    pub score_breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedOfferPage {
    pub case_id: CaseId,
    pub case_number: String,
    pub total_count: usize,
    pub filtered_count: usize,
    pub offers: Vec<RankedOfferView>,
}

const MAX_SWAP_ATTEMPTS: u8 = 4;

/// Facade composing the entity store, notification sink, agent-profile
/// provider, and case-number formatter. Owns every case transition: state is
/// committed through the store's compare-and-swap before any notification
/// fan-out begins, and fan-out failures never roll the transition back.
pub struct MarketplaceService<S, N, P> {
    store: Arc<S>,
    notifications: Arc<N>,
    profiles: Arc<P>,
    case_numbers: Arc<dyn CaseNumberFormatter>,
    scoring: ScoringConfig,
}

impl<S, N, P> MarketplaceService<S, N, P>
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    pub fn new(store: Arc<S>, notifications: Arc<N>, profiles: Arc<P>) -> Self {
        Self::with_scoring(store, notifications, profiles, ScoringConfig::default())
    }

    pub fn with_scoring(
        store: Arc<S>,
        notifications: Arc<N>,
        profiles: Arc<P>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            store,
            notifications,
            profiles,
            case_numbers: Arc::new(SequentialCaseNumbers::default()),
            scoring,
        }
    }

    pub fn with_case_numbers(mut self, case_numbers: Arc<dyn CaseNumberFormatter>) -> Self {
        self.case_numbers = case_numbers;
        self
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Create a case from completed intake. Validation failures surface as
    /// the failed `draft -> active` transition naming the missing fields.
    pub fn create_case(
        &self,
        actor: &Actor,
        intake: CaseIntake,
        now: DateTime<Utc>,
    ) -> Result<Case, MarketplaceError> {
        require_role(actor, Role::Seller, "create a case")?;

        let mut missing = Vec::new();
        if intake.property.address.trim().is_empty() {
            missing.push("address");
        }
        if intake.property.municipality.trim().is_empty() {
            missing.push("municipality");
        }
        if intake.property.size_m2 == 0 {
            missing.push("size");
        }
        if intake.property.rooms == 0 {
            missing.push("rooms");
        }
        if intake.expected_price_value == 0 {
            missing.push("expected price");
        }
        if !missing.is_empty() {
            return Err(MarketplaceError::InvalidTransition {
                from: CaseStatus::Draft,
                to: CaseStatus::Active,
                reason: format!("intake incomplete: missing {}", missing.join(", ")),
            });
        }

        let case = Case {
            id: next_case_id(),
            case_number: self.case_numbers.next_case_number(now.year()),
            seller_id: actor.id.clone(),
            seller_contact: intake.seller_contact,
            property: intake.property,
            expected_price: Money::dkk(intake.expected_price_value),
            preferences: intake.preferences,
            status: CaseStatus::Active,
            showing: None,
            registration_ids: Vec::new(),
            offer_ids: Vec::new(),
            selected_offer_id: None,
            created_at: now,
            version: 1,
        };

        let stored = self.store.insert_case(case)?;
        info!(case = %stored.case_number, seller = %stored.seller_id, "case created");
        Ok(stored)
    }

    /// Book or reschedule the single showing for a case.
    pub fn book_showing(
        &self,
        actor: &Actor,
        case_id: &CaseId,
        date: NaiveDate,
        time: NaiveTime,
        notes: Option<String>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Case, MarketplaceError> {
        let (case, _) = self.update_case(case_id, |case| {
            require_case_owner(case, actor, "book a showing")?;
            if !matches!(
                case.status,
                CaseStatus::Active | CaseStatus::ShowingBooked
            ) {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "book a showing",
                });
            }
            validate_showing_slot(today, date, time)?;

            case.showing = Some(ShowingBooking {
                date,
                time,
                notes: notes.clone(),
                status: ShowingStatus::Planned,
                booked_at: now,
            });
            if case.status == CaseStatus::Active {
                lifecycle::advance(case, CaseStatus::ShowingBooked)?;
            }
            Ok(())
        })?;

        info!(case = %case.case_number, %date, "showing booked");
        Ok(case)
    }

    /// Seller-only confirmation that the showing was held. Irreversible;
    /// unlocks offer intake.
    pub fn mark_showing_completed(
        &self,
        actor: &Actor,
        case_id: &CaseId,
    ) -> Result<Case, MarketplaceError> {
        let (case, _) = self.update_case(case_id, |case| {
            require_case_owner(case, actor, "confirm the showing was held")?;
            if case.status != CaseStatus::ShowingBooked {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "confirm the showing was held",
                });
            }
            match case.showing.as_mut() {
                Some(booking) if booking.status == ShowingStatus::Planned => {
                    booking.status = ShowingStatus::Held;
                }
                _ => {
                    return Err(MarketplaceError::IllegalState {
                        status: case.status,
                        action: "confirm a cancelled or missing showing",
                    })
                }
            }
            lifecycle::advance(case, CaseStatus::ShowingCompleted)
        })?;

        info!(case = %case.case_number, "showing completed");
        Ok(case)
    }

    /// Cancel the planned showing. The case status deliberately stays
    /// advanced rather than reverting to `active`, so agents who already
    /// registered are not confused by a case that appears to rewind.
    pub fn cancel_showing(
        &self,
        actor: &Actor,
        case_id: &CaseId,
    ) -> Result<Case, MarketplaceError> {
        let (case, _) = self.update_case(case_id, |case| {
            require_case_owner(case, actor, "cancel the showing")?;
            match case.showing.as_mut() {
                Some(booking) if booking.status == ShowingStatus::Planned => {
                    booking.status = ShowingStatus::Cancelled;
                    Ok(())
                }
                _ => Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "cancel a showing that is not planned",
                }),
            }
        })?;

        info!(case = %case.case_number, "showing cancelled");
        Ok(case)
    }

    /// Register an agent for the case's planned showing. The record is
    /// written first and only becomes reachable once the case swap commits
    /// the reference to its id; a failed write leaves the case untouched.
    pub fn register_for_showing(
        &self,
        actor: &Actor,
        case_id: &CaseId,
        request: RegistrationRequest,
        now: DateTime<Utc>,
    ) -> Result<AgentRegistration, MarketplaceError> {
        require_role(actor, Role::Agent, "register for a showing")?;
        let agent_id = AgentId(actor.id.clone());

        // The replace below must never touch a record the case references.
        let snapshot = self.load_case(case_id)?;
        if snapshot.has_registration_for(&agent_id) {
            return Err(MarketplaceError::DuplicateRegistration {
                case_id: snapshot.id,
                agent_id,
            });
        }

        let registration = AgentRegistration {
            id: RegistrationId::for_agent(case_id, &agent_id),
            case_id: case_id.clone(),
            agent_id: agent_id.clone(),
            agency_name: request.agency_name,
            agent_name: request.agent_name,
            status: RegistrationStatus::Registered,
            registered_at: now,
        };
        self.store.insert_registration(registration.clone())?;

        let (case, _) = self.update_case(case_id, |case| {
            let booking_planned = case
                .showing
                .as_ref()
                .is_some_and(|booking| booking.status == ShowingStatus::Planned);
            if case.status != CaseStatus::ShowingBooked || !booking_planned {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "register for a showing",
                });
            }
            if case.has_registration_for(&agent_id) {
                return Err(MarketplaceError::DuplicateRegistration {
                    case_id: case.id.clone(),
                    agent_id: agent_id.clone(),
                });
            }
            case.registration_ids.push(registration.id.clone());
            Ok(())
        })?;

        info!(case = %case.case_number, agent = %registration.agent_id.0, "agent registered for showing");
        Ok(registration)
    }

    /// Record an agent's offer. The record is written first; the case swap
    /// that references it flips a `showing_completed` case to
    /// `offers_received`, so a failed write leaves the case untouched and
    /// the agent free to retry.
    pub fn submit_offer(
        &self,
        actor: &Actor,
        case_id: &CaseId,
        submission: OfferSubmission,
        now: DateTime<Utc>,
    ) -> Result<Offer, MarketplaceError> {
        require_role(actor, Role::Agent, "submit an offer")?;
        let agent_id = AgentId(actor.id.clone());

        if submission.expected_price_value == 0 {
            return Err(MarketplaceError::InvalidOffer(
                "expected price must be positive".to_string(),
            ));
        }
        if submission.commission_value >= submission.expected_price_value {
            return Err(MarketplaceError::InvalidOffer(
                "commission must be below the expected price".to_string(),
            ));
        }
        if submission.binding_period_months == 0 {
            return Err(MarketplaceError::InvalidOffer(
                "binding period must be at least one month".to_string(),
            ));
        }

        let record = self
            .profiles
            .track_record(&agent_id)
            .unwrap_or_default();
        let breakdown = compute_breakdown(
            OfferTerms {
                price_value: submission.expected_price_value,
                commission_value: submission.commission_value,
                binding_period_months: submission.binding_period_months,
            },
            &record,
            &self.scoring,
        );

        let snapshot = self.load_case(case_id)?;
        if snapshot.has_offer_from(&agent_id) {
            return Err(MarketplaceError::DuplicateOffer {
                case_id: snapshot.id,
                agent_id,
            });
        }

        let offer = Offer {
            id: OfferId::for_submission(case_id, &agent_id),
            case_id: case_id.clone(),
            agent_id: agent_id.clone(),
            agency_name: submission.agency_name,
            agent_name: submission.agent_name,
            expected_price: Money::dkk(submission.expected_price_value),
            commission: Money::dkk(submission.commission_value),
            binding_period_months: submission.binding_period_months,
            marketing_methods: submission.marketing_methods,
            sales_strategy: submission.sales_strategy,
            submitted_at: now,
            score: breakdown.total(),
            score_breakdown: breakdown,
        };
        self.store.insert_offer(offer.clone())?;

        let (case, _) = self.update_case(case_id, |case| {
            if !matches!(
                case.status,
                CaseStatus::ShowingCompleted | CaseStatus::OffersReceived
            ) {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "submit an offer",
                });
            }
            if case.has_offer_from(&agent_id) {
                return Err(MarketplaceError::DuplicateOffer {
                    case_id: case.id.clone(),
                    agent_id: agent_id.clone(),
                });
            }
            case.offer_ids.push(offer.id.clone());
            if case.status == CaseStatus::ShowingCompleted {
                lifecycle::advance(case, CaseStatus::OffersReceived)?;
            }
            Ok(())
        })?;
        info!(
            case = %case.case_number,
            agent = %offer.agent_id.0,
            score = offer.score,
            "offer submitted"
        );
        Ok(offer)
    }

    /// The seller's ordered, filtered offer list. Pure read over a store
    /// snapshot; no locking.
    pub fn ranked_offers(
        &self,
        actor: &Actor,
        case_id: &CaseId,
        query: &RankingQuery,
    ) -> Result<RankedOfferPage, MarketplaceError> {
        let case = self.load_case(case_id)?;
        require_case_reader(&case, actor, "review offers")?;

        let offers = self.committed_offers(&case)?;

        // Aliases follow submission order so "Agent 1" is stable across
        // re-sorts and filters.
        let mut by_submission: Vec<&Offer> = offers.iter().collect();
        by_submission.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let aliases: BTreeMap<OfferId, String> = by_submission
            .iter()
            .enumerate()
            .map(|(index, offer)| (offer.id.clone(), format!("Agent {}", index + 1)))
            .collect();

        let identity_released = matches!(
            case.status,
            CaseStatus::BrokerSelected | CaseStatus::Completed
        );
        let ranked = rank_offers(&offers, query);

        let views = ranked
            .offers
            .into_iter()
            .map(|offer| {
                let selected = case.selected_offer_id.as_ref() == Some(&offer.id);
                let reveal = identity_released && selected;
                let display_name = if reveal {
                    format!("{} ({})", offer.agent_name, offer.agency_name)
                } else {
                    aliases
                        .get(&offer.id)
                        .cloned()
                        .unwrap_or_else(|| "Agent".to_string())
                };
                RankedOfferView {
                    offer_id: offer.id,
                    display_name,
                    anonymized: !reveal,
                    selected,
                    expected_price: offer.expected_price,
                    commission: offer.commission,
                    binding_period_months: offer.binding_period_months,
                    marketing_methods: offer.marketing_methods,
                    sales_strategy: offer.sales_strategy,
                    submitted_at: offer.submitted_at,
                    score: offer.score,
                    score_breakdown: offer.score_breakdown,
                }
            })
            .collect();

        Ok(RankedOfferPage {
            case_id: case.id,
            case_number: case.case_number,
            total_count: ranked.total_count,
            filtered_count: ranked.filtered_count,
            offers: views,
        })
    }

    /// Finalize the seller's selection of exactly one offer. The committed
    /// transition is followed by a best-effort win/loss fan-out.
    pub fn select_offer(
        &self,
        actor: &Actor,
        case_id: &CaseId,
        offer_id: &OfferId,
    ) -> Result<Case, MarketplaceError> {
        let (case, _) = self.update_case(case_id, |case| {
            require_case_owner(case, actor, "select a broker")?;
            if case.status != CaseStatus::OffersReceived {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "select a broker",
                });
            }
            if !case.offer_ids.contains(offer_id) {
                return Err(MarketplaceError::not_found("offer", offer_id.0.clone()));
            }
            case.selected_offer_id = Some(offer_id.clone());
            lifecycle::advance(case, CaseStatus::BrokerSelected)
        })?;

        info!(case = %case.case_number, offer = %offer_id.0, "broker selected");

        // State is durably committed; everything below is best-effort.
        let offers = self.committed_offers(&case)?;
        for offer in &offers {
            if &offer.id == offer_id {
                let mut details = BTreeMap::new();
                details.insert("case_number".to_string(), case.case_number.clone());
                details.insert("seller_name".to_string(), case.seller_contact.name.clone());
                details.insert(
                    "seller_email".to_string(),
                    case.seller_contact.email.clone(),
                );
                details.insert(
                    "seller_phone".to_string(),
                    case.seller_contact.phone.clone(),
                );
                self.notify_best_effort(Notification {
                    kind: NotificationKind::OfferWon,
                    recipient_id: offer.agent_id.0.clone(),
                    case_id: case.id.clone(),
                    details,
                });
            } else {
                let mut details = BTreeMap::new();
                details.insert("case_number".to_string(), case.case_number.clone());
                self.notify_best_effort(Notification {
                    kind: NotificationKind::OfferLost,
                    recipient_id: offer.agent_id.0.clone(),
                    case_id: case.id.clone(),
                    details,
                });
            }
        }

        Ok(case)
    }

    /// Seller-initiated withdrawal. Irreversible; notifies every agent who
    /// registered or made an offer.
    pub fn withdraw_case(&self, actor: &Actor, case_id: &CaseId) -> Result<Case, MarketplaceError> {
        let (case, _) = self.update_case(case_id, |case| {
            require_case_owner(case, actor, "withdraw the case")?;
            if !case.status.permits(CaseStatus::Withdrawn) {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "withdraw the case",
                });
            }
            lifecycle::advance(case, CaseStatus::Withdrawn)
        })?;

        info!(case = %case.case_number, "case withdrawn");

        let mut recipients: BTreeSet<String> = BTreeSet::new();
        for registration in self.committed_registrations(&case)? {
            recipients.insert(registration.agent_id.0);
        }
        for offer in self.committed_offers(&case)? {
            recipients.insert(offer.agent_id.0);
        }
        for recipient_id in recipients {
            let mut details = BTreeMap::new();
            details.insert("case_number".to_string(), case.case_number.clone());
            self.notify_best_effort(Notification {
                kind: NotificationKind::CaseWithdrawn,
                recipient_id,
                case_id: case.id.clone(),
                details,
            });
        }

        Ok(case)
    }

    /// Administrative closing once the real-world sale concludes.
    pub fn complete_case(&self, actor: &Actor, case_id: &CaseId) -> Result<Case, MarketplaceError> {
        require_role(actor, Role::Admin, "close a case")?;
        let (case, _) = self.update_case(case_id, |case| {
            if case.status != CaseStatus::BrokerSelected {
                return Err(MarketplaceError::IllegalState {
                    status: case.status,
                    action: "close a case",
                });
            }
            lifecycle::advance(case, CaseStatus::Completed)
        })?;

        info!(case = %case.case_number, "case completed");
        Ok(case)
    }

    pub fn case_for(&self, actor: &Actor, case_id: &CaseId) -> Result<Case, MarketplaceError> {
        let case = self.load_case(case_id)?;
        require_case_reader(&case, actor, "view the case")?;
        Ok(case)
    }

    pub fn cases_for_seller(&self, actor: &Actor) -> Result<Vec<Case>, MarketplaceError> {
        require_role(actor, Role::Seller, "list cases")?;
        Ok(self.store.cases_for_seller(&actor.id)?)
    }

    /// The agent-facing status for the acting agent, derived on demand.
    pub fn agent_case_status(
        &self,
        actor: &Actor,
        case_id: &CaseId,
    ) -> Result<AgentCaseStatus, MarketplaceError> {
        require_role(actor, Role::Agent, "view the case")?;
        let case = self.load_case(case_id)?;
        let agent_id = AgentId(actor.id.clone());

        let registrations = self.committed_registrations(&case)?;
        let registration = registrations
            .iter()
            .find(|registration| registration.agent_id == agent_id);
        let own_offer_id = OfferId::for_submission(&case.id, &agent_id);
        let own_offer = case
            .offer_ids
            .contains(&own_offer_id)
            .then_some(&own_offer_id);

        Ok(lifecycle::agent_view(&case, registration, own_offer))
    }

    fn load_case(&self, case_id: &CaseId) -> Result<Case, MarketplaceError> {
        self.store
            .fetch_case(case_id)?
            .ok_or_else(|| MarketplaceError::not_found("case", case_id.0.clone()))
    }

    /// Fetch / guard / swap cycle with bounded retries. Guards run against a
    /// fresh snapshot on every attempt, so a competing writer turns into the
    /// appropriate domain error rather than a lost update.
    fn update_case<T>(
        &self,
        case_id: &CaseId,
        apply: impl Fn(&mut Case) -> Result<T, MarketplaceError>,
    ) -> Result<(Case, T), MarketplaceError> {
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let mut case = self.load_case(case_id)?;
            let expected = case.version;
            let out = apply(&mut case)?;
            match self.store.compare_and_swap_case(expected, case) {
                Ok(saved) => return Ok((saved, out)),
                Err(StoreError::VersionConflict) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(StoreError::VersionConflict.into())
    }

    /// Offer records the case actually references; unreferenced records from
    /// interrupted writes are invisible.
    fn committed_offers(&self, case: &Case) -> Result<Vec<Offer>, MarketplaceError> {
        let mut offers = self.store.offers_for_case(&case.id)?;
        offers.retain(|offer| case.offer_ids.contains(&offer.id));
        Ok(offers)
    }

    fn committed_registrations(
        &self,
        case: &Case,
    ) -> Result<Vec<AgentRegistration>, MarketplaceError> {
        let mut registrations = self.store.registrations_for_case(&case.id)?;
        registrations.retain(|registration| case.registration_ids.contains(&registration.id));
        Ok(registrations)
    }

    fn notify_best_effort(&self, notification: Notification) {
        let kind = notification.kind;
        let recipient = notification.recipient_id.clone();
        if let Err(err) = self.notifications.notify(notification) {
            warn!(
                error = %err,
                kind = kind.label(),
                recipient = %recipient,
                "notification delivery failed; state transition already committed"
            );
        }
    }
}

fn require_role(actor: &Actor, role: Role, action: &'static str) -> Result<(), MarketplaceError> {
    if actor.role == role {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden {
            role: actor.role.label(),
            action,
        })
    }
}

fn require_case_owner(
    case: &Case,
    actor: &Actor,
    action: &'static str,
) -> Result<(), MarketplaceError> {
    require_role(actor, Role::Seller, action)?;
    if case.seller_id == actor.id {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden {
            role: "another seller",
            action,
        })
    }
}

fn require_case_reader(
    case: &Case,
    actor: &Actor,
    action: &'static str,
) -> Result<(), MarketplaceError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Seller if case.seller_id == actor.id => Ok(()),
        _ => Err(MarketplaceError::Forbidden {
            role: actor.role.label(),
            action,
        }),
    }
}
