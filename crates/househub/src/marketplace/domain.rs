use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::ScoreBreakdown;

/// Identifier wrapper for a seller's sale case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Identifier wrapper for an agent (broker) account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// Identifier wrapper for a submitted offer.
///
/// Offer ids are derived from the `(case, agent)` pair, which is what makes
/// the one-offer-per-agent-per-case check atomic with the case write: the
/// candidate id either is or is not already referenced by the case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn for_submission(case_id: &CaseId, agent_id: &AgentId) -> Self {
        Self(format!("offer-{}-{}", case_id.0, agent_id.0))
    }
}

/// Identifier wrapper for a showing registration, derived like [`OfferId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

impl RegistrationId {
    pub fn for_agent(case_id: &CaseId, agent_id: &AgentId) -> Self {
        Self(format!("reg-{}-{}", case_id.0, agent_id.0))
    }
}

/// The acting identity passed explicitly into every operation.
///
/// There is deliberately no ambient "current user" state anywhere in the
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn seller(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Seller,
        }
    }

    pub fn agent(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Agent,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Seller,
    Agent,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monetary amount in whole DKK plus the formatted string shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub value: u64,
    pub display: String,
}

impl Money {
    pub fn dkk(value: u64) -> Self {
        Self {
            value,
            display: format_dkk(value),
        }
    }
}

/// Danish-style grouping: `4200000` becomes `4.200.000 kr.`.
pub fn format_dkk(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push_str(" kr.");
    grouped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Villa,
    Apartment,
    Townhouse,
    HolidayHome,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Villa => "Villa",
            Self::Apartment => "Apartment",
            Self::Townhouse => "Townhouse",
            Self::HolidayHome => "Holiday home",
        }
    }
}

/// Mandatory property facts collected during seller intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub address: String,
    pub municipality: String,
    pub property_type: PropertyType,
    pub size_m2: u32,
    pub build_year: u16,
    pub rooms: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleTimeframe {
    AsSoonAsPossible,
    WithinThreeMonths,
    WithinSixMonths,
    Flexible,
}

impl SaleTimeframe {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AsSoonAsPossible => "As soon as possible",
            Self::WithinThreeMonths => "Within three months",
            Self::WithinSixMonths => "Within six months",
            Self::Flexible => "Flexible",
        }
    }
}

/// Seller preferences captured at intake; they travel with the case so agents
/// can tailor their offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePreferences {
    pub timeframe: SaleTimeframe,
    pub priorities: Vec<String>,
    pub flexible_price: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_budget: Option<Money>,
}

/// Contact details released to the winning agent only after selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Seller-facing status of a case. Sole writer is the lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    Active,
    ShowingBooked,
    ShowingCompleted,
    OffersReceived,
    BrokerSelected,
    Completed,
    Withdrawn,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::ShowingBooked => "showing_booked",
            Self::ShowingCompleted => "showing_completed",
            Self::OffersReceived => "offers_received",
            Self::BrokerSelected => "broker_selected",
            Self::Completed => "completed",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The narrower agent-facing view of the same timeline. Always derived from
/// the canonical [`CaseStatus`] plus the agent's own registration/offer,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCaseStatus {
    Active,
    OfferSubmitted,
    Rejected,
    Archived,
}

impl AgentCaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OfferSubmitted => "offer_submitted",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowingStatus {
    Planned,
    Held,
    Cancelled,
}

impl ShowingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Held => "held",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The single scheduled viewing event for a case. Rescheduling replaces the
/// booking; there is never a second active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowingBooking {
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ShowingStatus,
    pub booked_at: DateTime<Utc>,
}

/// One seller's property-sale engagement tracked end-to-end.
///
/// The case owns the lists of registration and offer ids for its lifetime;
/// registrations and offers hold a back-reference but never own the case.
/// Cases are never deleted: withdrawal is a status transition so agents who
/// already interacted with the case keep an auditable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    /// Human-readable case number, `HH-<year>-<sequence>`. Assigned once at
    /// creation, never regenerated.
    pub case_number: String,
    pub seller_id: String,
    pub seller_contact: SellerContact,
    pub property: PropertyDetails,
    pub expected_price: Money,
    pub preferences: SalePreferences,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showing: Option<ShowingBooking>,
    pub registration_ids: Vec<RegistrationId>,
    pub offer_ids: Vec<OfferId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_offer_id: Option<OfferId>,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency version, bumped by every committed case write.
    pub version: u64,
}

impl Case {
    pub fn has_registration_for(&self, agent_id: &AgentId) -> bool {
        self.registration_ids
            .contains(&RegistrationId::for_agent(&self.id, agent_id))
    }

    pub fn has_offer_from(&self, agent_id: &AgentId) -> bool {
        self.offer_ids
            .contains(&OfferId::for_submission(&self.id, agent_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Rejected,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Rejected => "rejected",
        }
    }
}

/// An agent's commitment to attend a case's showing. Immutable once created
/// except for the status flip on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRegistration {
    pub id: RegistrationId,
    pub case_id: CaseId,
    pub agent_id: AgentId,
    pub agency_name: String,
    pub agent_name: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// A marketing activity line item inside an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingMethod {
    pub id: String,
    pub name: String,
    pub included: bool,
}

/// An agent's formal bid to handle the sale. Immutable after submission; an
/// agent who wants different terms negotiates through messages instead, so
/// the seller can trust the score at time of comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub case_id: CaseId,
    pub agent_id: AgentId,
    pub agency_name: String,
    pub agent_name: String,
    pub expected_price: Money,
    pub commission: Money,
    pub binding_period_months: u8,
    pub marketing_methods: Vec<MarketingMethod>,
    pub sales_strategy: String,
    pub submitted_at: DateTime<Utc>,
    /// The 0-100 HouseHub Score, fixed at submission time.
    pub score: u8,
    pub score_breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OfferWon,
    OfferLost,
    CaseWithdrawn,
    Message,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OfferWon => "offer_won",
            Self::OfferLost => "offer_lost",
            Self::CaseWithdrawn => "case_withdrawn",
            Self::Message => "message",
        }
    }
}

/// Fire-and-forget record of a state change directed at one recipient.
/// Append-only; the UI layer consumes these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient_id: String,
    pub case_id: CaseId,
    pub details: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dkk_formatting_groups_thousands() {
        assert_eq!(format_dkk(0), "0 kr.");
        assert_eq!(format_dkk(950), "950 kr.");
        assert_eq!(format_dkk(65_000), "65.000 kr.");
        assert_eq!(format_dkk(4_200_000), "4.200.000 kr.");
    }

    #[test]
    fn derived_ids_are_stable_per_pair() {
        let case = CaseId("case-000001".to_string());
        let agent = AgentId("agent-17".to_string());
        assert_eq!(
            OfferId::for_submission(&case, &agent),
            OfferId::for_submission(&case, &agent),
        );
        assert_ne!(
            OfferId::for_submission(&case, &agent).0,
            RegistrationId::for_agent(&case, &agent).0,
        );
    }
}
