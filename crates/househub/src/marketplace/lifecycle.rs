//! The case lifecycle state machine: which edges exist, how a case advances
//! along them, and how the agent-facing view derives from the canonical
//! status.

use super::domain::{
    AgentCaseStatus, AgentRegistration, Case, CaseStatus, OfferId, RegistrationStatus,
};
use super::error::MarketplaceError;

impl CaseStatus {
    /// Directed transition edges of the case state machine. `Withdrawn` is
    /// reachable from every state before a broker selection; selection and
    /// withdrawal are mutually exclusive. Everything else moves along the
    /// single forward chain.
    pub fn permits(self, to: CaseStatus) -> bool {
        if to == CaseStatus::Withdrawn {
            return !matches!(
                self,
                CaseStatus::BrokerSelected | CaseStatus::Completed | CaseStatus::Withdrawn
            );
        }

        matches!(
            (self, to),
            (CaseStatus::Draft, CaseStatus::Active)
                | (CaseStatus::Active, CaseStatus::ShowingBooked)
                | (CaseStatus::ShowingBooked, CaseStatus::ShowingCompleted)
                | (CaseStatus::ShowingCompleted, CaseStatus::OffersReceived)
                | (CaseStatus::OffersReceived, CaseStatus::BrokerSelected)
                | (CaseStatus::BrokerSelected, CaseStatus::Completed)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, CaseStatus::Completed | CaseStatus::Withdrawn)
    }
}

/// Move a case along a permitted edge, or fail with `InvalidTransition`
/// naming both states. The service layer is the only caller, which keeps the
/// controller the sole writer of `Case.status`.
pub fn advance(case: &mut Case, to: CaseStatus) -> Result<(), MarketplaceError> {
    if !case.status.permits(to) {
        return Err(MarketplaceError::InvalidTransition {
            from: case.status,
            to,
            reason: format!("no edge from {} to {}", case.status, to),
        });
    }

    case.status = to;
    Ok(())
}

/// Derive the agent-facing status for one agent.
///
/// A rejected registration dominates, as does losing a decided selection with
/// an offer on the table. Otherwise a terminal or decided case is archived
/// for everyone who took part, and an own offer shows as submitted.
pub fn agent_view(
    case: &Case,
    registration: Option<&AgentRegistration>,
    own_offer: Option<&OfferId>,
) -> AgentCaseStatus {
    if registration.map(|r| r.status) == Some(RegistrationStatus::Rejected) {
        return AgentCaseStatus::Rejected;
    }

    if let (Some(selected), Some(own)) = (case.selected_offer_id.as_ref(), own_offer) {
        if selected != own {
            return AgentCaseStatus::Rejected;
        }
    }

    match case.status {
        CaseStatus::BrokerSelected | CaseStatus::Completed | CaseStatus::Withdrawn => {
            AgentCaseStatus::Archived
        }
        _ if own_offer.is_some() => AgentCaseStatus::OfferSubmitted,
        _ => AgentCaseStatus::Active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::marketplace::domain::{
        AgentId, CaseId, Money, PropertyDetails, PropertyType, SalePreferences, SaleTimeframe,
        SellerContact,
    };

    fn case_with_status(status: CaseStatus) -> Case {
        Case {
            id: CaseId("case-000001".to_string()),
            case_number: "HH-2026-0001".to_string(),
            seller_id: "seller-1".to_string(),
            seller_contact: SellerContact {
                name: "Mette Holm".to_string(),
                email: "mette@example.dk".to_string(),
                phone: "+45 20 11 22 33".to_string(),
            },
            property: PropertyDetails {
                address: "Solvej 12, 8000 Aarhus C".to_string(),
                municipality: "Aarhus".to_string(),
                property_type: PropertyType::Villa,
                size_m2: 148,
                build_year: 1972,
                rooms: 5,
            },
            expected_price: Money::dkk(4_200_000),
            preferences: SalePreferences {
                timeframe: SaleTimeframe::WithinThreeMonths,
                priorities: vec!["highest price".to_string()],
                flexible_price: true,
                marketing_budget: None,
            },
            status,
            showing: None,
            registration_ids: Vec::new(),
            offer_ids: Vec::new(),
            selected_offer_id: None,
            created_at: Utc::now(),
            version: 1,
        }
    }

    const FORWARD_CHAIN: [CaseStatus; 7] = [
        CaseStatus::Draft,
        CaseStatus::Active,
        CaseStatus::ShowingBooked,
        CaseStatus::ShowingCompleted,
        CaseStatus::OffersReceived,
        CaseStatus::BrokerSelected,
        CaseStatus::Completed,
    ];

    #[test]
    fn forward_chain_edges_are_permitted() {
        for pair in FORWARD_CHAIN.windows(2) {
            assert!(pair[0].permits(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        for (i, from) in FORWARD_CHAIN.iter().enumerate() {
            for to in FORWARD_CHAIN.iter().skip(i + 2) {
                assert!(!from.permits(*to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn moving_backwards_is_rejected() {
        for (i, from) in FORWARD_CHAIN.iter().enumerate() {
            for to in FORWARD_CHAIN.iter().take(i) {
                assert!(!from.permits(*to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn withdrawal_reachable_until_a_broker_is_selected() {
        for status in FORWARD_CHAIN {
            let expected = !matches!(
                status,
                CaseStatus::BrokerSelected | CaseStatus::Completed
            );
            assert_eq!(status.permits(CaseStatus::Withdrawn), expected, "{status}");
        }
        assert!(!CaseStatus::Withdrawn.permits(CaseStatus::Withdrawn));
    }

    #[test]
    fn advance_rejects_illegal_edge_with_both_states() {
        let mut case = case_with_status(CaseStatus::Active);
        match advance(&mut case, CaseStatus::OffersReceived) {
            Err(MarketplaceError::InvalidTransition { from, to, .. }) => {
                assert_eq!(from, CaseStatus::Active);
                assert_eq!(to, CaseStatus::OffersReceived);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
        assert_eq!(case.status, CaseStatus::Active);
    }

    #[test]
    fn agent_view_tracks_offer_and_terminal_states() {
        let mut case = case_with_status(CaseStatus::ShowingCompleted);
        let own_offer = OfferId::for_submission(&case.id, &AgentId("agent-9".to_string()));
        assert_eq!(agent_view(&case, None, None), AgentCaseStatus::Active);
        assert_eq!(
            agent_view(&case, None, Some(&own_offer)),
            AgentCaseStatus::OfferSubmitted
        );

        case.status = CaseStatus::BrokerSelected;
        case.selected_offer_id = Some(own_offer.clone());
        assert_eq!(
            agent_view(&case, None, Some(&own_offer)),
            AgentCaseStatus::Archived
        );
        case.status = CaseStatus::Withdrawn;
        case.selected_offer_id = None;
        assert_eq!(agent_view(&case, None, None), AgentCaseStatus::Archived);
    }

    #[test]
    fn losing_offer_shows_as_rejected_after_selection() {
        let mut case = case_with_status(CaseStatus::BrokerSelected);
        let winning = OfferId::for_submission(&case.id, &AgentId("agent-1".to_string()));
        let losing = OfferId::for_submission(&case.id, &AgentId("agent-2".to_string()));
        case.selected_offer_id = Some(winning);
        assert_eq!(
            agent_view(&case, None, Some(&losing)),
            AgentCaseStatus::Rejected
        );
    }

    #[test]
    fn rejected_registration_dominates_agent_view() {
        let case = case_with_status(CaseStatus::ShowingBooked);
        let registration = AgentRegistration {
            id: crate::marketplace::domain::RegistrationId::for_agent(
                &case.id,
                &AgentId("agent-9".to_string()),
            ),
            case_id: case.id.clone(),
            agent_id: AgentId("agent-9".to_string()),
            agency_name: "Bolig & Co".to_string(),
            agent_name: "Jens Friis".to_string(),
            status: RegistrationStatus::Rejected,
            registered_at: Utc::now(),
        };
        assert_eq!(
            agent_view(&case, Some(&registration), None),
            AgentCaseStatus::Rejected
        );
    }
}
