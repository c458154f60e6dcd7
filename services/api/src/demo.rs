use crate::infra::{InMemoryMarketplaceStore, RecordingNotificationSink, StaticAgentProfiles};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Utc, Weekday};
use clap::Args;
use std::sync::Arc;

use househub::error::AppError;
use househub::marketplace::{
    Actor, AgentId, AgentTrackRecord, CaseIntake, MarketingMethod, MarketplaceService,
    OfferSubmission, PropertyDetails, PropertyType, RankingQuery, RegistrationRequest,
    SalePreferences, SaleTimeframe, SellerContact,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reference date for showing scheduling (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Console walkthrough of a full case: intake, showing, two competing
/// offers, ranking, and broker selection.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let now = Utc::now();

    let store = Arc::new(InMemoryMarketplaceStore::default());
    let notifications = Arc::new(RecordingNotificationSink::default());
    let profiles = Arc::new(StaticAgentProfiles::default());
    profiles.set(
        AgentId("agent-1".to_string()),
        AgentTrackRecord {
            success_rate: 0.82,
            average_days_on_market: 38.0,
            years_local_experience: 12.0,
        },
    );
    profiles.set(
        AgentId("agent-2".to_string()),
        AgentTrackRecord {
            success_rate: 0.64,
            average_days_on_market: 52.0,
            years_local_experience: 4.0,
        },
    );
    let service = MarketplaceService::new(store, notifications.clone(), profiles);

    let seller = Actor::seller("seller-1");
    let agent_one = Actor::agent("agent-1");
    let agent_two = Actor::agent("agent-2");

    println!("HouseHub marketplace demo");

    let case = service.create_case(
        &seller,
        CaseIntake {
            property: PropertyDetails {
                address: "Solsortvej 12, 2720 Vanløse".to_string(),
                municipality: "København".to_string(),
                property_type: PropertyType::Villa,
                size_m2: 156,
                build_year: 1962,
                rooms: 6,
            },
            expected_price_value: 4_200_000,
            preferences: SalePreferences {
                timeframe: SaleTimeframe::WithinThreeMonths,
                priorities: vec!["highest price".to_string(), "fast sale".to_string()],
                flexible_price: true,
                marketing_budget: None,
            },
            seller_contact: SellerContact {
                name: "Mette Sørensen".to_string(),
                email: "mette@example.dk".to_string(),
                phone: "+45 20 12 34 56".to_string(),
            },
        },
        now,
    )?;
    println!(
        "- Case {} created at {} ({})",
        case.case_number,
        case.property.address,
        case.expected_price.display
    );

    let showing_date = next_weekday_on_or_after(today + Duration::days(10));
    let slot = NaiveTime::from_hms_opt(16, 0, 0).expect("valid showing time");
    let case_after_booking = service.book_showing(
        &seller,
        &case.id,
        showing_date,
        slot,
        Some("Entrance through the garden gate".to_string()),
        today,
        now,
    )?;
    println!(
        "- Showing booked for {showing_date} at {slot} -> status {}",
        case_after_booking.status.label()
    );

    for (actor, agency, name) in [
        (&agent_one, "Nordbo Mægler", "Jonas Krag"),
        (&agent_two, "Bolighjem", "Line Østergaard"),
    ] {
        let registration = service.register_for_showing(
            actor,
            &case.id,
            RegistrationRequest {
                agency_name: agency.to_string(),
                agent_name: name.to_string(),
            },
            now,
        )?;
        println!("- {} registered for the showing ({})", agency, registration.id.0);
    }

    let case_after_showing = service.mark_showing_completed(&seller, &case.id)?;
    println!(
        "- Showing held -> status {}",
        case_after_showing.status.label()
    );

    let offers = [
        (
            &agent_one,
            "Nordbo Mægler",
            "Jonas Krag",
            4_350_000u64,
            65_000u64,
            6u8,
            "Premium photo package and two open houses in the first month.",
        ),
        (
            &agent_two,
            "Bolighjem",
            "Line Østergaard",
            4_275_000u64,
            55_000u64,
            4u8,
            "Targeted buyer outreach from our waiting list.",
        ),
    ];
    for (actor, agency, name, price, commission, months, strategy) in offers {
        let offer = service.submit_offer(
            actor,
            &case.id,
            OfferSubmission {
                agency_name: agency.to_string(),
                agent_name: name.to_string(),
                expected_price_value: price,
                commission_value: commission,
                binding_period_months: months,
                marketing_methods: vec![MarketingMethod {
                    id: "boligsiden".to_string(),
                    name: "Boligsiden listing".to_string(),
                    included: true,
                }],
                sales_strategy: strategy.to_string(),
            },
            Utc::now(),
        )?;
        println!(
            "- Offer received: {} at {} commission (score {})",
            offer.expected_price.display, offer.commission.display, offer.score
        );
    }

    let page = service.ranked_offers(&seller, &case.id, &RankingQuery::default())?;
    println!(
        "\nRanked offers ({} of {} shown)",
        page.filtered_count, page.total_count
    );
    for view in &page.offers {
        println!(
            "- {} | score {} | {} | commission {} | bound {} months",
            view.display_name,
            view.score,
            view.expected_price.display,
            view.commission.display,
            view.binding_period_months
        );
        println!(
            "    commission {} + timeline {} + performance {} + local experience {}",
            view.score_breakdown.commission,
            view.score_breakdown.timeline,
            view.score_breakdown.performance,
            view.score_breakdown.local_experience
        );
    }

    let winner = page
        .offers
        .first()
        .map(|view| view.offer_id.clone())
        .ok_or_else(|| househub::marketplace::MarketplaceError::not_found("offer", "none"))?;
    let selected = service.select_offer(&seller, &case.id, &winner)?;
    println!(
        "\nSeller selected {} -> status {}",
        winner.0,
        selected.status.label()
    );

    let revealed = service.ranked_offers(&seller, &case.id, &RankingQuery::default())?;
    for view in &revealed.offers {
        let marker = if view.selected { "selected" } else { "not selected" };
        println!("- {} ({})", view.display_name, marker);
    }

    println!("\nNotifications dispatched");
    for notification in notifications.events() {
        println!(
            "- {} -> {} (case {})",
            notification.kind.label(),
            notification.recipient_id,
            notification.case_id.0
        );
    }

    for actor in [&agent_one, &agent_two] {
        let status = service.agent_case_status(actor, &case.id)?;
        println!("- {} sees the case as {}", actor.id, status.label());
    }

    Ok(())
}

fn next_weekday_on_or_after(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}
