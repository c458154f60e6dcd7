use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use super::domain::{
    Actor, Case, CaseId, OfferId, Role, ShowingBooking,
};
use super::error::MarketplaceError;
use super::scoring::{
    AgentProfileProvider, CommissionBand, OfferFilters, RankingQuery, SortDirection, SortKey,
};
use super::service::{
    CaseIntake, MarketplaceService, OfferSubmission, RegistrationRequest,
};
use super::store::{MarketplaceStore, NotificationSink};

/// Router builder exposing the marketplace operations over HTTP.
pub fn marketplace_router<S, N, P>(service: Arc<MarketplaceService<S, N, P>>) -> Router
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/cases",
            post(create_case_handler::<S, N, P>).get(list_cases_handler::<S, N, P>),
        )
        .route("/api/v1/cases/:case_id", get(case_handler::<S, N, P>))
        .route(
            "/api/v1/cases/:case_id/showing",
            post(book_showing_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/showing/completion",
            post(showing_completion_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/showing/cancellation",
            post(showing_cancellation_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/registrations",
            post(register_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/offers",
            post(submit_offer_handler::<S, N, P>).get(ranked_offers_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/selection",
            post(select_offer_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/withdrawal",
            post(withdraw_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/completion",
            post(complete_handler::<S, N, P>),
        )
        .route(
            "/api/v1/cases/:case_id/agent-status",
            get(agent_status_handler::<S, N, P>),
        )
        .with_state(service)
}

fn error_response(err: MarketplaceError) -> Response {
    let status = match &err {
        MarketplaceError::InvalidTransition { .. }
        | MarketplaceError::IllegalState { .. }
        | MarketplaceError::InvalidDate(_)
        | MarketplaceError::InvalidOffer(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MarketplaceError::DuplicateRegistration { .. }
        | MarketplaceError::DuplicateOffer { .. } => StatusCode::CONFLICT,
        MarketplaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        MarketplaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        MarketplaceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = axum::Json(json!({ "error": err.to_string() }));
    (status, body).into_response()
}

/// Compact case snapshot returned by mutation endpoints.
#[derive(Debug, Serialize)]
pub struct CaseView {
    pub case_id: CaseId,
    pub case_number: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showing: Option<ShowingBooking>,
    pub registration_count: usize,
    pub offer_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_offer_id: Option<OfferId>,
}

impl From<Case> for CaseView {
    fn from(case: Case) -> Self {
        Self {
            case_id: case.id,
            case_number: case.case_number,
            status: case.status.label(),
            showing: case.showing,
            registration_count: case.registration_ids.len(),
            offer_count: case.offer_ids.len(),
            selected_offer_id: case.selected_offer_id,
        }
    }
}

/// Actor identification for read endpoints, passed as query parameters.
#[derive(Debug, Deserialize)]
pub(crate) struct ActorQuery {
    pub(crate) actor_id: String,
    pub(crate) role: Role,
}

impl ActorQuery {
    fn actor(&self) -> Actor {
        Actor {
            id: self.actor_id.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCaseRequest {
    pub(crate) actor: Actor,
    #[serde(flatten)]
    pub(crate) intake: CaseIntake,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookShowingRequest {
    pub(crate) actor: Actor,
    pub(crate) date: NaiveDate,
    #[serde(deserialize_with = "deserialize_slot_time")]
    pub(crate) time: NaiveTime,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    /// Booking-time reference date; defaults to the server's local date.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorRequest {
    pub(crate) actor: Actor,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) actor: Actor,
    pub(crate) agency_name: String,
    pub(crate) agent_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitOfferRequest {
    pub(crate) actor: Actor,
    pub(crate) offer: OfferSubmission,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectOfferRequest {
    pub(crate) actor: Actor,
    pub(crate) offer_id: OfferId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankedOffersParams {
    pub(crate) actor_id: String,
    pub(crate) role: Role,
    #[serde(default)]
    pub(crate) sort_by: SortKey,
    #[serde(default)]
    pub(crate) direction: SortDirection,
    #[serde(default)]
    pub(crate) max_commission: Option<u64>,
    #[serde(default)]
    pub(crate) min_score: Option<u8>,
    #[serde(default)]
    pub(crate) commission_band: Option<CommissionBand>,
}

impl RankedOffersParams {
    fn actor(&self) -> Actor {
        Actor {
            id: self.actor_id.clone(),
            role: self.role,
        }
    }

    fn query(&self) -> RankingQuery {
        RankingQuery {
            sort_by: self.sort_by,
            direction: self.direction,
            filters: OfferFilters {
                max_commission: self.max_commission,
                min_score: self.min_score,
                commission_band: self.commission_band,
            },
        }
    }
}

/// Accepts `16:00` as well as `16:00:00`.
fn deserialize_slot_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
        .map_err(|err| serde::de::Error::custom(format!("invalid showing time '{raw}': {err}")))
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

pub(crate) async fn create_case_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    axum::Json(request): axum::Json<CreateCaseRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.create_case(&request.actor, request.intake, now()) {
        Ok(case) => (StatusCode::CREATED, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_cases_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Query(params): Query<ActorQuery>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.cases_for_seller(&params.actor()) {
        Ok(cases) => {
            let views: Vec<CaseView> = cases.into_iter().map(CaseView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn case_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    Query(params): Query<ActorQuery>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.case_for(&params.actor(), &CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn book_showing_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<BookShowingRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    let today = request
        .today
        .unwrap_or_else(|| Local::now().date_naive());
    match service.book_showing(
        &request.actor,
        &CaseId(case_id),
        request.date,
        request.time,
        request.notes,
        today,
        now(),
    ) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn showing_completion_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.mark_showing_completed(&request.actor, &CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn showing_cancellation_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.cancel_showing(&request.actor, &CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn register_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    let registration = RegistrationRequest {
        agency_name: request.agency_name,
        agent_name: request.agent_name,
    };
    match service.register_for_showing(&request.actor, &CaseId(case_id), registration, now()) {
        Ok(registration) => (StatusCode::CREATED, axum::Json(registration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_offer_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<SubmitOfferRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.submit_offer(&request.actor, &CaseId(case_id), request.offer, now()) {
        Ok(offer) => (StatusCode::CREATED, axum::Json(offer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn ranked_offers_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    Query(params): Query<RankedOffersParams>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.ranked_offers(&params.actor(), &CaseId(case_id), &params.query()) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn select_offer_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<SelectOfferRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.select_offer(&request.actor, &CaseId(case_id), &request.offer_id) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn withdraw_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.withdraw_case(&request.actor, &CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.complete_case(&request.actor, &CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseView::from(case))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn agent_status_handler<S, N, P>(
    State(service): State<Arc<MarketplaceService<S, N, P>>>,
    Path(case_id): Path<String>,
    Query(params): Query<ActorQuery>,
) -> Response
where
    S: MarketplaceStore + 'static,
    N: NotificationSink + 'static,
    P: AgentProfileProvider + 'static,
{
    match service.agent_case_status(&params.actor(), &CaseId(case_id)) {
        Ok(status) => (
            StatusCode::OK,
            axum::Json(json!({ "status": status.label() })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
