//! Marketplace core: case lifecycle, showings, offer scoring and ranking.

pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod router;
pub mod scoring;
pub mod service;
pub mod showing;
pub mod store;

pub use domain::{
    Actor, AgentCaseStatus, AgentId, AgentRegistration, Case, CaseId, CaseStatus, MarketingMethod,
    Money, Notification, NotificationKind, Offer, OfferId, PropertyDetails, PropertyType,
    RegistrationId, RegistrationStatus, Role, SalePreferences, SaleTimeframe, SellerContact,
    ShowingBooking, ShowingStatus,
};
pub use error::{MarketplaceError, NotifyError, StoreError};
pub use router::{marketplace_router, CaseView};
pub use scoring::{
    AgentProfileProvider, AgentTrackRecord, CommissionBand, OfferFilters, RankingQuery,
    ScoreBreakdown, ScoringConfig, SortDirection, SortKey,
};
pub use service::{
    CaseIntake, CaseNumberFormatter, MarketplaceService, OfferSubmission, RankedOfferPage,
    RankedOfferView, RegistrationRequest, SequentialCaseNumbers,
};
pub use store::{MarketplaceStore, NotificationSink};
