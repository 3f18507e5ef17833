// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CatalogProduct, MatchRequest, MatchResult, MaterialLine, Rfp, RfpItem, ScoringMode,
    ServiceLine, SessionKey, MAX_SCORE,
};
pub use requests::{BatchScoreRequest, MatchScoreRequest};
pub use responses::{
    AlternativeView, BatchScoreResponse, ErrorResponse, HealthResponse, MatchScoreResponse,
    PricingSummaryResponse, ProductMatchView,
};
