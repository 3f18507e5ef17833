// Route exports
pub mod catalog;
pub mod scores;

use actix_web::web;
use std::sync::Arc;

use crate::core::ScoreOrchestrator;
use crate::services::{ReferenceCatalog, ResultCache};

/// Header carrying the caller's session identity
pub const SESSION_HEADER: &str = "X-Session-Id";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ScoreOrchestrator,
    /// Session batches posted to `/api/match-score/batch`
    pub batch_cache: ResultCache,
    /// Session snapshots of `/api/product-matching`
    pub catalog_cache: ResultCache,
    pub catalog: Arc<ReferenceCatalog>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(catalog::configure)
            .configure(scores::configure),
    );
}
