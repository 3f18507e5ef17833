use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::{AlternativeView, MatchResult, ProductMatchView, RfpItem};
use crate::routes::scores::{score_batch, session_key};
use crate::routes::AppState;

/// Configure reference data routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/rfps", web::get().to(list_rfps))
        .route("/product-matching", web::get().to(product_matching))
        .route("/pricing-summary", web::get().to(pricing_summary));
}

/// GET /api/rfps
async fn list_rfps(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.rfps())
}

/// GET /api/pricing-summary
async fn pricing_summary(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.pricing_summary())
}

/// GET /api/product-matching
///
/// Scores every candidate product against its RFP item in one batch. The
/// catalog's reference scores are the fallbacks.
async fn product_matching(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let items = state.catalog.items();
    let requests: Vec<_> = items.iter().flat_map(RfpItem::match_requests).collect();

    let session = session_key(&http_req);
    let batch = score_batch(
        &state.orchestrator,
        &state.catalog_cache,
        session.as_ref(),
        &requests,
    )
    .await;

    tracing::debug!(
        "Scored {} product candidates across {} items (cached: {})",
        batch.results.len(),
        items.len(),
        batch.cached
    );

    HttpResponse::Ok().json(assemble_views(items, &batch.results))
}

/// Regroup a flat score list into per-item views, in catalog order
///
/// Missing scores (a stored batch shorter than the catalog) fall back to the
/// reference score.
pub fn assemble_views(items: &[RfpItem], results: &[MatchResult]) -> Vec<ProductMatchView> {
    let mut scores = results.iter().map(|result| result.score);

    items
        .iter()
        .map(|item| {
            let match_score = scores.next().unwrap_or(item.top_match.reference_score);
            let alternatives = item
                .alternatives
                .iter()
                .map(|alt| AlternativeView {
                    name: alt.name.clone(),
                    score: scores.next().unwrap_or(alt.reference_score),
                })
                .collect();

            ProductMatchView {
                rfp_item: item.name.clone(),
                top_match: item.top_match.name.clone(),
                match_score,
                alternatives,
            }
        })
        .collect()
}
