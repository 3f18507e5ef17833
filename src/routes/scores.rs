use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    BatchScoreRequest, BatchScoreResponse, ErrorResponse, HealthResponse, MatchRequest,
    MatchScoreRequest, MatchScoreResponse, SessionKey,
};
use crate::core::ScoreOrchestrator;
use crate::routes::{AppState, SESSION_HEADER};
use crate::services::{CachedBatch, ResultCache};

/// Configure scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match-score", web::post().to(match_score))
        .route("/match-score/batch", web::post().to(batch_match_score));
}

/// Session key from the request header, if the caller supplied one
pub fn session_key(req: &HttpRequest) -> Option<SessionKey> {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| SessionKey::new(value))
}

/// Score a batch, through `cache` when a session is known
///
/// Each route passes its own cache so batches of different shapes never
/// share a session entry.
pub async fn score_batch(
    orchestrator: &ScoreOrchestrator,
    cache: &ResultCache,
    session: Option<&SessionKey>,
    items: &[MatchRequest],
) -> CachedBatch {
    match session {
        Some(key) => {
            cache
                .get_or_compute(key, items, |batch| async move {
                    orchestrator.resolve_batch(&batch).await
                })
                .await
        }
        None => CachedBatch {
            results: orchestrator.resolve_batch(items).await,
            cached: false,
        },
    }
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        scoring_mode: state.orchestrator.mode(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one requirement/specification pair
///
/// POST /api/match-score
///
/// Request body:
/// ```json
/// {
///   "requirementText": "string",
///   "specificationText": "string",
///   "fallbackScore": 85
/// }
/// ```
///
/// Without `fallbackScore` the heuristic estimate serves as the fallback.
async fn match_score(
    state: web::Data<AppState>,
    req: web::Json<MatchScoreRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let orchestrator = &state.orchestrator;
    let request = req
        .into_inner()
        .into_match_request(|requirement, specification| orchestrator.estimate(requirement, specification));

    let result = orchestrator.resolve_score(&request).await;

    HttpResponse::Ok().json(MatchScoreResponse {
        score: result.score,
    })
}

/// Score a batch of pairs for one session
///
/// POST /api/match-score/batch
///
/// The first batch computed for an `X-Session-Id` is returned verbatim to
/// every later request carrying the same header.
async fn batch_match_score(
    state: web::Data<AppState>,
    req: web::Json<BatchScoreRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let orchestrator = &state.orchestrator;
    let items: Vec<MatchRequest> = req
        .into_inner()
        .items
        .into_iter()
        .map(|item| {
            item.into_match_request(|requirement, specification| {
                orchestrator.estimate(requirement, specification)
            })
        })
        .collect();

    let session = session_key(&http_req);
    if session.is_none() {
        tracing::debug!("No {} header, scoring batch without caching", SESSION_HEADER);
    }

    let batch = score_batch(orchestrator, &state.batch_cache, session.as_ref(), &items).await;

    tracing::info!(
        "Scored batch of {} items (cached: {})",
        batch.results.len(),
        batch.cached
    );

    HttpResponse::Ok().json(BatchScoreResponse {
        scores: batch.results.iter().map(|result| result.score).collect(),
        cached: batch.cached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_session_key_from_header() {
        let req = TestRequest::default()
            .insert_header((SESSION_HEADER, "abc-123"))
            .to_http_request();
        assert_eq!(session_key(&req), SessionKey::new("abc-123"));
    }

    #[test]
    fn test_missing_session_header() {
        let req = TestRequest::default().to_http_request();
        assert!(session_key(&req).is_none());
    }
}
