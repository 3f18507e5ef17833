// Integration tests for RFP Match

use actix_web::{test, web, App};
use async_trait::async_trait;
use rfp_match::config::{ProviderBackend, ProviderSettings};
use rfp_match::core::{ScoreEstimator, ScoreOrchestrator, DEFAULT_PROVIDER_TIMEOUT};
use rfp_match::models::{
    BatchScoreResponse, HealthResponse, MatchRequest, MatchResult, MatchScoreResponse,
    PricingSummaryResponse, ProductMatchView, Rfp, ScoringMode, SessionKey,
};
use rfp_match::routes::{self, AppState, SESSION_HEADER};
use rfp_match::services::{
    GenerationParams, ProviderError, ReferenceCatalog, ResultCache, ScoreProvider, TextBackend,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Backend replying with a fixed text and counting calls
struct ScriptedBackend {
    reply: String,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Backend that hangs for prompts mentioning "slow"
struct SelectivelySlowBackend;

#[async_trait]
impl TextBackend for SelectivelySlowBackend {
    fn name(&self) -> &str {
        "selectively-slow"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if prompt.contains("slow") {
            std::future::pending::<()>().await;
        }
        Ok("91".to_string())
    }
}

fn provider_orchestrator(backend: Arc<dyn TextBackend>) -> ScoreOrchestrator {
    ScoreOrchestrator::new(
        ScoringMode::Provider,
        ScoreProvider::new(backend, GenerationParams::default()),
        Arc::new(ScoreEstimator::with_seed(11)),
    )
}

fn app_state(orchestrator: ScoreOrchestrator) -> AppState {
    AppState {
        orchestrator,
        batch_cache: ResultCache::new(),
        catalog_cache: ResultCache::new(),
        catalog: Arc::new(ReferenceCatalog::demo()),
    }
}

#[tokio::test]
async fn test_scores_always_in_range() {
    let replies = ["73", "150", "-5", "not a number", "", "42.5%", "1e3"];
    for reply in replies {
        let orchestrator = provider_orchestrator(ScriptedBackend::new(reply));
        let result = orchestrator
            .resolve_score(&MatchRequest::new("router", "router", 66))
            .await;
        assert!(result.score <= 100, "reply {:?} gave {}", reply, result.score);
    }
}

#[tokio::test]
async fn test_provider_replies_map_to_scores() {
    let request = MatchRequest::new("Firewall Appliance", "Palo Alto PA-5220", 92);
    let cases = [("73", 73u8), ("150", 100), ("-5", 0), ("not a number", 92)];

    for (reply, expected) in cases {
        let result = provider_orchestrator(ScriptedBackend::new(reply))
            .resolve_score(&request)
            .await;
        assert_eq!(result, MatchResult::new(expected), "reply {:?}", reply);
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_item_only_degrades_itself() {
    let orchestrator = provider_orchestrator(Arc::new(SelectivelySlowBackend));
    let requests = vec![
        MatchRequest::new("fast router", "router", 50),
        MatchRequest::new("slow switch", "switch", 44),
        MatchRequest::new("fast firewall", "firewall", 50),
    ];

    let started = tokio::time::Instant::now();
    let results = orchestrator.resolve_batch(&requests).await;
    let elapsed = started.elapsed();

    assert_eq!(
        results,
        vec![MatchResult::new(91), MatchResult::new(44), MatchResult::new(91)]
    );
    // Items run concurrently: one timeout window, not three
    assert!(elapsed >= DEFAULT_PROVIDER_TIMEOUT);
    assert!(elapsed < DEFAULT_PROVIDER_TIMEOUT * 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_timeout() {
    let orchestrator =
        provider_orchestrator(Arc::new(SelectivelySlowBackend)).with_timeout(Duration::from_secs(2));
    let started = tokio::time::Instant::now();

    let result = orchestrator
        .resolve_score(&MatchRequest::new("slow", "slow", 12))
        .await;

    assert_eq!(result.score, 12);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_cache_is_stable_across_reference_changes() {
    let cache = ResultCache::new();
    let orchestrator = provider_orchestrator(ScriptedBackend::new("not a number"));
    let key = SessionKey::new("session-a").unwrap();

    let first_items = vec![MatchRequest::new("router", "router", 94)];
    let first = cache
        .get_or_compute(&key, &first_items, |batch| {
            let orchestrator = orchestrator.clone();
            async move { orchestrator.resolve_batch(&batch).await }
        })
        .await;

    // Reference data changed, same session
    let changed_items = vec![MatchRequest::new("router", "router", 12)];
    let second = cache
        .get_or_compute(&key, &changed_items, |batch| {
            let orchestrator = orchestrator.clone();
            async move { orchestrator.resolve_batch(&batch).await }
        })
        .await;

    assert_eq!(first.results, vec![MatchResult::new(94)]);
    assert_eq!(second.results, first.results);
    assert!(second.cached);
}

#[tokio::test]
async fn test_sessions_do_not_share_results() {
    let cache = ResultCache::new();
    let a = SessionKey::new("session-a").unwrap();
    let b = SessionKey::new("session-b").unwrap();
    let items = vec![MatchRequest::new("router", "router", 50)];

    let first = cache
        .get_or_compute(&a, &items, |_| async { vec![MatchResult::new(61)] })
        .await;
    let second = cache
        .get_or_compute(&b, &items, |_| async { vec![MatchResult::new(79)] })
        .await;

    assert_eq!(first.results, vec![MatchResult::new(61)]);
    assert_eq!(second.results, vec![MatchResult::new(79)]);
    assert!(!second.cached);
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn test_gemini_backend_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_query(mockito::Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(mockito::Matcher::PartialJson(json!({
            "generationConfig": { "maxOutputTokens": 10 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"87\n"}]}}]}"#)
        .create_async()
        .await;

    let settings = ProviderSettings {
        backend: ProviderBackend::Gemini,
        api_key: Some("test-key".to_string()),
        endpoint: Some(server.url()),
        ..ProviderSettings::default()
    };
    let provider = ScoreProvider::from_settings(&settings, Duration::from_secs(5));

    let score = provider.score("48-port switch", "Catalyst 9300").await.unwrap();

    assert_eq!(score, 87.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_backend_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"64"}}]}"#)
        .create_async()
        .await;

    let settings = ProviderSettings {
        backend: ProviderBackend::OpenAi,
        api_key: Some("sk-test".to_string()),
        endpoint: Some(server.url()),
        ..ProviderSettings::default()
    };
    let provider = ScoreProvider::from_settings(&settings, Duration::from_secs(5));

    assert_eq!(provider.score("a", "b").await.unwrap(), 64.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_backend_error_status_falls_back() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let settings = ProviderSettings {
        api_key: Some("test-key".to_string()),
        endpoint: Some(server.url()),
        ..ProviderSettings::default()
    };
    let provider = ScoreProvider::from_settings(&settings, Duration::from_secs(5));

    match provider.score("a", "b").await {
        Err(ProviderError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected status error, got {:?}", other),
    }

    let orchestrator = ScoreOrchestrator::new(
        ScoringMode::Provider,
        provider,
        Arc::new(ScoreEstimator::with_seed(5)),
    );
    let result = orchestrator.resolve_score(&MatchRequest::new("a", "b", 58)).await;
    assert_eq!(result.score, 58);
}

#[actix_web::test]
async fn test_match_score_endpoint() {
    let state = app_state(provider_orchestrator(ScriptedBackend::new("150")));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/match-score")
        .set_json(json!({
            "requirementText": "Industrial grade router",
            "specificationText": "Cisco ISR 4451",
            "fallbackScore": 94
        }))
        .to_request();
    let resp: MatchScoreResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.score, 100);
}

#[actix_web::test]
async fn test_match_score_empty_text_scores_default() {
    let state = app_state(ScoreOrchestrator::heuristic(Arc::new(ScoreEstimator::with_seed(1))));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/match-score")
        .set_json(json!({ "requirementText": "", "specificationText": "anything" }))
        .to_request();
    let resp: MatchScoreResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.score, 85);
}

#[actix_web::test]
async fn test_match_score_rejects_out_of_range_fallback() {
    let state = app_state(ScoreOrchestrator::heuristic(Arc::new(ScoreEstimator::with_seed(1))));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/match-score")
        .set_json(json!({
            "requirementText": "router",
            "specificationText": "router",
            "fallbackScore": 101
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_batch_endpoint_caches_per_session() {
    let backend = ScriptedBackend::new("not a number");
    let state = app_state(provider_orchestrator(backend.clone()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let body = |fallback: u8| {
        json!({
            "items": [
                { "requirementText": "router", "specificationText": "router", "fallbackScore": fallback },
                { "requirementText": "switch", "specificationText": "switch", "fallbackScore": 70 }
            ]
        })
    };

    let first: BatchScoreResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/match-score/batch")
            .insert_header((SESSION_HEADER, "dashboard-1"))
            .set_json(body(90))
            .to_request(),
    )
    .await;
    let second: BatchScoreResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/match-score/batch")
            .insert_header((SESSION_HEADER, "dashboard-1"))
            .set_json(body(10))
            .to_request(),
    )
    .await;
    let other_session: BatchScoreResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/match-score/batch")
            .insert_header((SESSION_HEADER, "dashboard-2"))
            .set_json(body(10))
            .to_request(),
    )
    .await;

    assert_eq!(first.scores, vec![90, 70]);
    assert!(!first.cached);
    assert_eq!(second.scores, vec![90, 70]);
    assert!(second.cached);
    assert_eq!(other_session.scores, vec![10, 70]);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
}

#[actix_web::test]
async fn test_product_matching_uses_reference_fallbacks() {
    // Provider unavailable: every score is the catalog reference value
    let orchestrator = ScoreOrchestrator::new(
        ScoringMode::Provider,
        ScoreProvider::unavailable("gemini"),
        Arc::new(ScoreEstimator::with_seed(2)),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(orchestrator)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/product-matching")
        .to_request();
    let views: Vec<ProductMatchView> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(views.len(), 3);
    assert_eq!(views[0].top_match, "Cisco ISR 4451");
    assert_eq!(views[0].match_score, 94);
    assert_eq!(views[0].alternatives[0].score, 89);
    assert_eq!(views[2].alternatives[1].score, 84);
}

#[actix_web::test]
async fn test_product_matching_session_is_stable() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(ScoreOrchestrator::heuristic(Arc::new(
                ScoreEstimator::new(),
            )))))
            .configure(routes::configure_routes),
    )
    .await;

    let fetch = || {
        test::TestRequest::get()
            .uri("/api/product-matching")
            .insert_header((SESSION_HEADER, "viewer-7"))
            .to_request()
    };

    let first: Vec<ProductMatchView> = test::call_and_read_body_json(&app, fetch()).await;
    let second: Vec<ProductMatchView> = test::call_and_read_body_json(&app, fetch()).await;

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.match_score, b.match_score);
        assert!((80..=98).contains(&a.match_score));
        let a_alts: Vec<u8> = a.alternatives.iter().map(|alt| alt.score).collect();
        let b_alts: Vec<u8> = b.alternatives.iter().map(|alt| alt.score).collect();
        assert_eq!(a_alts, b_alts);
    }
}

#[actix_web::test]
async fn test_session_shared_across_endpoints_keeps_batches_apart() {
    // Unparseable replies: batch items get their fallbacks, catalog items their reference scores
    let state = app_state(provider_orchestrator(ScriptedBackend::new("not a number")));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let views: Vec<ProductMatchView> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/product-matching")
            .insert_header((SESSION_HEADER, "shared-1"))
            .to_request(),
    )
    .await;
    let batch: BatchScoreResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/match-score/batch")
            .insert_header((SESSION_HEADER, "shared-1"))
            .set_json(json!({
                "items": [
                    { "requirementText": "router", "specificationText": "router", "fallbackScore": 12 },
                    { "requirementText": "switch", "specificationText": "switch", "fallbackScore": 34 }
                ]
            }))
            .to_request(),
    )
    .await;
    let views_again: Vec<ProductMatchView> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/product-matching")
            .insert_header((SESSION_HEADER, "shared-1"))
            .to_request(),
    )
    .await;

    assert_eq!(batch.scores, vec![12, 34]);
    assert!(!batch.cached);

    for result in [&views, &views_again] {
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|view| view.alternatives.len() == 2));
        assert_eq!(result[0].match_score, 94);
        assert_eq!(result[0].alternatives[0].score, 89);
    }
}

#[actix_web::test]
async fn test_reference_endpoints() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(ScoreOrchestrator::heuristic(Arc::new(
                ScoreEstimator::with_seed(3),
            )))))
            .configure(routes::configure_routes),
    )
    .await;

    let rfps: Vec<Rfp> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/rfps").to_request())
            .await;
    assert_eq!(rfps.len(), 5);
    assert_eq!(rfps[0].title, "Industrial Equipment Supply - Metro Rail Project");

    let pricing: PricingSummaryResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/pricing-summary").to_request(),
    )
    .await;
    assert_eq!(pricing.total_proposal_value, 275_500);

    let health: HealthResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(health.scoring_mode, ScoringMode::Heuristic);
}
