use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::core::estimator::ScoreEstimator;
use crate::models::{MatchRequest, MatchResult, ScoringMode};
use crate::services::provider::{ProviderError, ScoreProvider};

/// Upper bound on a single provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves match scores, never failing
///
/// # Protocol
/// 1. Heuristic mode: estimate locally, no network
/// 2. Provider mode: ask the provider, bounded by the timeout
/// 3. Provider success: clamp to [0, 100] and round
/// 4. Any provider failure: the request's fallback score
///
/// A timed-out call is abandoned, not cancelled at the transport level; the
/// HTTP client's own timeout eventually reaps it.
#[derive(Debug, Clone)]
pub struct ScoreOrchestrator {
    mode: ScoringMode,
    provider: ScoreProvider,
    estimator: Arc<ScoreEstimator>,
    timeout: Duration,
}

impl ScoreOrchestrator {
    pub fn new(mode: ScoringMode, provider: ScoreProvider, estimator: Arc<ScoreEstimator>) -> Self {
        Self {
            mode,
            provider,
            estimator,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Heuristic-only orchestrator, no provider involved
    pub fn heuristic(estimator: Arc<ScoreEstimator>) -> Self {
        Self::new(
            ScoringMode::Heuristic,
            ScoreProvider::unavailable("none"),
            estimator,
        )
    }

    /// Override the per-call provider timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn estimator(&self) -> &ScoreEstimator {
        &self.estimator
    }

    /// Heuristic estimate for a pair, for callers that need a fallback value
    pub fn estimate(&self, requirement_text: &str, specification_text: &str) -> u8 {
        self.estimator.estimate(requirement_text, specification_text)
    }

    /// Resolve a score for one request. Always yields a value in [0, 100].
    pub async fn resolve_score(&self, request: &MatchRequest) -> MatchResult {
        match self.mode {
            ScoringMode::Heuristic => MatchResult::new(
                self.estimator
                    .estimate(&request.requirement_text, &request.specification_text),
            ),
            ScoringMode::Provider => match self.score_with_timeout(request).await {
                Ok(raw) => match MatchResult::from_raw(raw) {
                    Some(result) => result,
                    None => {
                        tracing::error!("Provider returned non-finite score {}, using fallback", raw);
                        self.fallback(request)
                    }
                },
                Err(ProviderError::Unavailable { backend }) => {
                    tracing::warn!(
                        "Provider {} not configured, using fallback score {}",
                        backend,
                        request.fallback_score
                    );
                    self.fallback(request)
                }
                Err(err @ ProviderError::Timeout(_)) => {
                    tracing::warn!("{}, using fallback score {}", err, request.fallback_score);
                    self.fallback(request)
                }
                Err(err) => {
                    tracing::error!(
                        "Error calculating spec match percentage: {}, using fallback score {}",
                        err,
                        request.fallback_score
                    );
                    self.fallback(request)
                }
            },
        }
    }

    /// Resolve a batch concurrently, preserving input order
    ///
    /// Each item has its own timeout, so one slow item only degrades itself.
    pub async fn resolve_batch(&self, requests: &[MatchRequest]) -> Vec<MatchResult> {
        join_all(requests.iter().map(|request| self.resolve_score(request))).await
    }

    async fn score_with_timeout(&self, request: &MatchRequest) -> Result<f64, ProviderError> {
        let call = self
            .provider
            .score(&request.requirement_text, &request.specification_text);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        }
    }

    fn fallback(&self, request: &MatchRequest) -> MatchResult {
        MatchResult::new(request.fallback_score)
    }
}
