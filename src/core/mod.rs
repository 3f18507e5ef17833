// Core algorithm exports
pub mod estimator;
pub mod orchestrator;

pub use estimator::{estimate_with_jitter, overlap_ratio, tokenize, ScoreEstimator, EMPTY_TEXT_SCORE};
pub use orchestrator::{ScoreOrchestrator, DEFAULT_PROVIDER_TIMEOUT};
