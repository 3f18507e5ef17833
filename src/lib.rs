//! RFP Match - specification match scoring for RFP response dashboards
//!
//! Scores how well a product specification satisfies an RFP requirement,
//! either with a lexical-overlap heuristic or by delegating to an LLM
//! backend. Scoring never fails: provider errors and timeouts degrade to a
//! fallback score, and batches can be pinned per session in a result cache.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ScoreEstimator, ScoreOrchestrator, DEFAULT_PROVIDER_TIMEOUT};
pub use crate::models::{MatchRequest, MatchResult, ScoringMode, SessionKey};
pub use crate::services::{ProviderError, ResultCache, ScoreProvider, TextBackend};
