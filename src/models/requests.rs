use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::MatchRequest;

/// Request to score a single requirement/specification pair
///
/// Empty texts are valid input: they score as the empty-text default.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchScoreRequest {
    #[serde(alias = "requirement_text", rename = "requirementText")]
    pub requirement_text: String,
    #[serde(alias = "specification_text", rename = "specificationText")]
    pub specification_text: String,
    #[validate(range(max = 100))]
    #[serde(default, alias = "fallback_score", rename = "fallbackScore")]
    pub fallback_score: Option<u8>,
}

/// Request to score a batch of pairs under one session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchScoreRequest {
    #[validate(length(min = 1, max = 64))]
    #[validate(nested)]
    pub items: Vec<MatchScoreRequest>,
}

impl MatchScoreRequest {
    /// Convert to a domain request, using `estimated` when no fallback was supplied
    pub fn into_match_request(self, estimated: impl FnOnce(&str, &str) -> u8) -> MatchRequest {
        let fallback = match self.fallback_score {
            Some(score) => score,
            None => estimated(&self.requirement_text, &self.specification_text),
        };
        MatchRequest::new(self.requirement_text, self.specification_text, fallback)
    }
}
