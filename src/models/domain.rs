use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest score a match can carry
pub const MAX_SCORE: u8 = 100;

/// A single requirement/specification pair to be scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(rename = "requirementText")]
    pub requirement_text: String,
    #[serde(rename = "specificationText")]
    pub specification_text: String,
    #[serde(rename = "fallbackScore")]
    pub fallback_score: u8,
}

impl MatchRequest {
    /// Build a request, capping the fallback at 100
    pub fn new(
        requirement_text: impl Into<String>,
        specification_text: impl Into<String>,
        fallback_score: u8,
    ) -> Self {
        Self {
            requirement_text: requirement_text.into(),
            specification_text: specification_text.into(),
            fallback_score: fallback_score.min(MAX_SCORE),
        }
    }
}

/// Score produced for a `MatchRequest`. Always present, even when scoring failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
}

impl MatchResult {
    pub fn new(score: u8) -> Self {
        Self {
            score: score.min(MAX_SCORE),
        }
    }

    /// Clamp a raw provider value to [0, 100] and round to the nearest integer
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn from_raw(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let clamped = raw.clamp(0.0, MAX_SCORE as f64);
        Some(Self {
            score: clamped.round() as u8,
        })
    }
}

/// Process-wide scoring mode, chosen once at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Lexical-overlap estimate, no network
    Heuristic,
    /// Delegate to the configured text-generation backend
    #[default]
    Provider,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Heuristic => write!(f, "heuristic"),
            ScoringMode::Provider => write!(f, "provider"),
        }
    }
}

/// Caller-supplied session identity used only as a result cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Returns `None` for blank identifiers
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// An open RFP opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rfp {
    pub id: u32,
    pub title: String,
    pub source: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(rename = "daysLeft")]
    pub days_left: u32,
}

/// A candidate product with its specification sheet and a reference score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub name: String,
    #[serde(rename = "specificationText")]
    pub specification_text: String,
    #[serde(rename = "referenceScore")]
    pub reference_score: u8,
}

/// One RFP line item and the products considered for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfpItem {
    #[serde(rename = "rfpItem")]
    pub name: String,
    #[serde(rename = "requirementText")]
    pub requirement_text: String,
    #[serde(rename = "topMatch")]
    pub top_match: CatalogProduct,
    pub alternatives: Vec<CatalogProduct>,
}

impl RfpItem {
    /// Top match first, then alternatives in catalog order
    pub fn candidates(&self) -> impl Iterator<Item = &CatalogProduct> {
        std::iter::once(&self.top_match).chain(self.alternatives.iter())
    }

    /// One `MatchRequest` per candidate, falling back to the reference score
    pub fn match_requests(&self) -> Vec<MatchRequest> {
        self.candidates()
            .map(|product| {
                MatchRequest::new(
                    self.requirement_text.clone(),
                    product.specification_text.clone(),
                    product.reference_score,
                )
            })
            .collect()
    }
}

/// Materials line in the pricing breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLine {
    pub item: String,
    pub quantity: u32,
    #[serde(rename = "unitPrice")]
    pub unit_price: u64,
    pub total: u64,
}

/// Services line in the pricing breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLine {
    pub item: String,
    pub hours: u32,
    pub rate: u64,
    pub total: u64,
}
