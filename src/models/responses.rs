use serde::{Deserialize, Serialize};

use crate::models::domain::{MaterialLine, ScoringMode, ServiceLine};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "scoringMode")]
    pub scoring_mode: ScoringMode,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Single score response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScoreResponse {
    pub score: u8,
}

/// Batch score response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchScoreResponse {
    pub scores: Vec<u8>,
    pub cached: bool,
}

/// Scored alternative product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeView {
    pub name: String,
    pub score: u8,
}

/// Product matching row as served to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMatchView {
    #[serde(rename = "rfpItem")]
    pub rfp_item: String,
    #[serde(rename = "topMatch")]
    pub top_match: String,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub alternatives: Vec<AlternativeView>,
}

/// Pricing summary with computed totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSummaryResponse {
    #[serde(rename = "materialCost")]
    pub material_cost: u64,
    #[serde(rename = "serviceCost")]
    pub service_cost: u64,
    #[serde(rename = "totalProposalValue")]
    pub total_proposal_value: u64,
    #[serde(rename = "materialsBreakdown")]
    pub materials_breakdown: Vec<MaterialLine>,
    #[serde(rename = "servicesBreakdown")]
    pub services_breakdown: Vec<ServiceLine>,
}
