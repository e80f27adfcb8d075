use serde::{Deserialize, Serialize};
use crate::models::domain::{ProximityRecord, RankedListing};

/// Outcome label of a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ranked,
    Unranked,
    NoListings,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub request_id: String,
    pub status: RecommendationStatus,
    pub message: Option<String>,
    pub total_listings: usize,
    pub matched_listings: usize,
    pub zip_order: Vec<String>,
    pub best_zip_code: Option<String>,
    pub listings: Vec<RankedListing>,
    pub nearby_facilities: Vec<ProximityRecord>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub rentals: usize,
    pub facilities: usize,
    pub crime_counts: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
