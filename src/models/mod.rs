// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, CategoryRank, CrimeCount, CrimeIncident, Facility, PreferenceError,
    ProximityRecord, RankedListing, RankingConfig, Rental, UserPreference, ZipScore,
    RANKED_CATEGORY_COUNT,
};
pub use requests::RecommendRequest;
pub use responses::{ErrorResponse, HealthResponse, RecommendResponse, RecommendationStatus};
