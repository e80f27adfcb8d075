// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod listings;
pub mod proximity;
pub mod ranking;
pub mod recommender;
pub mod scoring;

pub use distance::{haversine_distance, distance_between, calculate_bounding_box, is_within_bounding_box};
pub use filters::{filter_rentals, matches_preferences};
pub use listings::{order_listings, default_listing_order};
pub use proximity::{compute_distances, PROXIMITY_CUTOFF_MILES};
pub use ranking::{get_ordering, rank, score_zip_codes};
pub use recommender::{Recommendation, RecommendationResult, Recommender};
pub use scoring::{category_weight, min_max_normalize, raw_score};
