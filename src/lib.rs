//! Rental Rank - rental recommendations ranked by proximity to preferred places
//!
//! This library provides the core ranking algorithm: listings are filtered by the
//! user's constraints, zip codes are scored by how many facilities of the user's
//! three ranked categories lie within walking distance, and listings are ordered
//! by zip code score, crime count, price and rating.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    Recommender, Recommendation, filter_rentals, rank, order_listings,
    distance::{haversine_distance, calculate_bounding_box},
};
pub use crate::models::{Rental, Facility, CrimeCount, UserPreference, CategoryRank, RankedListing, RankingConfig, RecommendRequest, RecommendResponse};
