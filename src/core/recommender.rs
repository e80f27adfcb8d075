use crate::models::{CrimeCount, Facility, ProximityRecord, RankedListing, RankingConfig, Rental, UserPreference};
use crate::core::{
    filters::filter_rentals,
    listings::{default_listing_order, order_listings},
    proximity::compute_distances,
    ranking::get_ordering,
};

/// What one recommendation request produced
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// No rental matches the user's constraints; ranking was not attempted
    NoListings,
    /// No facility is within walking distance of any candidate zip code
    Unranked { listings: Vec<Rental> },
    /// Zip codes ordered best first, and listings in recommendation order
    Ranked {
        zip_order: Vec<String>,
        listings: Vec<RankedListing>,
        /// Facilities near the best zip code, by rank then distance
        nearby_facilities: Vec<ProximityRecord>,
    },
}

/// Result of the recommendation process
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendation: Recommendation,
    pub total_listings: usize,
    pub matched_listings: usize,
}

/// Recommendation orchestrator - runs the ranking pipeline for one request
///
/// # Pipeline Stages
/// 1. Filter rentals by the user's hard constraints
/// 2. Proximity join against facilities in the three ranked categories
/// 3. Zip code scoring and ordering
/// 4. Listing tie-break by crime count, price and rating
#[derive(Debug, Clone)]
pub struct Recommender {
    config: RankingConfig,
}

impl Recommender {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self {
            config: RankingConfig::default(),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Recommend listings for a user
    ///
    /// # Arguments
    /// * `preferences` - The user's constraints and category ranking
    /// * `rentals` - All loaded rentals
    /// * `facilities` - All loaded facilities
    /// * `crime_counts` - Crime clusters per neighborhood
    pub fn recommend(
        &self,
        preferences: &UserPreference,
        rentals: &[Rental],
        facilities: &[Facility],
        crime_counts: &[CrimeCount],
    ) -> RecommendationResult {
        let total_listings = rentals.len();

        // Stage 1: Hard constraints
        let filtered = filter_rentals(preferences, rentals);
        let matched_listings = filtered.len();

        if filtered.is_empty() {
            tracing::info!("No rentals match the selected features");
            return RecommendationResult {
                recommendation: Recommendation::NoListings,
                total_listings,
                matched_listings,
            };
        }

        // Stage 2 & 3: Proximity join and zip code ordering
        let records = compute_distances(&filtered, facilities, &preferences.category_rank);
        let Some(zip_order) = get_ordering(&records, self.config.distance_epsilon_miles) else {
            tracing::info!(
                "No ranked facility within walking distance of {} matching rentals, returning unranked listings",
                matched_listings
            );
            let mut listings = default_listing_order(&filtered);
            listings.truncate(self.config.max_listings);
            return RecommendationResult {
                recommendation: Recommendation::Unranked { listings },
                total_listings,
                matched_listings,
            };
        };

        // Stage 4: Listing tie-break
        let mut listings = order_listings(&zip_order, &filtered, crime_counts);
        listings.truncate(self.config.max_listings);

        let nearby_facilities = facilities_near(&records, &zip_order[0]);

        tracing::info!(
            "Ranked {} zip codes, best {}, {} listings",
            zip_order.len(),
            zip_order[0],
            listings.len()
        );

        RecommendationResult {
            recommendation: Recommendation::Ranked {
                zip_order,
                listings,
                nearby_facilities,
            },
            total_listings,
            matched_listings,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Proximity records of one zip code, most important category first, then nearest
fn facilities_near(records: &[ProximityRecord], zip_code: &str) -> Vec<ProximityRecord> {
    let mut nearby: Vec<ProximityRecord> = records
        .iter()
        .filter(|record| record.zip_code == zip_code)
        .cloned()
        .collect();

    nearby.sort_by(|a, b| {
        a.rank.cmp(&b.rank).then_with(|| {
            a.distance_miles
                .partial_cmp(&b.distance_miles)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    nearby
}
