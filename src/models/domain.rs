use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Number of facility categories a user ranks
pub const RANKED_CATEGORY_COUNT: usize = 3;

/// A rental listing for one unit type
///
/// A building advertising several unit types yields one row per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(alias = "zipcode")]
    pub zip_code: String,
    #[serde(rename = "type")]
    pub rental_type: String,
    pub price: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub laundry_code: u8,
    pub parking_code: u8,
    pub pet_code: u8,
    #[serde(alias = "ntaname")]
    pub neighborhood_name: String,
    #[serde(default)]
    pub contact: Option<String>,
}

impl Rental {
    pub fn location(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Point of interest from the city facilities export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub facility_id: String,
    #[serde(alias = "facname")]
    pub name: String,
    #[serde(alias = "facgroup")]
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "zipcode")]
    pub zip_code: String,
}

impl Facility {
    pub fn location(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Crime incidents aggregated per neighborhood cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeCount {
    #[serde(alias = "ntaname")]
    pub neighborhood_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: u32,
}

impl CrimeCount {
    pub fn location(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// A single raw crime incident, before aggregation into [`CrimeCount`] rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeIncident {
    #[serde(alias = "ntaname")]
    pub neighborhood_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors raised while building a user's preferences
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreferenceError {
    #[error("expected {expected} ranked categories, got {actual}")]
    WrongCategoryCount { expected: usize, actual: usize },

    #[error("category at rank {rank} is empty")]
    EmptyCategory { rank: u8 },

    #[error("category '{0}' is ranked more than once")]
    DuplicateCategory(String),

    #[error("price range is inverted: min {min} > max {max}")]
    InvertedPriceRange { min: f64, max: f64 },
}

/// The user's three facility categories, most important first
///
/// Rank values form a bijection between the categories and `1..=3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRank {
    categories: [String; RANKED_CATEGORY_COUNT],
}

impl CategoryRank {
    pub fn new(
        first: impl Into<String>,
        second: impl Into<String>,
        third: impl Into<String>,
    ) -> Result<Self, PreferenceError> {
        let categories = [first.into(), second.into(), third.into()];

        for (i, category) in categories.iter().enumerate() {
            if category.trim().is_empty() {
                return Err(PreferenceError::EmptyCategory { rank: i as u8 + 1 });
            }
            if categories[..i].contains(category) {
                return Err(PreferenceError::DuplicateCategory(category.clone()));
            }
        }

        Ok(Self { categories })
    }

    /// Build from an ordered slice, as received from a request body
    pub fn from_slice(categories: &[String]) -> Result<Self, PreferenceError> {
        match categories {
            [first, second, third] => Self::new(first.as_str(), second.as_str(), third.as_str()),
            _ => Err(PreferenceError::WrongCategoryCount {
                expected: RANKED_CATEGORY_COUNT,
                actual: categories.len(),
            }),
        }
    }

    /// Rank (1 = most important) of a category, if the user picked it
    pub fn rank_of(&self, category: &str) -> Option<u8> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| i as u8 + 1)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.rank_of(category).is_some()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// What the user is looking for in one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreference {
    pub price_min: f64,
    pub price_max: f64,
    pub zip_codes: BTreeSet<String>,
    pub rental_types: BTreeSet<String>,
    pub laundry_code: u8,
    pub parking_code: u8,
    pub pet_code: u8,
    pub category_rank: CategoryRank,
}

/// A facility within walking distance of a zip code's representative rental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityRecord {
    pub zip_code: String,
    pub facility_category: String,
    pub facility_id: String,
    pub facility_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_miles: f64,
    pub rank: u8,
}

/// Final score of a zip code in the ranking engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZipScore {
    pub zip_code: String,
    pub score: f64,
}

/// One row of the final recommendation list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedListing {
    #[serde(flatten)]
    pub rental: Rental,
    /// Position of the rental's zip code in the zip ordering (0 = best)
    pub zip_rank: Option<usize>,
    /// Crimes in the nearest cluster of the rental's neighborhood
    pub crime_count: Option<u32>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Ranking tunables
#[derive(Debug, Clone, Copy)]
pub struct RankingConfig {
    /// Floor applied to mean facility distance before dividing
    pub distance_epsilon_miles: f64,
    /// Maximum listings returned per recommendation
    pub max_listings: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            distance_epsilon_miles: 1e-6,
            max_listings: 100,
        }
    }
}
