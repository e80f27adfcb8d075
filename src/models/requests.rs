use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

use crate::models::domain::{CategoryRank, PreferenceError, UserPreference, RANKED_CATEGORY_COUNT};

/// Request to generate recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_price_range"))]
pub struct RecommendRequest {
    #[validate(range(min = 0.0))]
    #[serde(alias = "priceMin")]
    pub price_min: f64,
    #[validate(range(min = 0.0))]
    #[serde(alias = "priceMax")]
    pub price_max: f64,
    #[validate(length(min = 1))]
    #[serde(alias = "zipCodes", deserialize_with = "one_or_many")]
    pub zip_codes: Vec<String>,
    #[validate(length(min = 1))]
    #[serde(alias = "rentalTypes", deserialize_with = "one_or_many")]
    pub rental_types: Vec<String>,
    #[validate(range(max = 3))]
    #[serde(alias = "laundryCode")]
    pub laundry_code: u8,
    #[validate(range(max = 1))]
    #[serde(alias = "parkingCode")]
    pub parking_code: u8,
    #[validate(range(max = 1))]
    #[serde(alias = "petCode")]
    pub pet_code: u8,
    /// Facility categories, most important first
    #[validate(length(equal = 3))]
    pub categories: Vec<String>,
}

fn validate_price_range(req: &RecommendRequest) -> Result<(), ValidationError> {
    if req.price_min > req.price_max {
        return Err(ValidationError::new("price_min_exceeds_price_max"));
    }
    Ok(())
}

/// Accept either a single string or an array of strings
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

impl TryFrom<RecommendRequest> for UserPreference {
    type Error = PreferenceError;

    fn try_from(req: RecommendRequest) -> Result<Self, Self::Error> {
        if req.price_min > req.price_max {
            return Err(PreferenceError::InvertedPriceRange {
                min: req.price_min,
                max: req.price_max,
            });
        }
        if req.categories.len() != RANKED_CATEGORY_COUNT {
            return Err(PreferenceError::WrongCategoryCount {
                expected: RANKED_CATEGORY_COUNT,
                actual: req.categories.len(),
            });
        }

        Ok(UserPreference {
            price_min: req.price_min,
            price_max: req.price_max,
            zip_codes: req.zip_codes.into_iter().collect::<BTreeSet<_>>(),
            rental_types: req.rental_types.into_iter().collect::<BTreeSet<_>>(),
            laundry_code: req.laundry_code,
            parking_code: req.parking_code,
            pet_code: req.pet_code,
            category_rank: CategoryRank::from_slice(&req.categories)?,
        })
    }
}
