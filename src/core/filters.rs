use crate::models::{Rental, UserPreference};

/// Check if a rental satisfies every hard constraint of the user's preferences
///
/// Price is inclusive on both ends; laundry, parking and pet codes must match
/// exactly; zip code and rental type must be among the requested values.
#[inline]
pub fn matches_preferences(
    rental: &Rental,
    preferences: &UserPreference,
) -> bool {
    // Check price range
    if rental.price < preferences.price_min || rental.price > preferences.price_max {
        return false;
    }

    // Check amenity codes
    if rental.laundry_code != preferences.laundry_code
        || rental.parking_code != preferences.parking_code
        || rental.pet_code != preferences.pet_code {
        return false;
    }

    // Check location
    if !preferences.zip_codes.contains(&rental.zip_code) {
        return false;
    }

    // Check unit type
    if !preferences.rental_types.contains(&rental.rental_type) {
        return false;
    }

    true
}

/// Reduce the full rental collection to the listings matching the user's constraints
///
/// Relative order of the surviving rows is kept. An empty result means no
/// listing matches and ranking must not be attempted.
pub fn filter_rentals(
    preferences: &UserPreference,
    rentals: &[Rental],
) -> Vec<Rental> {
    let filtered: Vec<Rental> = rentals
        .iter()
        .filter(|rental| matches_preferences(rental, preferences))
        .cloned()
        .collect();

    tracing::debug!(
        "Filter kept {} of {} rentals",
        filtered.len(),
        rentals.len()
    );

    filtered
}
