use std::collections::HashSet;

use crate::core::distance::{calculate_bounding_box, distance_between, is_within_bounding_box};
use crate::models::{CategoryRank, Facility, ProximityRecord, Rental};

/// Walking distance, in miles
pub const PROXIMITY_CUTOFF_MILES: f64 = 0.25;

/// Keep the first rental seen for each zip code
pub fn representative_rentals(rentals: &[Rental]) -> Vec<&Rental> {
    let mut seen = HashSet::new();
    rentals
        .iter()
        .filter(|rental| seen.insert(rental.zip_code.as_str()))
        .collect()
}

/// Facilities belonging to one of the user's ranked categories
pub fn facilities_in_categories<'a>(
    facilities: &'a [Facility],
    category_rank: &CategoryRank,
) -> Vec<&'a Facility> {
    facilities
        .iter()
        .filter(|facility| category_rank.contains(&facility.category))
        .collect()
}

/// Join every candidate zip code to the facilities within walking distance of it
///
/// One representative rental stands in for each zip code. Every
/// (representative, facility) pair is measured and tagged with the user's rank
/// for the facility's category; pairs farther than [`PROXIMITY_CUTOFF_MILES`]
/// are dropped. Facilities outside the ranked categories never produce records.
///
/// This is a nested-loop scan, O(zip codes × facilities). A bounding box around
/// each representative skips the haversine for facilities that cannot qualify;
/// it never excludes a pair within the cutoff.
pub fn compute_distances(
    rentals: &[Rental],
    facilities: &[Facility],
    category_rank: &CategoryRank,
) -> Vec<ProximityRecord> {
    let representatives = representative_rentals(rentals);
    let candidates = facilities_in_categories(facilities, category_rank);

    let mut records = Vec::new();

    for rental in &representatives {
        let bbox = calculate_bounding_box(rental.latitude, rental.longitude, PROXIMITY_CUTOFF_MILES);

        for facility in &candidates {
            if !is_within_bounding_box(facility.latitude, facility.longitude, &bbox) {
                continue;
            }

            let distance_miles = distance_between(rental.location(), facility.location());
            if distance_miles > PROXIMITY_CUTOFF_MILES {
                continue;
            }

            // Candidates are pre-filtered to ranked categories
            let Some(rank) = category_rank.rank_of(&facility.category) else {
                continue;
            };

            records.push(ProximityRecord {
                zip_code: rental.zip_code.clone(),
                facility_category: facility.category.clone(),
                facility_id: facility.facility_id.clone(),
                facility_name: facility.name.clone(),
                latitude: facility.latitude,
                longitude: facility.longitude,
                distance_miles,
                rank,
            });
        }
    }

    tracing::debug!(
        "Proximity join: {} zip codes x {} facilities -> {} records within {} mi",
        representatives.len(),
        candidates.len(),
        records.len(),
        PROXIMITY_CUTOFF_MILES
    );

    records
}
