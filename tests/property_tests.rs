//! Property-based tests for the ranking pipeline.
//!
//! # Invariants tested
//!
//! - **Distance:** symmetric and zero for coincident points.
//! - **Filter:** every kept rental satisfies all predicates; filtering is idempotent.
//! - **Proximity join:** no record beyond the walking cutoff, and the bounding
//!   box pre-filter drops nothing a full scan would keep, including across the
//!   antimeridian and around the poles.
//! - **Ordering:** deterministic, duplicate-free, and covers every zip code.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use rental_rank::core::{
    distance::haversine_distance,
    filters::{filter_rentals, matches_preferences},
    proximity::{compute_distances, PROXIMITY_CUTOFF_MILES},
    ranking::get_ordering,
};
use rental_rank::models::{CategoryRank, Facility, Rental, UserPreference};

const CATEGORIES: [&str; 4] = ["Health care", "Transportation", "Libraries", "Parks and plazas"];
const ZIP_CODES: [&str; 5] = ["10001", "10002", "10003", "10011", "10014"];
const TYPES: [&str; 3] = ["Studio", "1 Bed", "2 Beds"];

fn category_rank() -> CategoryRank {
    CategoryRank::new(CATEGORIES[0], CATEGORIES[1], CATEGORIES[2]).unwrap()
}

prop_compose! {
    fn rental_strategy()(
        id in 0u32..10_000,
        zip in 0usize..ZIP_CODES.len(),
        kind in 0usize..TYPES.len(),
        price in 1000.0f64..8000.0,
        lat in 40.70f64..40.80,
        lon in -74.02f64..-73.93,
        laundry in 0u8..4,
        parking in 0u8..2,
        pet in 0u8..2,
    ) -> Rental {
        Rental {
            id: id.to_string(),
            name: format!("Building {}", id),
            address: format!("{} Broadway", id),
            zip_code: ZIP_CODES[zip].to_string(),
            rental_type: TYPES[kind].to_string(),
            price,
            rating: None,
            latitude: lat,
            longitude: lon,
            laundry_code: laundry,
            parking_code: parking,
            pet_code: pet,
            neighborhood_name: "Manhattan".to_string(),
            contact: None,
        }
    }
}

prop_compose! {
    fn facility_strategy()(
        id in 0u32..10_000,
        category in 0usize..CATEGORIES.len(),
        lat in 40.70f64..40.80,
        lon in -74.02f64..-73.93,
    ) -> Facility {
        Facility {
            facility_id: id.to_string(),
            name: format!("Facility {}", id),
            category: CATEGORIES[category].to_string(),
            latitude: lat,
            longitude: lon,
            zip_code: "10001".to_string(),
        }
    }
}

prop_compose! {
    fn preference_strategy()(
        bounds in (1000.0f64..8000.0, 1000.0f64..8000.0),
        zips in proptest::sample::subsequence(ZIP_CODES.to_vec(), 1..=ZIP_CODES.len()),
        kinds in proptest::sample::subsequence(TYPES.to_vec(), 1..=TYPES.len()),
        laundry in 0u8..4,
        parking in 0u8..2,
        pet in 0u8..2,
    ) -> UserPreference {
        UserPreference {
            price_min: bounds.0.min(bounds.1),
            price_max: bounds.0.max(bounds.1),
            zip_codes: zips.into_iter().map(str::to_string).collect(),
            rental_types: kinds.into_iter().map(str::to_string).collect(),
            laundry_code: laundry,
            parking_code: parking,
            pet_code: pet,
            category_rank: category_rank(),
        }
    }
}

/// Wrap a longitude into `[-180, 180)`
fn wrap_lon(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

prop_compose! {
    /// A rental anywhere on the globe, with facilities scattered close around it
    fn global_scene()(
        lat in prop_oneof![-89.9999f64..89.9999, 89.99f64..89.9999, -89.9999f64..-89.99],
        lon in prop_oneof![-180.0f64..180.0, 179.99f64..180.0, -180.0f64..-179.99],
        offsets in proptest::collection::vec(
            (-0.006f64..0.006, prop_oneof![-0.02f64..0.02, -180.0f64..180.0], 0usize..CATEGORIES.len()),
            0..40,
        ),
    ) -> (Rental, Vec<Facility>) {
        let rental = Rental {
            id: "global".to_string(),
            name: "Building global".to_string(),
            address: "1 Meridian Way".to_string(),
            zip_code: "00000".to_string(),
            rental_type: TYPES[0].to_string(),
            price: 2000.0,
            rating: None,
            latitude: lat,
            longitude: lon,
            laundry_code: 0,
            parking_code: 0,
            pet_code: 0,
            neighborhood_name: "Anywhere".to_string(),
            contact: None,
        };

        let facilities = offsets
            .into_iter()
            .enumerate()
            .map(|(i, (dlat, dlon, category))| Facility {
                facility_id: i.to_string(),
                name: format!("Facility {}", i),
                category: CATEGORIES[category].to_string(),
                latitude: (lat + dlat).clamp(-90.0, 90.0),
                longitude: wrap_lon(lon + dlon),
                zip_code: "00000".to_string(),
            })
            .collect();

        (rental, facilities)
    }
}

/// Full nested-loop join without any pre-filtering
fn naive_pair_count(rentals: &[Rental], facilities: &[Facility], ranks: &CategoryRank) -> usize {
    let mut seen = HashSet::new();
    rentals
        .iter()
        .filter(|r| seen.insert(r.zip_code.clone()))
        .map(|r| {
            facilities
                .iter()
                .filter(|f| ranks.contains(&f.category))
                .filter(|f| {
                    haversine_distance(r.latitude, r.longitude, f.latitude, f.longitude)
                        <= PROXIMITY_CUTOFF_MILES
                })
                .count()
        })
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: distance does not depend on argument order.
    #[test]
    fn distance_is_symmetric(
        lat1 in -80.0f64..80.0, lon1 in -180.0f64..180.0,
        lat2 in -80.0f64..80.0, lon2 in -180.0f64..180.0,
    ) {
        let ab = haversine_distance(lat1, lon1, lat2, lon2);
        let ba = haversine_distance(lat2, lon2, lat1, lon1);
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert!(ab >= 0.0);
    }

    /// Property: a point is at distance zero from itself.
    #[test]
    fn distance_to_self_is_zero(lat in -90.0f64..90.0, lon in -180.0f64..180.0) {
        prop_assert_eq!(haversine_distance(lat, lon, lat, lon), 0.0);
    }

    /// Property: every filtered rental meets all constraints, and refiltering changes nothing.
    #[test]
    fn filter_is_sound_and_idempotent(
        rentals in proptest::collection::vec(rental_strategy(), 0..60),
        prefs in preference_strategy(),
    ) {
        let filtered = filter_rentals(&prefs, &rentals);

        for rental in &filtered {
            prop_assert!(rental.price >= prefs.price_min && rental.price <= prefs.price_max);
            prop_assert_eq!(rental.laundry_code, prefs.laundry_code);
            prop_assert_eq!(rental.parking_code, prefs.parking_code);
            prop_assert_eq!(rental.pet_code, prefs.pet_code);
            prop_assert!(prefs.zip_codes.contains(&rental.zip_code));
            prop_assert!(prefs.rental_types.contains(&rental.rental_type));
        }

        let expected = rentals.iter().filter(|r| matches_preferences(r, &prefs)).count();
        prop_assert_eq!(filtered.len(), expected);
        prop_assert_eq!(filter_rentals(&prefs, &filtered), filtered);
    }

    /// Property: the proximity join keeps exactly the pairs within the cutoff.
    #[test]
    fn proximity_join_matches_full_scan(
        rentals in proptest::collection::vec(rental_strategy(), 1..12),
        facilities in proptest::collection::vec(facility_strategy(), 0..200),
    ) {
        let ranks = category_rank();
        let records = compute_distances(&rentals, &facilities, &ranks);

        for record in &records {
            prop_assert!(record.distance_miles <= PROXIMITY_CUTOFF_MILES);
            prop_assert!(ranks.contains(&record.facility_category));
            prop_assert_eq!(ranks.rank_of(&record.facility_category), Some(record.rank));
        }
        prop_assert_eq!(records.len(), naive_pair_count(&rentals, &facilities, &ranks));
    }

    /// Property: the join still equals the full scan near the antimeridian and the poles.
    #[test]
    fn proximity_join_matches_full_scan_globally((rental, facilities) in global_scene()) {
        let ranks = category_rank();
        let rentals = vec![rental];
        let records = compute_distances(&rentals, &facilities, &ranks);

        prop_assert_eq!(records.len(), naive_pair_count(&rentals, &facilities, &ranks));
    }

    /// Property: the ordering is deterministic, duplicate-free, and covers every zip code.
    #[test]
    fn ordering_is_a_stable_ranking(
        rentals in proptest::collection::vec(rental_strategy(), 1..12),
        facilities in proptest::collection::vec(facility_strategy(), 0..300),
    ) {
        let records = compute_distances(&rentals, &facilities, &category_rank());
        let ordering = get_ordering(&records, 1e-6);

        if records.is_empty() {
            prop_assert!(ordering.is_none());
        } else {
            let ordering = ordering.unwrap();
            let expected: BTreeSet<_> = records.iter().map(|r| r.zip_code.clone()).collect();
            let actual: BTreeSet<_> = ordering.iter().cloned().collect();

            prop_assert_eq!(actual.len(), ordering.len());
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(get_ordering(&records, 1e-6), Some(ordering));
        }
    }
}
