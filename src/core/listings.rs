use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::distance::distance_between;
use crate::models::{CrimeCount, RankedListing, Rental};

/// A rental joined to the nearest crime cluster of its neighborhood
struct Candidate<'a> {
    position: usize,
    rental: &'a Rental,
    zip_rank: Option<usize>,
    crime_distance: f64,
    crime_count: u32,
}

#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Higher ratings first, unrated listings last
#[inline]
fn cmp_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_f64(b, a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ranked zip codes first (best first), unranked ones after
#[inline]
fn cmp_zip_rank(a: Option<usize>, b: Option<usize>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Cheaper first, then better rated
#[inline]
fn cmp_price_rating(a: &Rental, b: &Rental) -> Ordering {
    cmp_f64(a.price, b.price).then_with(|| cmp_rating_desc(a.rating, b.rating))
}

/// Which of two rows of the same listing to keep
fn cmp_duplicates(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    cmp_f64(a.crime_distance, b.crime_distance)
        .then_with(|| a.crime_count.cmp(&b.crime_count))
        .then_with(|| cmp_price_rating(a.rental, b.rental))
        .then_with(|| a.position.cmp(&b.position))
}

/// Turn the zip code ordering into the final list of listings, best first
///
/// Each rental is joined to the crime clusters of its neighborhood and keeps the
/// nearest one; rentals whose neighborhood has no crime data are dropped.
/// Rows of the same listing (same name and address) collapse to the one with
/// the nearest, then smallest, crime count. The result is sorted by zip code
/// position, crime count, price, and rating (highest first).
pub fn order_listings(
    zip_order: &[String],
    filtered_rentals: &[Rental],
    crime_counts: &[CrimeCount],
) -> Vec<RankedListing> {
    let zip_positions: HashMap<&str, usize> = zip_order
        .iter()
        .enumerate()
        .map(|(i, zip_code)| (zip_code.as_str(), i))
        .collect();

    let mut clusters: HashMap<&str, Vec<&CrimeCount>> = HashMap::new();
    for crime in crime_counts {
        clusters.entry(crime.neighborhood_name.as_str()).or_default().push(crime);
    }

    let mut best: HashMap<(&str, &str), Candidate<'_>> = HashMap::new();
    let mut unmatched = 0usize;

    for (position, rental) in filtered_rentals.iter().enumerate() {
        let Some(neighborhood) = clusters.get(rental.neighborhood_name.as_str()) else {
            unmatched += 1;
            continue;
        };

        let nearest = neighborhood
            .iter()
            .map(|crime| (distance_between(rental.location(), crime.location()), crime.count))
            .min_by(|a, b| cmp_f64(a.0, b.0).then_with(|| a.1.cmp(&b.1)));

        let Some((crime_distance, crime_count)) = nearest else {
            unmatched += 1;
            continue;
        };

        let candidate = Candidate {
            position,
            rental,
            zip_rank: zip_positions.get(rental.zip_code.as_str()).copied(),
            crime_distance,
            crime_count,
        };

        let key = (rental.name.as_str(), rental.address.as_str());
        let replace = best
            .get(&key)
            .map_or(true, |existing| cmp_duplicates(&candidate, existing) == Ordering::Less);
        if replace {
            best.insert(key, candidate);
        }
    }

    if unmatched > 0 {
        tracing::debug!("{} rentals had no crime data for their neighborhood", unmatched);
    }

    let mut candidates: Vec<Candidate<'_>> = best.into_values().collect();
    candidates.sort_by(|a, b| {
        cmp_zip_rank(a.zip_rank, b.zip_rank)
            .then_with(|| a.crime_count.cmp(&b.crime_count))
            .then_with(|| cmp_price_rating(a.rental, b.rental))
            .then_with(|| a.position.cmp(&b.position))
    });

    candidates
        .into_iter()
        .map(|candidate| RankedListing {
            rental: candidate.rental.clone(),
            zip_rank: candidate.zip_rank,
            crime_count: Some(candidate.crime_count),
        })
        .collect()
}

/// Default listing order when no zip code ranking is possible: cheapest first, then best rated
pub fn default_listing_order(rentals: &[Rental]) -> Vec<Rental> {
    let mut sorted = rentals.to_vec();
    sorted.sort_by(cmp_price_rating);
    sorted
}
