use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::proximity::compute_distances;
use crate::core::scoring::{aggregate_records, category_weight, min_max_normalize, raw_score};
use crate::models::{CategoryRank, Facility, ProximityRecord, Rental, ZipScore};

/// Score every zip code in the proximity records, best first
///
/// For each category the raw scores (`count / mean distance`) are min-max
/// normalized across the zip codes that have that category, weighted by the
/// category's rank and summed per zip code. A zip code missing a category gets
/// nothing for it. Equal totals are ordered by zip code.
pub fn score_zip_codes(records: &[ProximityRecord], epsilon_miles: f64) -> Vec<ZipScore> {
    let stats = aggregate_records(records);

    let mut by_category: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, group) in stats.iter().enumerate() {
        by_category.entry(group.category.as_str()).or_default().push(i);
    }

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for indices in by_category.values() {
        let raw: Vec<f64> = indices
            .iter()
            .map(|&i| raw_score(stats[i].count, stats[i].mean_distance, epsilon_miles))
            .collect();

        for (&i, normalized) in indices.iter().zip(min_max_normalize(&raw)) {
            let group = &stats[i];
            *totals.entry(group.zip_code.as_str()).or_insert(0.0) +=
                normalized * category_weight(group.rank);
        }
    }

    let mut scores: Vec<ZipScore> = totals
        .into_iter()
        .map(|(zip_code, score)| ZipScore {
            zip_code: zip_code.to_string(),
            score,
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.zip_code.cmp(&b.zip_code))
    });

    scores
}

/// Order zip codes from best to worst
///
/// Returns `None` when there are no records, so no ordering is possible.
/// A single zip code is returned as-is without scoring.
pub fn get_ordering(records: &[ProximityRecord], epsilon_miles: f64) -> Option<Vec<String>> {
    if records.is_empty() {
        return None;
    }

    let zip_codes: BTreeSet<&str> = records.iter().map(|r| r.zip_code.as_str()).collect();
    if zip_codes.len() == 1 {
        return Some(zip_codes.into_iter().map(str::to_string).collect());
    }

    let ordering = score_zip_codes(records, epsilon_miles)
        .into_iter()
        .map(|score| score.zip_code)
        .collect();

    Some(ordering)
}

/// Rank the zip codes of already-filtered rentals against the user's categories
///
/// Facilities outside the ranked categories are ignored.
pub fn rank(
    filtered_rentals: &[Rental],
    facilities: &[Facility],
    category_rank: &CategoryRank,
    epsilon_miles: f64,
) -> Option<Vec<String>> {
    let records = compute_distances(filtered_rentals, facilities, category_rank);
    get_ordering(&records, epsilon_miles)
}
