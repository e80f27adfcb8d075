use std::collections::BTreeMap;

use crate::models::{ProximityRecord, RANKED_CATEGORY_COUNT};

/// Upper end of the normalized score scale
pub const MAX_NORMALIZED_SCORE: f64 = 100.0;

/// Facilities of one category near one zip code
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub zip_code: String,
    pub category: String,
    pub rank: u8,
    pub count: usize,
    pub mean_distance: f64,
}

/// Group proximity records by (zip code, category, rank)
///
/// Groups come back sorted by zip code, then category, then rank.
pub fn aggregate_records(records: &[ProximityRecord]) -> Vec<CategoryStats> {
    let mut groups: BTreeMap<(&str, &str, u8), (usize, f64)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry((
                record.zip_code.as_str(),
                record.facility_category.as_str(),
                record.rank,
            ))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.distance_miles;
    }

    groups
        .into_iter()
        .map(|((zip_code, category, rank), (count, total_distance))| CategoryStats {
            zip_code: zip_code.to_string(),
            category: category.to_string(),
            rank,
            count,
            mean_distance: total_distance / count as f64,
        })
        .collect()
}

/// Raw proximity score: more facilities and shorter average distance both raise it
///
/// The mean distance is floored at `epsilon_miles` so a facility sharing the
/// rental's coordinates cannot produce an infinite score.
#[inline]
pub fn raw_score(count: usize, mean_distance: f64, epsilon_miles: f64) -> f64 {
    count as f64 / mean_distance.max(epsilon_miles)
}

/// Rescale values to `[0, 100]`, the maximum mapping to 100
///
/// A single value, or several identical values, all map to 100. Tied zip codes
/// count as jointly best rather than falling out of the sum through 0/0.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if values.len() == 1 || range <= 0.0 {
        return vec![MAX_NORMALIZED_SCORE; values.len()];
    }

    values
        .iter()
        .map(|value| (value - min) / range * MAX_NORMALIZED_SCORE)
        .collect()
}

/// Importance multiplier for a category rank: 1 → 1.0, 2 → 2/3, 3 → 1/3
///
/// Only defined for ranks `1..=3`.
#[inline]
pub fn category_weight(rank: u8) -> f64 {
    let n = RANKED_CATEGORY_COUNT as f64;
    (n + 1.0 - rank as f64) / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(zip_code: &str, category: &str, rank: u8, distance_miles: f64) -> ProximityRecord {
        ProximityRecord {
            zip_code: zip_code.to_string(),
            facility_category: category.to_string(),
            facility_id: format!("{}-{}", zip_code, distance_miles),
            facility_name: "Facility".to_string(),
            latitude: 40.75,
            longitude: -73.99,
            distance_miles,
            rank,
        }
    }

    #[test]
    fn test_category_weight() {
        assert_eq!(category_weight(1), 1.0);
        assert!((category_weight(2) - 0.6667).abs() < 1e-4);
        assert!((category_weight(3) - 0.3333).abs() < 1e-4);
    }

    #[test]
    fn test_aggregate_records() {
        let records = vec![
            record("10024", "Health care", 1, 0.1),
            record("10001", "Health care", 1, 0.2),
            record("10024", "Health care", 1, 0.2),
            record("10024", "Libraries", 3, 0.05),
        ];

        let stats = aggregate_records(&records);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].zip_code, "10001");
        assert_eq!(stats[1].zip_code, "10024");
        assert_eq!(stats[1].category, "Health care");
        assert_eq!(stats[1].count, 2);
        assert!((stats[1].mean_distance - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_raw_score() {
        assert!((raw_score(5, 0.1, 1e-6) - 50.0).abs() < 1e-9);
        assert!((raw_score(1, 0.2, 1e-6) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_raw_score_clamps_zero_distance() {
        let score = raw_score(1, 0.0, 1e-6);
        assert!(score.is_finite());
        assert!((score - 1e6).abs() < 1e-3);
    }

    #[test]
    fn test_min_max_normalize() {
        let normalized = min_max_normalize(&[5.0, 50.0, 27.5]);
        assert_eq!(normalized, vec![0.0, 100.0, 50.0]);
    }

    #[test]
    fn test_min_max_single_value_is_100() {
        assert_eq!(min_max_normalize(&[3.7]), vec![100.0]);
    }

    #[test]
    fn test_min_max_zero_range_is_100() {
        assert_eq!(min_max_normalize(&[2.0, 2.0]), vec![100.0, 100.0]);
    }
}
