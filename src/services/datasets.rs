use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DataSettings;
use crate::models::{CrimeCount, CrimeIncident, Facility, Rental};

/// Errors that can occur while loading reference data
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed row {row} in {}: {source}", .path.display())]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("no crime data configured: set data.crime_counts or data.crime_incidents")]
    MissingCrimeSource,
}

/// Read-only snapshot of the reference collections, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub rentals: Vec<Rental>,
    pub facilities: Vec<Facility>,
    pub crime_counts: Vec<CrimeCount>,
}

impl Datasets {
    /// Load every collection from the configured CSV files
    pub fn load(settings: &DataSettings) -> Result<Self, DatasetError> {
        let rentals: Vec<Rental> = read_csv(&settings.rentals)?;
        tracing::info!("Loaded {} rentals from {}", rentals.len(), settings.rentals);

        let facilities = dedup_facilities(read_csv(&settings.facilities)?);
        tracing::info!("Loaded {} facilities from {}", facilities.len(), settings.facilities);

        let crime_counts = match (&settings.crime_counts, &settings.crime_incidents) {
            (Some(path), _) => read_csv(path)?,
            (None, Some(path)) => {
                let incidents: Vec<CrimeIncident> = read_csv(path)?;
                tracing::info!("Aggregating {} crime incidents from {}", incidents.len(), path);
                aggregate_crime_counts(&incidents)
            }
            (None, None) => return Err(DatasetError::MissingCrimeSource),
        };
        tracing::info!("Loaded {} crime clusters", crime_counts.len());

        Ok(Self {
            rentals,
            facilities,
            crime_counts,
        })
    }
}

/// Deserialize every row of a headed CSV file
pub fn read_csv<T, P>(path: P) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|source| DatasetError::Row {
                path: path.to_path_buf(),
                // 1-based, after the header line
                row: i + 2,
                source,
            })
        })
        .collect()
}

/// Drop facilities that repeat an earlier row exactly
pub fn dedup_facilities(facilities: Vec<Facility>) -> Vec<Facility> {
    let before = facilities.len();
    let mut seen = HashSet::new();

    let unique: Vec<Facility> = facilities
        .into_iter()
        .filter(|f| {
            seen.insert((
                f.facility_id.clone(),
                f.name.clone(),
                f.category.clone(),
                f.latitude.to_bits(),
                f.longitude.to_bits(),
                f.zip_code.clone(),
            ))
        })
        .collect();

    if unique.len() < before {
        tracing::debug!("Dropped {} duplicate facilities", before - unique.len());
    }

    unique
}

/// Count incidents per (neighborhood, latitude, longitude) cluster, busiest first
pub fn aggregate_crime_counts(incidents: &[CrimeIncident]) -> Vec<CrimeCount> {
    let mut counts: HashMap<(&str, u64, u64), u32> = HashMap::new();
    for incident in incidents {
        *counts
            .entry((
                incident.neighborhood_name.as_str(),
                incident.latitude.to_bits(),
                incident.longitude.to_bits(),
            ))
            .or_insert(0) += 1;
    }

    let mut clusters: Vec<CrimeCount> = counts
        .into_iter()
        .map(|((neighborhood, lat, lon), count)| CrimeCount {
            neighborhood_name: neighborhood.to_string(),
            latitude: f64::from_bits(lat),
            longitude: f64::from_bits(lon),
            count,
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.neighborhood_name.cmp(&b.neighborhood_name))
            .then_with(|| a.latitude.total_cmp(&b.latitude))
            .then_with(|| a.longitude.total_cmp(&b.longitude))
    });

    clusters
}

/// Choices a preference form can offer, derived from the loaded data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub zip_codes: Vec<String>,
    pub rental_types: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl FilterOptions {
    pub fn from_datasets(datasets: &Datasets) -> Self {
        let categories: BTreeSet<&str> = datasets.facilities.iter().map(|f| f.category.as_str()).collect();
        let zip_codes: BTreeSet<&str> = datasets.rentals.iter().map(|r| r.zip_code.as_str()).collect();
        let rental_types: BTreeSet<&str> = datasets.rentals.iter().map(|r| r.rental_type.as_str()).collect();

        let prices = datasets.rentals.iter().map(|r| r.price);
        let price_min = prices.clone().reduce(f64::min);
        let price_max = prices.reduce(f64::max);

        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
            zip_codes: zip_codes.into_iter().map(str::to_string).collect(),
            rental_types: rental_types.into_iter().map(str::to_string).collect(),
            price_min,
            price_max,
        }
    }
}
