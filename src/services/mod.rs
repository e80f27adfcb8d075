// Service exports
pub mod datasets;

pub use datasets::{aggregate_crime_counts, read_csv, DatasetError, Datasets, FilterOptions};
