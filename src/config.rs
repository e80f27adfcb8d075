use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::RankingConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Locations of the reference CSV exports
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    pub rentals: String,
    pub facilities: String,
    /// Pre-aggregated crime clusters; takes precedence over `crime_incidents`
    pub crime_counts: Option<String>,
    /// Raw crime incidents, aggregated at load time
    pub crime_incidents: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_distance_epsilon_miles")]
    pub distance_epsilon_miles: f64,
    #[serde(default = "default_max_listings")]
    pub max_listings: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            distance_epsilon_miles: default_distance_epsilon_miles(),
            max_listings: default_max_listings(),
        }
    }
}

impl From<&RankingSettings> for RankingConfig {
    fn from(settings: &RankingSettings) -> Self {
        Self {
            distance_epsilon_miles: settings.distance_epsilon_miles,
            max_listings: settings.max_listings,
        }
    }
}

fn default_distance_epsilon_miles() -> f64 { 1e-6 }
fn default_max_listings() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RENTAL_RANK)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RENTAL_RANK__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RENTAL_RANK")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
