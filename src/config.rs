//! Configuration Module
//! Layered settings: built-in defaults, an optional TOML file, then `ENERGY_*` env vars.

use crate::data::{ContinentOverrides, OpinionTrend};
use crate::views::{DEFAULT_COVERAGE_THRESHOLD, DEFAULT_WINDOW};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "energy_transition.toml";

pub const FIRST_YEAR: i32 = 1907;
pub const LAST_YEAR: i32 = 2018;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub cleaning: CleaningConfig,
    pub views: ViewConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub plants_path: PathBuf,
    pub opinions_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            plants_path: PathBuf::from("global_power_plant_database.csv"),
            opinions_path: PathBuf::from("public_opinion.csv"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub country: String,
    pub continent: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Seed for imputed years; `None` draws fresh entropy on every run.
    pub seed: Option<u64>,
    /// Appended to the built-in continent overrides.
    pub continent_overrides: Vec<OverrideEntry>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            seed: Some(0),
            continent_overrides: Vec::new(),
        }
    }
}

impl CleaningConfig {
    pub fn overrides(&self) -> ContinentOverrides {
        let mut overrides = ContinentOverrides::default();
        overrides.extend(
            self.continent_overrides
                .iter()
                .map(|e| (e.country.as_str(), e.continent.as_str())),
        );
        overrides
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub coverage_threshold: f64,
    pub moving_average_window: usize,
    /// ISO-3 code of the country shown against the opinion polls.
    pub overlay_country: String,
    pub default_country: Option<String>,
    pub compare_countries: Vec<String>,
    pub end_year: i32,
    /// Opinion trend column headers selected at start-up.
    pub trends: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            moving_average_window: DEFAULT_WINDOW,
            overlay_country: "USA".to_string(),
            default_country: None,
            compare_countries: vec!["United States of America".to_string()],
            end_year: LAST_YEAR,
            trends: vec![OpinionTrend::KnowsAboutClimateChange.column().to_string()],
        }
    }
}

impl ViewConfig {
    /// Configured trends that name a known column; unknown names are ignored.
    pub fn selected_trends(&self) -> Vec<OpinionTrend> {
        OpinionTrend::ALL
            .into_iter()
            .filter(|trend| self.trends.iter().any(|t| t.trim() == trend.column()))
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration. An explicit `path` must exist; otherwise
    /// [`DEFAULT_CONFIG_FILE`] is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: AppConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("ENERGY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let views = &self.views;
        if !(0.0..=1.0).contains(&views.coverage_threshold) {
            return Err(ConfigError::Message(format!(
                "views.coverage_threshold must be within 0..=1, got {}",
                views.coverage_threshold
            )));
        }
        if views.moving_average_window == 0 {
            return Err(ConfigError::Message(
                "views.moving_average_window must be at least 1".to_string(),
            ));
        }
        if !(FIRST_YEAR..=LAST_YEAR).contains(&views.end_year) {
            return Err(ConfigError::Message(format!(
                "views.end_year must be within {FIRST_YEAR}..={LAST_YEAR}, got {}",
                views.end_year
            )));
        }
        Ok(())
    }
}
