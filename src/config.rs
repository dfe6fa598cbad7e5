//! TOML-based scenario configuration and preset definitions.

use std::collections::BTreeSet;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::network::{DataError, ExistingChargers, Highway};
use crate::placement::{PlanError, StationLevel, StationPlan};
use crate::sim::types::{MINUTES_PER_DAY, SimConfig, year_scale};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation run parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Stations placed before the run and the budget they draw on.
    #[serde(default)]
    pub placement: PlacementConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Segment dataset location.
    #[serde(default)]
    pub data: DataConfig,
}

/// Simulation run parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// Demand projection year (2024, 2029, ..., 2049).
    pub year: u16,
    /// Length of the run in minutes (must be > 0).
    pub duration_minutes: u32,
    /// Driving speed (km/h).
    pub speed_kmh: f64,
    /// Mean charging session (minutes).
    pub charge_minutes_mean: f64,
    /// Charging session standard deviation (minutes).
    pub charge_minutes_std: f64,
    /// Maximum distance a driver will go for a charge (km).
    pub range_km: f64,
    /// Keep the per-car event log.
    pub record_events: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            year: 2024,
            duration_minutes: MINUTES_PER_DAY,
            speed_kmh: 100.0,
            charge_minutes_mean: 20.0,
            charge_minutes_std: 5.0,
            range_km: 40.0,
            record_events: false,
        }
    }
}

/// Stations and budget.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Construction budget; unlimited when absent.
    pub budget: Option<f64>,
    pub stations: Vec<StationEntry>,
}

/// A `[[placement.stations]]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationEntry {
    pub lhrs: u32,
    /// Station level 1, 2 or 3.
    pub level: u8,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Dataset locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Segment CSV; the bundled Highway 401 sample when absent.
    pub segments: Option<PathBuf>,
    /// Alternative fuel station CSV; the bundled sample when absent.
    pub existing_stations: Option<PathBuf>,
}

/// Longest run accepted: one week.
pub const MAX_DURATION_MINUTES: u32 = 7 * MINUTES_PER_DAY;
/// Fastest driving speed accepted (km/h).
pub const MAX_SPEED_KMH: f64 = 300.0;
/// Upper bound for the charge session mean and standard deviation (minutes).
pub const MAX_CHARGE_MINUTES: f64 = 1440.0;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.year"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn stations(entries: &[(u32, u8)]) -> Vec<StationEntry> {
    entries
        .iter()
        .map(|&(lhrs, level)| StationEntry { lhrs, level })
        .collect()
}

impl ScenarioConfig {
    /// Returns the baseline scenario: four stations across the corridor, 2024 demand.
    pub fn baseline() -> Self {
        Self {
            placement: PlacementConfig {
                budget: Some(2_000_000.0),
                stations: stations(&[(10890, 3), (10915, 2), (10935, 2), (10950, 1)]),
            },
            ..Self::default()
        }
    }

    /// Returns the 2034 growth preset: denser network sized for 2034 demand.
    pub fn growth_2034() -> Self {
        Self {
            simulation: SimulationConfig {
                year: 2034,
                ..SimulationConfig::default()
            },
            placement: PlacementConfig {
                budget: Some(4_000_000.0),
                stations: stations(&[
                    (10890, 3),
                    (10900, 3),
                    (10915, 2),
                    (10925, 2),
                    (10935, 2),
                    (10945, 2),
                    (10950, 1),
                ]),
            },
            ..Self::default()
        }
    }

    /// Returns the 2049 horizon preset: level 3 stations at every other site, no budget cap.
    pub fn horizon_2049() -> Self {
        Self {
            simulation: SimulationConfig {
                year: 2049,
                ..SimulationConfig::default()
            },
            placement: PlacementConfig {
                budget: None,
                stations: stations(&[
                    (10880, 3),
                    (10890, 3),
                    (10900, 3),
                    (10910, 3),
                    (10920, 3),
                    (10930, 3),
                    (10940, 3),
                    (10950, 3),
                ]),
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "growth_2034", "horizon_2049"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "growth_2034" => Ok(Self::growth_2034()),
            "horizon_2049" => Ok(Self::horizon_2049()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Station LHRS
    /// numbers and costs are checked later against the dataset by
    /// [`ScenarioConfig::station_plan`].
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if year_scale(s.year).is_none() {
            errors.push(ConfigError::new(
                "simulation.year",
                format!("no demand projection for {}", s.year),
            ));
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&s.duration_minutes) {
            errors.push(ConfigError::new(
                "simulation.duration_minutes",
                format!("must be in 1..={MAX_DURATION_MINUTES}"),
            ));
        }
        if !(s.speed_kmh > 0.0 && s.speed_kmh <= MAX_SPEED_KMH) {
            errors.push(ConfigError::new(
                "simulation.speed_kmh",
                format!("must be in (0, {MAX_SPEED_KMH}]"),
            ));
        }
        if !(s.charge_minutes_mean > 0.0 && s.charge_minutes_mean <= MAX_CHARGE_MINUTES) {
            errors.push(ConfigError::new(
                "simulation.charge_minutes_mean",
                format!("must be in (0, {MAX_CHARGE_MINUTES}]"),
            ));
        }
        if !(s.charge_minutes_std >= 0.0 && s.charge_minutes_std <= MAX_CHARGE_MINUTES) {
            errors.push(ConfigError::new(
                "simulation.charge_minutes_std",
                format!("must be in [0, {MAX_CHARGE_MINUTES}]"),
            ));
        }
        if !(s.range_km > 0.0) {
            errors.push(ConfigError::new("simulation.range_km", "must be > 0"));
        }

        let p = &self.placement;
        if let Some(budget) = p.budget {
            if !(budget >= 0.0) {
                errors.push(ConfigError::new("placement.budget", "must be >= 0"));
            }
        }
        let mut seen = BTreeSet::new();
        for (i, entry) in p.stations.iter().enumerate() {
            if StationLevel::from_index(entry.level).is_err() {
                errors.push(ConfigError::new(
                    format!("placement.stations[{i}].level"),
                    format!("must be 1, 2 or 3, got {}", entry.level),
                ));
            }
            if !seen.insert(entry.lhrs) {
                errors.push(ConfigError::new(
                    format!("placement.stations[{i}].lhrs"),
                    format!("segment {} listed more than once", entry.lhrs),
                ));
            }
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            errors.push(ConfigError::new(
                "server.bind",
                format!("\"{}\" is not a socket address", self.server.bind),
            ));
        }

        errors
    }

    /// Simulation parameters for this scenario.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the year has no demand projection.
    pub fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let s = &self.simulation;
        let base = SimConfig::for_year(s.year, s.seed)
            .map_err(|e| ConfigError::new("simulation.year", e.to_string()))?;
        Ok(SimConfig {
            duration_minutes: s.duration_minutes,
            speed_kmh: s.speed_kmh,
            charge_minutes_mean: s.charge_minutes_mean,
            charge_minutes_std: s.charge_minutes_std,
            range_km: s.range_km,
            record_events: s.record_events,
            ..base
        })
    }

    /// Loads the configured segment dataset, or the bundled sample.
    pub fn load_highway(&self) -> Result<Highway, DataError> {
        match &self.data.segments {
            Some(path) => Highway::from_csv(path),
            None => Highway::sample(),
        }
    }

    /// Loads the configured existing chargers, or the bundled sample, and
    /// snaps them onto `highway`.
    pub fn load_existing(&self, highway: &Highway) -> Result<ExistingChargers, DataError> {
        match &self.data.existing_stations {
            Some(path) => ExistingChargers::from_csv(highway, path),
            None => ExistingChargers::sample(highway),
        }
    }

    /// Builds the configured station plan against a highway.
    pub fn station_plan(&self, highway: &Highway) -> Result<StationPlan, PlanError> {
        let mut plan = StationPlan::new(self.placement.budget);
        for entry in &self.placement.stations {
            plan.add(highway, entry.lhrs, StationLevel::from_index(entry.level)?)?;
        }
        Ok(plan)
    }
}
