//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use voltpath::config::{ConfigError, ScenarioConfig};

#[derive(Debug, Parser)]
#[command(name = "voltpath")]
#[command(about = "EV charging station placement simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the scenario comes from. Defaults to the `baseline` preset.
#[derive(Debug, Clone, Args)]
pub struct ScenarioArgs {
    /// Load scenario from a TOML file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, growth_2034, horizon_2049)
    #[arg(long)]
    pub preset: Option<String>,

    /// Segment CSV to use instead of the scenario's or the bundled sample
    #[arg(long)]
    pub segments: Option<PathBuf>,
}

impl ScenarioArgs {
    /// Loads the selected scenario and applies `--segments`.
    pub fn load(&self) -> Result<ScenarioConfig, ConfigError> {
        let mut scenario = match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::baseline(),
        };
        if let Some(path) = &self.segments {
            scenario.data.segments = Some(path.clone());
        }
        Ok(scenario)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate the scenario's station plan and print the report
    Simulate {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the demand projection year
        #[arg(long)]
        year: Option<u16>,

        /// Write per-segment results to CSV
        #[arg(long)]
        results_out: Option<PathBuf>,

        /// Write the per-car event log to CSV
        #[arg(long)]
        event_log: Option<PathBuf>,
    },

    /// Place stations within a budget, keeping the scenario's stations
    Optimize {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Construction budget
        #[arg(long)]
        budget: f64,

        /// Count existing DC fast chargers as free capacity
        #[arg(long)]
        existing: bool,
    },

    /// Start the web server
    #[cfg(feature = "web")]
    Serve {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Listen address, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
}
