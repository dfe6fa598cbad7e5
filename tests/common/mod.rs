//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use voltpath::network::Highway;
use voltpath::placement::{StationLevel, StationPlan};
use voltpath::sim::SimConfig;

/// Bundled Highway 401 sample.
pub fn sample_highway() -> Highway {
    Highway::sample().expect("bundled sample should load")
}

/// One-day run for 2024 demand.
pub fn default_config(seed: u64) -> SimConfig {
    SimConfig::for_year(2024, seed).expect("2024 is a projection year")
}

/// Four stations spread along the sample, mirroring the baseline preset.
pub fn baseline_plan(highway: &Highway) -> StationPlan {
    StationPlan::from_entries(
        highway,
        Some(2_000_000.0),
        [
            (10890, StationLevel::Level3),
            (10915, StationLevel::Level2),
            (10935, StationLevel::Level2),
            (10950, StationLevel::Level1),
        ],
    )
    .expect("baseline plan fits the sample")
}
