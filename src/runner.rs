//! One-call simulation of a station plan, shared by the CLI and the web layer.

use serde::Serialize;

use crate::network::Highway;
use crate::placement::StationPlan;
use crate::sim::{CoverageBand, Engine, SimConfig, SimEvent, SimulationReport, coverage_bands};

/// Report, map bands and (optionally) the event log of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub report: SimulationReport,
    pub bands: Vec<CoverageBand>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SimEvent>,
}

/// Simulates `plan` on `highway` and derives the report and coverage bands.
pub fn simulate_plan(highway: &Highway, plan: &StationPlan, config: &SimConfig) -> SimulationRun {
    let outcome = Engine::new(config.clone(), highway, plan).run();
    let report = SimulationReport::from_outcome(&outcome);
    let bands = coverage_bands(&report.coverage());

    tracing::info!(
        year = config.year,
        seed = config.seed,
        stations = plan.len(),
        charged = report.cars_charged,
        not_charged = report.cars_not_charged,
        "simulation finished"
    );

    SimulationRun {
        report,
        bands,
        events: outcome.events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::StationLevel;

    #[test]
    fn bands_cover_every_segment() {
        let hwy = Highway::sample().expect("sample");
        let plan = StationPlan::from_entries(&hwy, None, [(10915, StationLevel::Level2)])
            .expect("plan");
        let cfg = SimConfig::for_year(2024, 42).expect("config");

        let run = simulate_plan(&hwy, &plan, &cfg);
        assert_eq!(run.report.segments.len(), hwy.len());
        let mut banded: Vec<u32> = run.bands.iter().flat_map(|b| b.segments.clone()).collect();
        banded.sort_unstable();
        banded.dedup();
        assert_eq!(banded.len(), hwy.len());
        assert!(run.events.is_empty());
    }
}
