//! Coverage, utilization and wait-time metrics of a finished run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::engine::SimOutcome;
use crate::placement::StationLevel;

/// Sentinel for "no data": no cars on a segment or no car charged at a station.
pub const NO_DATA: f64 = -1.0;

/// Per-segment result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentResult {
    pub lhrs: u32,
    pub cars_charged: u64,
    pub cars_not_charged: u64,
    /// Share of appearing cars that got charged, or `-1` without traffic.
    pub coverage: f64,
}

/// Per-station result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationResult {
    pub lhrs: u32,
    pub level: StationLevel,
    pub ports: u32,
    pub cars_charged: u64,
    /// Booked charge time over available port time, in `[0, 1]`.
    pub utilization: f64,
    /// Mean wait before charging (minutes), or `-1` if nobody charged.
    pub average_wait_minutes: f64,
}

/// Report of one simulation run.
///
/// Ratios are rounded to 2 decimals and wait times to 1, matching what the
/// map view displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub year: u16,
    pub seed: u64,
    pub duration_minutes: u32,
    pub segments: Vec<SegmentResult>,
    pub stations: Vec<StationResult>,
    pub cars_charged: u64,
    pub cars_not_charged: u64,
    /// Mean coverage over segments that saw traffic.
    pub mean_coverage: Option<f64>,
    pub mean_utilization: Option<f64>,
    /// Mean wait over stations that charged at least one car.
    pub mean_wait_minutes: Option<f64>,
}

impl SimulationReport {
    /// Computes all metrics from a run outcome.
    pub fn from_outcome(outcome: &SimOutcome) -> Self {
        let config = &outcome.config;
        let count = |map: &BTreeMap<u32, u64>, lhrs: u32| map.get(&lhrs).copied().unwrap_or(0);

        let mut lhrs_seen: Vec<u32> = outcome
            .charged
            .keys()
            .chain(outcome.not_charged.keys())
            .copied()
            .collect();
        lhrs_seen.sort_unstable();
        lhrs_seen.dedup();

        let segments: Vec<SegmentResult> = lhrs_seen
            .into_iter()
            .map(|lhrs| {
                let charged = count(&outcome.charged, lhrs);
                let not_charged = count(&outcome.not_charged, lhrs);
                let total = charged + not_charged;
                let coverage = if total == 0 {
                    NO_DATA
                } else {
                    round_to(charged as f64 / total as f64, 2)
                };
                SegmentResult {
                    lhrs,
                    cars_charged: charged,
                    cars_not_charged: not_charged,
                    coverage,
                }
            })
            .collect();

        let stations: Vec<StationResult> = outcome
            .stations
            .values()
            .map(|st| StationResult {
                lhrs: st.lhrs(),
                level: st.level(),
                ports: st.ports(),
                cars_charged: st.cars_started(),
                utilization: round_to(st.utilization(config.duration_minutes), 2),
                average_wait_minutes: st
                    .average_wait_minutes()
                    .map_or(NO_DATA, |w| round_to(w, 1)),
            })
            .collect();

        let mean_coverage = mean(segments.iter().map(|s| s.coverage).filter(|c| *c >= 0.0));
        let mean_utilization = mean(stations.iter().map(|s| s.utilization));
        let mean_wait_minutes = mean(
            stations
                .iter()
                .map(|s| s.average_wait_minutes)
                .filter(|w| *w >= 0.0),
        );

        Self {
            year: config.year,
            seed: config.seed,
            duration_minutes: config.duration_minutes,
            cars_charged: segments.iter().map(|s| s.cars_charged).sum(),
            cars_not_charged: segments.iter().map(|s| s.cars_not_charged).sum(),
            segments,
            stations,
            mean_coverage,
            mean_utilization,
            mean_wait_minutes,
        }
    }

    /// Coverage per segment, keyed by LHRS.
    pub fn coverage(&self) -> BTreeMap<u32, f64> {
        self.segments.iter().map(|s| (s.lhrs, s.coverage)).collect()
    }

    /// Utilization per station, keyed by LHRS.
    pub fn utilization(&self) -> BTreeMap<u32, f64> {
        self.stations.iter().map(|s| (s.lhrs, s.utilization)).collect()
    }

    /// Average wait per station, keyed by LHRS.
    pub fn wait_times(&self) -> BTreeMap<u32, f64> {
        self.stations
            .iter()
            .map(|s| (s.lhrs, s.average_wait_minutes))
            .collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0_u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

/// Rounds to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Report ---")?;
        writeln!(f, "Year / seed:           {} / {}", self.year, self.seed)?;
        writeln!(f, "Duration:              {} min", self.duration_minutes)?;
        writeln!(f, "Stations:              {}", self.stations.len())?;
        writeln!(f, "Cars charged:          {}", self.cars_charged)?;
        writeln!(f, "Cars not charged:      {}", self.cars_not_charged)?;
        writeln!(f, "Mean coverage:         {}", fmt_opt(self.mean_coverage, 2))?;
        writeln!(f, "Mean utilization:      {}", fmt_opt(self.mean_utilization, 2))?;
        write!(f, "Mean wait time:        {} min", fmt_opt(self.mean_wait_minutes, 1))?;
        for st in &self.stations {
            write!(
                f,
                "\n  station {} ({}): charged {}, utilization {:.2}, wait {:.1} min",
                st.lhrs, st.level, st.cars_charged, st.utilization, st.average_wait_minutes
            )?;
        }
        Ok(())
    }
}
