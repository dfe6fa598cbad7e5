//! Greedy budgeted placement.
//!
//! Approximates the maximum-coverage placement problem: choose at most one
//! station level per segment so that the demand served by stations within
//! range is as large as possible while the total build cost stays within the
//! budget. Each step adds the affordable candidate with the best marginal
//! coverage per unit cost.

use std::collections::BTreeMap;

use serde::Serialize;

use super::level::StationLevel;
use super::plan::{PlanError, StationPlan};
use crate::network::{ExistingChargers, Highway};

/// Gains below this are treated as no improvement.
const GAIN_EPSILON: f64 = 1e-9;

/// Result of [`optimize`].
#[derive(Debug, Clone, Serialize)]
pub struct Optimization {
    pub plan: StationPlan,
    /// Demand served by the plan (cars/day).
    pub covered_demand: f64,
    /// Demand of the whole highway (cars/day).
    pub total_demand: f64,
}

impl Optimization {
    /// Share of total demand the plan serves, in `[0, 1]`.
    pub fn coverage_ratio(&self) -> f64 {
        if self.total_demand > 0.0 {
            self.covered_demand / self.total_demand
        } else {
            0.0
        }
    }
}

/// Demand (cars/day) served by a plan together with existing chargers.
///
/// Each segment sends its demand to in-range sites nearest first, spilling
/// to the next one once a site's daily capacity is used up. A site is a
/// planned station, existing DC fast ports, or both. Segments are processed
/// in highway order.
pub fn covered_demand(
    highway: &Highway,
    plan: &StationPlan,
    existing: &ExistingChargers,
    range_km: f64,
) -> f64 {
    let mut capacity: BTreeMap<u32, f64> = plan
        .iter()
        .map(|(lhrs, level)| (lhrs, level.daily_capacity()))
        .collect();
    for (lhrs, extra) in existing.daily_capacity() {
        if highway.contains(lhrs) {
            *capacity.entry(lhrs).or_insert(0.0) += extra;
        }
    }

    let mut covered = 0.0;
    for seg in highway.segments() {
        let mut nearest: Vec<(u32, f64)> = capacity
            .keys()
            .filter_map(|&site| {
                let d = highway.distance_km(seg.lhrs, site)?;
                (d <= range_km).then_some((site, d))
            })
            .collect();
        nearest.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut unserved = seg.demand_per_day;
        for (site, _) in nearest {
            if unserved <= 0.0 {
                break;
            }
            if let Some(left) = capacity.get_mut(&site) {
                let served = unserved.min(*left);
                *left -= served;
                unserved -= served;
                covered += served;
            }
        }
    }
    covered
}

/// Places stations greedily within `budget`.
///
/// Stations in `fixed` are kept and paid for first. Candidates are every
/// free segment at every level; the one with the highest coverage gain per
/// unit cost that still fits is added, until no affordable candidate adds
/// coverage. Existing chargers serve demand for free, so the optimizer
/// builds around them.
///
/// # Errors
///
/// Returns a `PlanError` if the fixed stations alone do not fit the budget
/// or reference unknown segments.
pub fn optimize(
    highway: &Highway,
    budget: f64,
    fixed: &StationPlan,
    existing: &ExistingChargers,
    range_km: f64,
) -> Result<Optimization, PlanError> {
    let mut plan = StationPlan::from_entries(highway, Some(budget), fixed.iter())?;
    let mut current = covered_demand(highway, &plan, existing, range_km);

    loop {
        let remaining = plan.remaining_budget().unwrap_or(f64::INFINITY);
        let mut best: Option<(u32, StationLevel, f64, f64)> = None;

        for seg in highway.segments() {
            if plan.contains(seg.lhrs) {
                continue;
            }
            for level in StationLevel::ALL {
                let cost = seg.cost(level);
                if cost > remaining {
                    continue;
                }
                let mut trial = plan.clone();
                if trial.add(highway, seg.lhrs, level).is_err() {
                    continue;
                }
                let gain = covered_demand(highway, &trial, existing, range_km) - current;
                if gain <= GAIN_EPSILON {
                    continue;
                }
                let ratio = if cost > 0.0 { gain / cost } else { f64::INFINITY };
                if best.is_none_or(|(_, _, _, best_ratio)| ratio > best_ratio) {
                    best = Some((seg.lhrs, level, gain, ratio));
                }
            }
        }

        let Some((lhrs, level, gain, _)) = best else {
            break;
        };
        plan.add(highway, lhrs, level)?;
        current += gain;
        tracing::debug!(lhrs, %level, gain, covered = current, "optimizer placed station");
    }

    tracing::info!(
        stations = plan.len(),
        cost = plan.cumulative_cost(),
        covered = current,
        "placement optimized"
    );

    Ok(Optimization {
        covered_demand: current,
        total_demand: highway.total_demand(),
        plan,
    })
}
