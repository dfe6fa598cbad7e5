use std::collections::BTreeMap;

use serde::Serialize;

use super::level::StationLevel;
use crate::network::Highway;

/// Tolerance for floating-point budget comparisons.
const BUDGET_EPSILON: f64 = 1e-6;

/// Errors raised while building a station plan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("unknown segment LHRS {0}")]
    UnknownSegment(u32),
    #[error("invalid station level {0}, expected 1, 2 or 3")]
    InvalidLevel(u8),
    #[error("segment {0} already has a station")]
    AlreadyPlaced(u32),
    #[error("segment {0} has no station to remove")]
    NotPlaced(u32),
    #[error("station at {lhrs} costs {cost:.0} but only {remaining:.0} of the budget remains")]
    OverBudget { lhrs: u32, cost: f64, remaining: f64 },
    #[error("malformed station entry \"{0}\", expected LHRS:level")]
    Malformed(String),
}

/// Stations placed on a highway, at most one per segment.
///
/// Keeps the running build cost and refuses additions that would push it
/// past the budget, if one is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationPlan {
    stations: BTreeMap<u32, StationLevel>,
    budget: Option<f64>,
    cumulative_cost: f64,
}

impl StationPlan {
    pub fn new(budget: Option<f64>) -> Self {
        Self {
            stations: BTreeMap::new(),
            budget,
            cumulative_cost: 0.0,
        }
    }

    /// A plan without a budget limit.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Places a station and returns its build cost.
    ///
    /// # Errors
    ///
    /// * `UnknownSegment` - `lhrs` is not on the highway
    /// * `AlreadyPlaced` - the segment already has a station
    /// * `OverBudget` - the cost exceeds the remaining budget
    pub fn add(
        &mut self,
        highway: &Highway,
        lhrs: u32,
        level: StationLevel,
    ) -> Result<f64, PlanError> {
        let segment = highway.get(lhrs).ok_or(PlanError::UnknownSegment(lhrs))?;
        if self.stations.contains_key(&lhrs) {
            return Err(PlanError::AlreadyPlaced(lhrs));
        }

        let cost = segment.cost(level);
        if let Some(remaining) = self.remaining_budget() {
            if cost > remaining + BUDGET_EPSILON {
                return Err(PlanError::OverBudget {
                    lhrs,
                    cost,
                    remaining,
                });
            }
        }

        self.stations.insert(lhrs, level);
        self.cumulative_cost += cost;
        Ok(cost)
    }

    /// Removes a station, refunding its cost, and returns its level.
    pub fn remove(&mut self, highway: &Highway, lhrs: u32) -> Result<StationLevel, PlanError> {
        let segment = highway.get(lhrs).ok_or(PlanError::UnknownSegment(lhrs))?;
        let level = self
            .stations
            .remove(&lhrs)
            .ok_or(PlanError::NotPlaced(lhrs))?;
        self.cumulative_cost = (self.cumulative_cost - segment.cost(level)).max(0.0);
        Ok(level)
    }

    /// Builds a plan from `(lhrs, level)` entries, checked in order.
    pub fn from_entries(
        highway: &Highway,
        budget: Option<f64>,
        entries: impl IntoIterator<Item = (u32, StationLevel)>,
    ) -> Result<Self, PlanError> {
        let mut plan = Self::new(budget);
        for (lhrs, level) in entries {
            plan.add(highway, lhrs, level)?;
        }
        Ok(plan)
    }

    /// Parses a station list such as `"10890:3, 10915:2"`.
    ///
    /// Empty entries are skipped, so a blank string yields no stations.
    ///
    /// # Examples
    ///
    /// ```
    /// use voltpath::placement::{StationLevel, StationPlan};
    ///
    /// let entries = StationPlan::parse_stations("10890:3,10915:2").unwrap();
    /// assert_eq!(entries, vec![(10890, StationLevel::Level3), (10915, StationLevel::Level2)]);
    /// ```
    pub fn parse_stations(input: &str) -> Result<Vec<(u32, StationLevel)>, PlanError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let malformed = || PlanError::Malformed(entry.to_string());
                let (lhrs, level) = entry.split_once(':').ok_or_else(malformed)?;
                let lhrs = lhrs.trim().parse::<u32>().map_err(|_| malformed())?;
                let level = level.trim().parse::<u8>().map_err(|_| malformed())?;
                Ok((lhrs, StationLevel::from_index(level)?))
            })
            .collect()
    }

    /// Inverse of [`StationPlan::parse_stations`].
    pub fn to_query(&self) -> String {
        self.stations
            .iter()
            .map(|(lhrs, level)| format!("{lhrs}:{}", level.index()))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn level(&self, lhrs: u32) -> Option<StationLevel> {
        self.stations.get(&lhrs).copied()
    }

    pub fn contains(&self, lhrs: u32) -> bool {
        self.stations.contains_key(&lhrs)
    }

    /// Stations in LHRS order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, StationLevel)> + '_ {
        self.stations.iter().map(|(&lhrs, &level)| (lhrs, level))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn budget(&self) -> Option<f64> {
        self.budget
    }

    pub fn cumulative_cost(&self) -> f64 {
        self.cumulative_cost
    }

    /// Budget left to spend, `None` when unlimited.
    pub fn remaining_budget(&self) -> Option<f64> {
        self.budget.map(|b| (b - self.cumulative_cost).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highway() -> Highway {
        Highway::sample().expect("sample")
    }

    #[test]
    fn add_tracks_cost() {
        let hwy = highway();
        let mut plan = StationPlan::new(Some(1_000_000.0));
        let cost = plan.add(&hwy, 10890, StationLevel::Level3).expect("fits");
        assert_eq!(cost, 640_000.0);
        assert_eq!(plan.cumulative_cost(), 640_000.0);
        assert_eq!(plan.remaining_budget(), Some(360_000.0));
    }

    #[test]
    fn add_rejects_over_budget() {
        let hwy = highway();
        let mut plan = StationPlan::new(Some(500_000.0));
        let err = plan.add(&hwy, 10890, StationLevel::Level3).unwrap_err();
        assert!(matches!(err, PlanError::OverBudget { lhrs: 10890, .. }));
        assert!(plan.is_empty());
        assert_eq!(plan.cumulative_cost(), 0.0);
    }

    #[test]
    fn add_rejects_second_station_on_same_site() {
        let hwy = highway();
        let mut plan = StationPlan::unlimited();
        plan.add(&hwy, 10915, StationLevel::Level1).expect("first");
        assert_eq!(
            plan.add(&hwy, 10915, StationLevel::Level2),
            Err(PlanError::AlreadyPlaced(10915))
        );
    }

    #[test]
    fn add_rejects_unknown_segment() {
        let mut plan = StationPlan::unlimited();
        assert_eq!(
            plan.add(&highway(), 1, StationLevel::Level1),
            Err(PlanError::UnknownSegment(1))
        );
    }

    #[test]
    fn remove_refunds_cost() {
        let hwy = highway();
        let mut plan = StationPlan::new(Some(300_000.0));
        plan.add(&hwy, 10915, StationLevel::Level2).expect("fits");
        assert_eq!(plan.remove(&hwy, 10915), Ok(StationLevel::Level2));
        assert_eq!(plan.remaining_budget(), Some(300_000.0));
        assert_eq!(plan.remove(&hwy, 10915), Err(PlanError::NotPlaced(10915)));
    }

    #[test]
    fn parse_stations_accepts_whitespace_and_blanks() {
        let entries = StationPlan::parse_stations(" 10890 : 1 ,, 10900:2 ").expect("parse");
        assert_eq!(
            entries,
            vec![(10890, StationLevel::Level1), (10900, StationLevel::Level2)]
        );
        assert_eq!(StationPlan::parse_stations("").expect("empty"), vec![]);
    }

    #[test]
    fn parse_stations_rejects_garbage() {
        assert_eq!(
            StationPlan::parse_stations("10890"),
            Err(PlanError::Malformed("10890".into()))
        );
        assert_eq!(
            StationPlan::parse_stations("10890:9"),
            Err(PlanError::InvalidLevel(9))
        );
    }

    #[test]
    fn query_round_trips_through_parser() {
        let hwy = highway();
        let plan = StationPlan::from_entries(
            &hwy,
            None,
            [(10950, StationLevel::Level1), (10890, StationLevel::Level3)],
        )
        .expect("plan");
        assert_eq!(plan.to_query(), "10890:3,10950:1");
        let again = StationPlan::from_entries(
            &hwy,
            None,
            StationPlan::parse_stations(&plan.to_query()).expect("parse"),
        )
        .expect("plan");
        assert_eq!(again, plan);
    }
}
