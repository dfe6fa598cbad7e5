//! Simulation configuration, demand projections and event records.

use std::fmt;

use serde::Serialize;

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Charging demand multiplier relative to 2024, per projection year.
const YEAR_SCALES: [(u16, f64); 6] = [
    (2024, 1.0),
    (2029, 4.12),
    (2034, 7.24),
    (2039, 10.36),
    (2044, 13.48),
    (2049, 16.6),
];

/// A year outside the demand projection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no demand projection for year {0}, expected one of 2024, 2029, 2034, 2039, 2044, 2049")]
pub struct UnknownYear(pub u16);

/// Demand multiplier for a projection year.
///
/// # Examples
///
/// ```
/// use voltpath::sim::types::year_scale;
///
/// assert_eq!(year_scale(2024), Some(1.0));
/// assert_eq!(year_scale(2049), Some(16.6));
/// assert_eq!(year_scale(2025), None);
/// ```
pub fn year_scale(year: u16) -> Option<f64> {
    YEAR_SCALES
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, scale)| *scale)
}

/// Years with a demand projection, ascending.
pub fn projection_years() -> impl Iterator<Item = u16> {
    YEAR_SCALES.iter().map(|(y, _)| *y)
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimConfig {
    /// Length of the run (minutes).
    pub duration_minutes: u32,
    /// Master random seed for reproducibility.
    pub seed: u64,
    /// Projection year the demand scale was taken from.
    pub year: u16,
    /// Multiplier applied to every segment's daily demand.
    pub demand_scale: f64,
    /// Driving speed between segments (km/h).
    pub speed_kmh: f64,
    pub charge_minutes_mean: f64,
    pub charge_minutes_std: f64,
    /// Maximum distance a car will drive to reach a station (km).
    pub range_km: f64,
    /// Keep every car event in the outcome.
    pub record_events: bool,
}

impl SimConfig {
    /// One-day run with default vehicle parameters for a projection year.
    ///
    /// # Errors
    ///
    /// Returns `UnknownYear` if `year` has no projection.
    pub fn for_year(year: u16, seed: u64) -> Result<Self, UnknownYear> {
        let demand_scale = year_scale(year).ok_or(UnknownYear(year))?;
        Ok(Self {
            duration_minutes: MINUTES_PER_DAY,
            seed,
            year,
            demand_scale,
            speed_kmh: 100.0,
            charge_minutes_mean: 20.0,
            charge_minutes_std: 5.0,
            range_km: 40.0,
            record_events: false,
        })
    }

    /// Whole minutes to drive `distance_km` at the configured speed.
    pub fn travel_minutes(&self, distance_km: f64) -> u32 {
        (distance_km / self.speed_kmh * 60.0).round() as u32
    }
}

/// What happened to a car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEventKind {
    /// Appeared on its segment and set off for a station.
    Appeared { travel_minutes: u32 },
    /// Appeared with no station in range.
    OutOfRange,
    EnteredQueue,
    BeganCharging { charge_minutes: u32 },
    /// Found the waiting queue full and left uncharged.
    Balked,
    LeftStation,
}

impl SimEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Appeared { .. } => "appeared",
            Self::OutOfRange => "out_of_range",
            Self::EnteredQueue => "entered_queue",
            Self::BeganCharging { .. } => "began_charging",
            Self::Balked => "balked",
            Self::LeftStation => "left_station",
        }
    }

    /// Travel or charge duration carried by the event, if any.
    pub fn minutes(&self) -> Option<u32> {
        match self {
            Self::Appeared { travel_minutes } => Some(*travel_minutes),
            Self::BeganCharging { charge_minutes } => Some(*charge_minutes),
            _ => None,
        }
    }
}

/// One car event at a given minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimEvent {
    pub time: u32,
    /// Segment the car appeared on.
    pub segment: u32,
    /// Station involved, `None` when the car never reached one.
    pub station: Option<u32>,
    #[serde(flatten)]
    pub kind: SimEventKind,
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let station = self.station.unwrap_or_default();
        write!(f, "T{}: car from {} ", self.time, self.segment)?;
        match self.kind {
            SimEventKind::Appeared { travel_minutes } => write!(
                f,
                "heads to station {station}, {travel_minutes} min away"
            ),
            SimEventKind::OutOfRange => write!(f, "has no station in range"),
            SimEventKind::EnteredQueue => write!(f, "queues at station {station}"),
            SimEventKind::BeganCharging { charge_minutes } => write!(
                f,
                "charges at station {station} for {charge_minutes} min"
            ),
            SimEventKind::Balked => write!(f, "finds station {station} full and leaves"),
            SimEventKind::LeftStation => write!(f, "leaves station {station}"),
        }
    }
}
