//! Discrete-event charging simulation over a minute clock.

use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::clock::Clock;
use super::station::ChargingStation;
use super::types::{MINUTES_PER_DAY, SimConfig, SimEvent, SimEventKind};
use crate::network::{Highway, StationRanges, closest_station};
use crate::placement::StationPlan;

/// A car on its way to, or leaving, a station.
#[derive(Debug, Clone, Copy)]
struct Visit {
    station: u32,
    origin: u32,
}

/// Events scheduled for one minute. Departures are handled before arrivals.
#[derive(Debug, Default)]
struct Tick {
    departures: Vec<Visit>,
    arrivals: Vec<Visit>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    pub config: SimConfig,
    /// Cars charged, keyed by the segment they appeared on.
    pub charged: BTreeMap<u32, u64>,
    /// Cars that balked or had no station in range, keyed by origin segment.
    pub not_charged: BTreeMap<u32, u64>,
    /// Final station state, keyed by LHRS.
    pub stations: BTreeMap<u32, ChargingStation>,
    /// Car events in order, empty unless `record_events` was set.
    pub events: Vec<SimEvent>,
}

/// Event log that traces every event and optionally keeps it.
struct EventLog {
    keep: bool,
    events: Vec<SimEvent>,
}

impl EventLog {
    fn push(&mut self, event: SimEvent) {
        tracing::trace!(%event);
        if self.keep {
            self.events.push(event);
        }
    }
}

/// Mutable bookkeeping of a run outside the stations themselves.
struct RunState {
    duration: u32,
    calendar: BTreeMap<u32, Tick>,
    charged: BTreeMap<u32, u64>,
    not_charged: BTreeMap<u32, u64>,
    log: EventLog,
}

impl RunState {
    /// Calendar slot for `delay` minutes after `now`, or `None` past the end of the run.
    fn slot(&mut self, now: u32, delay: u32) -> Option<&mut Tick> {
        let at = now.checked_add(delay).filter(|at| *at < self.duration)?;
        Some(self.calendar.entry(at).or_default())
    }

    fn start_charging(&mut self, station: &mut ChargingStation, now: u32, charge_minutes: u32) {
        if let Some(car) = station.start_charging(now, charge_minutes) {
            if let Some(tick) = self.slot(now, charge_minutes) {
                tick.departures.push(Visit {
                    station: station.lhrs(),
                    origin: car.origin,
                });
            }
            *self.charged.entry(car.origin).or_default() += 1;
            self.log.push(SimEvent {
                time: now,
                segment: car.origin,
                station: Some(station.lhrs()),
                kind: SimEventKind::BeganCharging { charge_minutes },
            });
        }
    }
}

/// Simulates one day of charging demand against a station plan.
///
/// Per minute, in order: cars appear on their segments and drive to the
/// closest station in range; cars that finished charging leave and free a
/// port; cars reaching a station join its queue and start charging if a
/// port is free, or balk if the queue is full.
///
/// # Examples
///
/// ```
/// use voltpath::network::Highway;
/// use voltpath::placement::{StationLevel, StationPlan};
/// use voltpath::sim::engine::Engine;
/// use voltpath::sim::types::SimConfig;
///
/// let highway = Highway::sample().unwrap();
/// let mut plan = StationPlan::unlimited();
/// plan.add(&highway, 10915, StationLevel::Level2).unwrap();
///
/// let outcome = Engine::new(SimConfig::for_year(2024, 7).unwrap(), &highway, &plan).run();
/// assert!(outcome.stations[&10915].cars_started() > 0);
/// ```
pub struct Engine<'a> {
    config: SimConfig,
    highway: &'a Highway,
    ranges: StationRanges,
    stations: BTreeMap<u32, ChargingStation>,
    rng: StdRng,
}

impl<'a> Engine<'a> {
    pub fn new(config: SimConfig, highway: &'a Highway, plan: &StationPlan) -> Self {
        let ranges = highway.station_ranges(plan, config.range_km);
        let stations = plan
            .iter()
            .filter(|(lhrs, _)| highway.contains(*lhrs))
            .map(|(lhrs, level)| (lhrs, ChargingStation::new(lhrs, level)))
            .collect();
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            highway,
            ranges,
            stations,
            rng,
        }
    }

    /// Runs the whole simulation and returns its outcome.
    pub fn run(mut self) -> SimOutcome {
        tracing::debug!(
            seed = self.config.seed,
            year = self.config.year,
            stations = self.stations.len(),
            "simulation starting"
        );

        let mut appearances = self.arrival_schedule();
        let mut state = RunState {
            duration: self.config.duration_minutes,
            calendar: BTreeMap::new(),
            charged: self.highway.segments().iter().map(|s| (s.lhrs, 0)).collect(),
            not_charged: self.highway.segments().iter().map(|s| (s.lhrs, 0)).collect(),
            log: EventLog {
                keep: self.config.record_events,
                events: Vec::new(),
            },
        };

        let mut clock = Clock::new(self.config.duration_minutes);
        while let Some(now) = clock.tick() {
            for (origin, times) in appearances.iter_mut() {
                while times.front() == Some(&now) {
                    times.pop_front();
                    self.car_appears(&mut state, *origin, now);
                }
            }

            let Some(tick) = state.calendar.remove(&now) else {
                continue;
            };

            for visit in tick.departures {
                let Some(station) = self.stations.get_mut(&visit.station) else {
                    continue;
                };
                station.release();
                state.log.push(SimEvent {
                    time: now,
                    segment: visit.origin,
                    station: Some(visit.station),
                    kind: SimEventKind::LeftStation,
                });
                if station.queue_len() > 0 {
                    let minutes = charge_minutes(&mut self.rng, &self.config);
                    state.start_charging(station, now, minutes);
                }
            }

            for visit in tick.arrivals {
                let Some(station) = self.stations.get_mut(&visit.station) else {
                    continue;
                };
                if station.enqueue(visit.origin, now) {
                    state.log.push(SimEvent {
                        time: now,
                        segment: visit.origin,
                        station: Some(visit.station),
                        kind: SimEventKind::EnteredQueue,
                    });
                    if station.has_free_port() {
                        let minutes = charge_minutes(&mut self.rng, &self.config);
                        state.start_charging(station, now, minutes);
                    }
                } else {
                    *state.not_charged.entry(visit.origin).or_default() += 1;
                    state.log.push(SimEvent {
                        time: now,
                        segment: visit.origin,
                        station: Some(visit.station),
                        kind: SimEventKind::Balked,
                    });
                }
            }
        }

        SimOutcome {
            config: self.config,
            charged: state.charged,
            not_charged: state.not_charged,
            stations: self.stations,
            events: state.log.events,
        }
    }

    /// Minutes at which cars appear on each segment, ascending per segment.
    fn arrival_schedule(&mut self) -> Vec<(u32, VecDeque<u32>)> {
        let duration = self.config.duration_minutes;
        let mut schedule = Vec::with_capacity(self.highway.len());
        for seg in self.highway.segments() {
            let mut times = VecDeque::new();
            let per_day = seg.demand_per_day * self.config.demand_scale;
            if per_day > 0.0 {
                let mean_gap = f64::from(MINUTES_PER_DAY) / per_day;
                let mut t: u32 = 0;
                loop {
                    let gap = exponential(&mut self.rng, mean_gap).round() as u32;
                    t = t.saturating_add(gap);
                    if t >= duration {
                        break;
                    }
                    times.push_back(t);
                }
            }
            schedule.push((seg.lhrs, times));
        }
        schedule
    }

    fn car_appears(&self, state: &mut RunState, origin: u32, now: u32) {
        match closest_station(&self.ranges, origin) {
            Some((station, distance)) => {
                let travel_minutes = self.config.travel_minutes(distance);
                if let Some(tick) = state.slot(now, travel_minutes) {
                    tick.arrivals.push(Visit { station, origin });
                }
                state.log.push(SimEvent {
                    time: now,
                    segment: origin,
                    station: Some(station),
                    kind: SimEventKind::Appeared { travel_minutes },
                });
            }
            None => {
                *state.not_charged.entry(origin).or_default() += 1;
                state.log.push(SimEvent {
                    time: now,
                    segment: origin,
                    station: None,
                    kind: SimEventKind::OutOfRange,
                });
            }
        }
    }
}

/// Draws from an exponential distribution with the given mean.
fn exponential(rng: &mut impl Rng, mean: f64) -> f64 {
    let u: f64 = rng.random::<f64>();
    -mean * (1.0 - u).ln()
}

/// Draws from a normal distribution via the Box-Muller transform.
fn gaussian(rng: &mut impl Rng, mean: f64, std: f64) -> f64 {
    if std <= 0.0 {
        return mean;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std * z
}

/// Charge duration in whole minutes, never less than one.
fn charge_minutes(rng: &mut impl Rng, config: &SimConfig) -> u32 {
    gaussian(rng, config.charge_minutes_mean, config.charge_minutes_std)
        .round()
        .max(1.0) as u32
}
