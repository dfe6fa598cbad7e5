//! EV charging station placement simulator for highway corridors.
//!
//! Loads highway segments with traffic and build costs, places charging
//! stations within a budget, simulates a day of charging demand and reports
//! coverage, utilization and waiting times. The `web` feature adds an HTTP
//! front end with a landing page and an interactive station map.

pub mod config;
/// Landing page copy and illustrations.
pub mod content;
/// CSV export of results.
pub mod io;
/// Highway segments and distances.
pub mod network;
pub mod placement;
pub mod runner;
/// Charging simulation engine, reports and coverage bands.
pub mod sim;
pub mod telemetry;
#[cfg(feature = "web")]
pub mod web;
