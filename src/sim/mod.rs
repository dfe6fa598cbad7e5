/// Coverage bands for the map overlay.
pub mod bands;
/// Minute clock for a simulation run.
pub mod clock;
pub mod engine;
pub mod report;
/// Charging station queue and port state.
pub mod station;
pub mod types;

pub use bands::{BandColor, CoverageBand, coverage_bands};
pub use engine::{Engine, SimOutcome};
pub use report::SimulationReport;
pub use types::{SimConfig, SimEvent, SimEventKind, UnknownYear, year_scale};
