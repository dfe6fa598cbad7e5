//! Station levels, budgeted placement plans and the placement optimizer.

pub mod level;
pub mod optimizer;
pub mod plan;

pub use level::StationLevel;
pub use optimizer::{Optimization, covered_demand, optimize};
pub use plan::{PlanError, StationPlan};
