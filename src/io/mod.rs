/// CSV export of simulation results and event logs.
pub mod export;
