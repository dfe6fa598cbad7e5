//! Highway segment dataset and the path-graph network built from it.

/// Existing public chargers snapped onto the corridor.
pub mod existing;
/// Ordered highway network, distances and station reach.
pub mod highway;
/// Segment records and CSV loading.
pub mod segment;

pub use existing::{
    CORRIDOR_RADIUS_KM, ExistingChargers, ExistingStation, SnappedStation, great_circle_km,
    parse_existing_stations,
};
pub use highway::{Highway, StationRanges, closest_station};
pub use segment::{DataError, Segment, load_segments_csv, parse_segments, sample_segments};
