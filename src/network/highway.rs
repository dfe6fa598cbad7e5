use std::collections::BTreeMap;
use std::path::Path;

use super::segment::{DataError, Segment, load_segments_csv, sample_segments};
use crate::placement::StationPlan;

/// For each covered segment, the stations within range and their distance (km).
///
/// Segments with no station in range are absent.
pub type StationRanges = BTreeMap<u32, BTreeMap<u32, f64>>;

/// A highway as an ordered chain of segments.
///
/// Consecutive segments are joined by an edge of length
/// `dist_to_next_km`, so the shortest path between two segments is the sum
/// of the edges between them. Offsets are precomputed to answer that in
/// constant time.
#[derive(Debug, Clone)]
pub struct Highway {
    segments: Vec<Segment>,
    offsets_km: Vec<f64>,
    index: BTreeMap<u32, usize>,
}

impl Highway {
    /// Builds the network from segments in highway order.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Empty` for no segments and
    /// `DataError::DuplicateSegment` if an LHRS appears twice.
    pub fn new(segments: Vec<Segment>) -> Result<Self, DataError> {
        if segments.is_empty() {
            return Err(DataError::Empty);
        }

        let mut index = BTreeMap::new();
        let mut offsets_km = Vec::with_capacity(segments.len());
        let mut offset = 0.0;
        for (i, seg) in segments.iter().enumerate() {
            if index.insert(seg.lhrs, i).is_some() {
                return Err(DataError::DuplicateSegment(seg.lhrs));
            }
            offsets_km.push(offset);
            offset += seg.dist_to_next_km.unwrap_or(0.0);
        }

        Ok(Self {
            segments,
            offsets_km,
            index,
        })
    }

    /// The bundled Highway 401 sample.
    pub fn sample() -> Result<Self, DataError> {
        Self::new(sample_segments()?)
    }

    /// Loads a segment CSV and builds the network from it.
    pub fn from_csv(path: &Path) -> Result<Self, DataError> {
        Self::new(load_segments_csv(path)?)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, lhrs: u32) -> Option<&Segment> {
        self.index.get(&lhrs).map(|&i| &self.segments[i])
    }

    pub fn contains(&self, lhrs: u32) -> bool {
        self.index.contains_key(&lhrs)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total charging demand over all segments (cars/day).
    pub fn total_demand(&self) -> f64 {
        self.segments.iter().map(|s| s.demand_per_day).sum()
    }

    /// Shortest-path distance between two segments along the highway.
    ///
    /// Returns `None` if either LHRS is unknown.
    pub fn distance_km(&self, from: u32, to: u32) -> Option<f64> {
        let a = self.offsets_km[*self.index.get(&from)?];
        let b = self.offsets_km[*self.index.get(&to)?];
        Some((a - b).abs())
    }

    /// Stations reachable from each segment within `range_km`.
    ///
    /// Stations whose LHRS is not on this highway are skipped.
    pub fn station_ranges(&self, plan: &StationPlan, range_km: f64) -> StationRanges {
        let mut ranges = StationRanges::new();
        for seg in &self.segments {
            let reachable: BTreeMap<u32, f64> = plan
                .iter()
                .filter_map(|(station, _)| {
                    let d = self.distance_km(seg.lhrs, station)?;
                    (d <= range_km).then_some((station, d))
                })
                .collect();
            if !reachable.is_empty() {
                ranges.insert(seg.lhrs, reachable);
            }
        }
        ranges
    }
}

/// Closest station reachable from a segment, ties broken by lower LHRS.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use voltpath::network::{StationRanges, closest_station};
///
/// let mut ranges = StationRanges::new();
/// ranges.insert(10, BTreeMap::from([(20, 5.0), (30, 2.5), (40, 2.5)]));
///
/// assert_eq!(closest_station(&ranges, 10), Some((30, 2.5)));
/// assert_eq!(closest_station(&ranges, 99), None);
/// ```
pub fn closest_station(ranges: &StationRanges, lhrs: u32) -> Option<(u32, f64)> {
    ranges
        .get(&lhrs)?
        .iter()
        .map(|(&station, &d)| (station, d))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
}
