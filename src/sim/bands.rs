//! Coverage bands drawn along the highway on the map.

use std::collections::BTreeMap;

use serde::Serialize;

/// Segments per band.
const BAND_WIDTH: usize = 4;
/// Offset between band starts; consecutive bands share one segment.
const BAND_STRIDE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandColor {
    Green,
    Orange,
    Red,
    Gray,
}

impl BandColor {
    /// Color for the summed coverage of a band.
    ///
    /// Above 3 is green, above 1 orange, 0 to 1 red. Negative totals
    /// (segments without traffic dominate) are gray.
    pub fn from_total(total: f64) -> Self {
        if total > 3.0 {
            Self::Green
        } else if total > 1.0 {
            Self::Orange
        } else if total >= 0.0 {
            Self::Red
        } else {
            Self::Gray
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Gray => "gray",
        }
    }
}

/// A run of consecutive segments colored by their combined coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageBand {
    /// LHRS numbers in the band, ascending.
    pub segments: Vec<u32>,
    pub total_coverage: f64,
    pub color: BandColor,
}

/// Groups segments into overlapping bands of four, starting every third.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use voltpath::sim::bands::{BandColor, coverage_bands};
///
/// let coverage: BTreeMap<u32, f64> = (1..=7).map(|lhrs| (lhrs, 1.0)).collect();
/// let bands = coverage_bands(&coverage);
///
/// assert_eq!(bands[0].segments, vec![1, 2, 3, 4]);
/// assert_eq!(bands[1].segments, vec![4, 5, 6, 7]);
/// assert_eq!(bands[0].color, BandColor::Green);
/// ```
pub fn coverage_bands(coverage: &BTreeMap<u32, f64>) -> Vec<CoverageBand> {
    let entries: Vec<(u32, f64)> = coverage.iter().map(|(&k, &v)| (k, v)).collect();
    let mut bands = Vec::new();
    let mut start = 0;
    while start < entries.len() {
        let window = &entries[start..(start + BAND_WIDTH).min(entries.len())];
        let total: f64 = window.iter().map(|(_, c)| c).sum();
        bands.push(CoverageBand {
            segments: window.iter().map(|(lhrs, _)| *lhrs).collect(),
            total_coverage: total,
            color: BandColor::from_total(total),
        });
        start += BAND_STRIDE;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_thresholds() {
        assert_eq!(BandColor::from_total(3.5), BandColor::Green);
        assert_eq!(BandColor::from_total(3.0), BandColor::Orange);
        assert_eq!(BandColor::from_total(1.01), BandColor::Orange);
        assert_eq!(BandColor::from_total(1.0), BandColor::Red);
        assert_eq!(BandColor::from_total(0.0), BandColor::Red);
        assert_eq!(BandColor::from_total(-0.5), BandColor::Gray);
        assert_eq!(BandColor::from_total(f64::NAN), BandColor::Gray);
    }

    #[test]
    fn middle_band_is_orange() {
        assert_eq!(BandColor::Orange.as_str(), "orange");
        assert_eq!(
            toml::Value::try_from(BandColor::Orange).ok(),
            Some(toml::Value::String("orange".into()))
        );
    }

    #[test]
    fn windows_overlap_by_one_segment() {
        let coverage: BTreeMap<u32, f64> = (0..16).map(|i| (10880 + 5 * i, 0.5)).collect();
        let bands = coverage_bands(&coverage);
        let starts: Vec<u32> = bands.iter().map(|b| b.segments[0]).collect();
        assert_eq!(starts, vec![10880, 10895, 10910, 10925, 10940, 10955]);
        assert_eq!(bands.last().map(|b| b.segments.len()), Some(1));
        assert_eq!(bands[0].total_coverage, 2.0);
        assert_eq!(bands[0].color, BandColor::Orange);
    }

    #[test]
    fn bands_follow_lhrs_order() {
        let coverage = BTreeMap::from([(30, 0.0), (10, 1.0), (20, 1.0), (40, 1.0)]);
        let bands = coverage_bands(&coverage);
        assert_eq!(bands[0].segments, vec![10, 20, 30, 40]);
    }

    #[test]
    fn sentinel_segments_can_turn_a_band_gray() {
        let coverage = BTreeMap::from([(1, -1.0), (2, -1.0), (3, 0.2), (4, -1.0)]);
        assert_eq!(coverage_bands(&coverage)[0].color, BandColor::Gray);
    }

    #[test]
    fn empty_coverage_has_no_bands() {
        assert!(coverage_bands(&BTreeMap::new()).is_empty());
    }
}
