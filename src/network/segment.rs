use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::placement::StationLevel;

/// Share of passenger traffic assumed to be electric.
const EV_SHARE: f64 = 0.033;
/// Share of electric vehicles that stop to charge on a given trip.
const CHARGE_SHARE: f64 = 0.02072;

/// Highway 401 sample bundled with the binary.
const SAMPLE_CSV: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/segments_401.csv"
));

/// Errors raised while loading or validating a segment or charger dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("cannot read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("segment dataset is empty")]
    Empty,
    #[error("duplicate LHRS {0} in segment dataset")]
    DuplicateSegment(u32),
    #[error("segment {lhrs}: {message}")]
    InvalidSegment { lhrs: u32, message: String },
    #[error("charging station \"{name}\": {message}")]
    InvalidStation { name: String, message: String },
}

/// Raw CSV row, column names as published in the MTO traffic volume tables.
#[derive(Debug, Deserialize)]
struct SegmentRow {
    #[serde(rename = "LHRS")]
    lhrs: u32,
    #[serde(rename = "Location Description")]
    description: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Sec Len")]
    section_km: f64,
    #[serde(rename = "AADT")]
    aadt: u32,
    #[serde(rename = "Truck %")]
    truck_pct: f64,
    #[serde(rename = "cost 1")]
    cost_1: f64,
    #[serde(rename = "cost 2")]
    cost_2: f64,
    #[serde(rename = "cost 3")]
    cost_3: f64,
}

impl SegmentRow {
    fn check(&self) -> Result<(), DataError> {
        let invalid = |message: &str| DataError::InvalidSegment {
            lhrs: self.lhrs,
            message: message.to_string(),
        };

        if !self.section_km.is_finite() || self.section_km < 0.0 {
            return Err(invalid("section length must be >= 0"));
        }
        if !(0.0..=100.0).contains(&self.truck_pct) {
            return Err(invalid("truck share must be in [0, 100]"));
        }
        if [self.cost_1, self.cost_2, self.cost_3]
            .iter()
            .any(|c| !c.is_finite() || *c < 0.0)
        {
            return Err(invalid("station costs must be >= 0"));
        }
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        Ok(())
    }
}

/// One highway section keyed by its LHRS number.
///
/// Demand and the distance to the next section are derived once at load
/// time; segments are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Linear Highway Referencing System id.
    pub lhrs: u32,
    /// Interchange or landmark name.
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Section length (km).
    pub section_km: f64,
    /// Annual average daily traffic (vehicles/day).
    pub aadt: u32,
    /// Share of trucks in the traffic (percent).
    pub truck_pct: f64,
    /// Build cost for a level 1, 2 and 3 station at this site.
    pub costs: [f64; 3],
    /// Cars per day expected to need a charge on this section.
    pub demand_per_day: f64,
    /// Distance to the next section's midpoint (km), `None` for the last one.
    pub dist_to_next_km: Option<f64>,
}

impl Segment {
    /// Build cost of a station of the given level at this site.
    pub fn cost(&self, level: StationLevel) -> f64 {
        self.costs[level.cost_index()]
    }
}

/// Charging demand in cars/day from daily traffic and truck share.
pub fn daily_demand(aadt: u32, truck_pct: f64) -> f64 {
    f64::from(aadt) * (1.0 - truck_pct / 100.0) * EV_SHARE * CHARGE_SHARE
}

/// Parses segments from CSV, keeping file order.
///
/// Unknown columns are ignored, so full MTO exports load as-is.
///
/// # Errors
///
/// Returns a `DataError` for malformed rows, duplicate LHRS numbers,
/// out-of-range values, or an empty dataset.
pub fn parse_segments(reader: impl Read) -> Result<Vec<Segment>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut seen = BTreeSet::new();
    for row in rdr.deserialize::<SegmentRow>() {
        let row = row?;
        row.check()?;
        if !seen.insert(row.lhrs) {
            return Err(DataError::DuplicateSegment(row.lhrs));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataError::Empty);
    }

    let segments = rows
        .iter()
        .enumerate()
        .map(|(i, row)| Segment {
            lhrs: row.lhrs,
            description: row.description.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
            section_km: row.section_km,
            aadt: row.aadt,
            truck_pct: row.truck_pct,
            costs: [row.cost_1, row.cost_2, row.cost_3],
            demand_per_day: daily_demand(row.aadt, row.truck_pct),
            dist_to_next_km: rows
                .get(i + 1)
                .map(|next| (row.section_km + next.section_km) / 2.0),
        })
        .collect();

    Ok(segments)
}

/// Loads segments from a CSV file.
///
/// # Errors
///
/// Returns `DataError::Io` if the file cannot be opened, otherwise the
/// errors of [`parse_segments`].
pub fn load_segments_csv(path: &Path) -> Result<Vec<Segment>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_segments(file)
}

/// The bundled Highway 401 sample (Toronto to Kingston).
///
/// # Errors
///
/// Only fails if the embedded CSV is corrupt.
pub fn sample_segments() -> Result<Vec<Segment>, DataError> {
    parse_segments(SAMPLE_CSV.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "LHRS,Location Description,Latitude,Longitude,Sec Len,AADT,Truck %,cost 1,cost 2,cost 3";

    fn csv(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s
    }

    #[test]
    fn demand_matches_traffic_formula() {
        let d = daily_demand(100_000, 10.0);
        assert!((d - 100_000.0 * 0.9 * 0.033 * 0.02072).abs() < 1e-9);
        assert_eq!(daily_demand(0, 0.0), 0.0);
    }

    #[test]
    fn dist_to_next_is_mean_of_adjacent_sections() {
        let data = csv(&[
            "1,A,43.0,-79.0,2.0,1000,10,1,2,3",
            "2,B,43.1,-79.1,4.0,1000,10,1,2,3",
            "3,C,43.2,-79.2,10.0,1000,10,1,2,3",
        ]);
        let segs = parse_segments(data.as_bytes()).expect("should parse");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].dist_to_next_km, Some(3.0));
        assert_eq!(segs[1].dist_to_next_km, Some(7.0));
        assert_eq!(segs[2].dist_to_next_km, None);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = "LHRS,Hwy,Location Description,Latitude,Longitude,Sec Len,AADT,Truck %,cost 1,cost 2,cost 3\n\
                    7,401,X,43.0,-79.0,1.0,500,5,10,20,30\n";
        let segs = parse_segments(data.as_bytes()).expect("should parse");
        assert_eq!(segs[0].lhrs, 7);
        assert_eq!(segs[0].costs, [10.0, 20.0, 30.0]);
    }

    #[test]
    fn rejects_duplicate_lhrs() {
        let data = csv(&[
            "1,A,43.0,-79.0,2.0,1000,10,1,2,3",
            "1,B,43.1,-79.1,4.0,1000,10,1,2,3",
        ]);
        let err = parse_segments(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateSegment(1)));
    }

    #[test]
    fn rejects_empty_dataset() {
        let err = parse_segments(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn rejects_bad_truck_share() {
        let data = csv(&["1,A,43.0,-79.0,2.0,1000,140,1,2,3"]);
        let err = parse_segments(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidSegment { lhrs: 1, .. }));
    }

    #[test]
    fn rejects_non_numeric_field() {
        let data = csv(&["1,A,43.0,-79.0,abc,1000,10,1,2,3"]);
        assert!(matches!(
            parse_segments(data.as_bytes()),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_segments_csv(Path::new("/nonexistent/segments.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/segments.csv"));
    }

    #[test]
    fn sample_dataset_loads() {
        let segs = sample_segments().expect("embedded sample should parse");
        assert_eq!(segs.len(), 16);
        assert!(segs.iter().all(|s| s.demand_per_day > 0.0));
        assert_eq!(segs.last().and_then(|s| s.dist_to_next_km), None);
    }
}
