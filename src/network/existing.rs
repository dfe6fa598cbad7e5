use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::highway::Highway;
use super::segment::DataError;
use crate::placement::StationLevel;

/// Mean Earth radius used for great-circle distances (km).
pub const EARTH_RADIUS_KM: f64 = 6371.009;

/// Chargers further than this from every segment are off the corridor (km).
pub const CORRIDOR_RADIUS_KM: f64 = 0.5;

/// Alternative fuel station sample for the Highway 401 corridor.
const SAMPLE_CSV: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/existing_stations_401.csv"
));

/// Great-circle distance between two `(latitude, longitude)` points in km.
///
/// # Examples
///
/// ```
/// use voltpath::network::great_circle_km;
///
/// let one_degree = great_circle_km((43.0, -79.0), (44.0, -79.0));
/// assert!((one_degree - 111.195).abs() < 0.01);
/// ```
pub fn great_circle_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Row of an alternative fuel station export. Blank counts read as absent.
#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "Station Name")]
    name: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "EV Level1 EVSE Num", default)]
    level1_ports: Option<u32>,
    #[serde(rename = "EV Level2 EVSE Num", default)]
    level2_ports: Option<u32>,
    #[serde(rename = "EV DC Fast Count", default)]
    dc_fast_ports: Option<u32>,
}

/// A public charging station that already exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistingStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub level1_ports: Option<u32>,
    pub level2_ports: Option<u32>,
    pub dc_fast_ports: Option<u32>,
}

impl ExistingStation {
    /// Highest charger level the station offers, DC fast counting as level 3.
    pub fn level(&self) -> Option<StationLevel> {
        if self.dc_fast_ports.is_some() {
            Some(StationLevel::Level3)
        } else if self.level2_ports.is_some() {
            Some(StationLevel::Level2)
        } else if self.level1_ports.is_some() {
            Some(StationLevel::Level1)
        } else {
            None
        }
    }
}

/// Parses alternative fuel stations from CSV. Unknown columns are ignored.
///
/// # Errors
///
/// Returns a `DataError` for malformed rows or non-finite coordinates.
pub fn parse_existing_stations(reader: impl Read) -> Result<Vec<ExistingStation>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stations = Vec::new();
    for row in rdr.deserialize::<StationRow>() {
        let row = row?;
        if !row.latitude.is_finite() || !row.longitude.is_finite() {
            return Err(DataError::InvalidStation {
                name: row.name,
                message: "coordinates must be finite".to_string(),
            });
        }
        stations.push(ExistingStation {
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            level1_ports: row.level1_ports,
            level2_ports: row.level2_ports,
            dc_fast_ports: row.dc_fast_ports,
        });
    }
    Ok(stations)
}

/// An existing station assigned to its nearest segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedStation {
    #[serde(flatten)]
    pub station: ExistingStation,
    /// Nearest segment.
    pub lhrs: u32,
    /// Distance to that segment's reference point (km).
    pub distance_km: f64,
}

/// Existing chargers along the corridor, with DC fast ports summed per segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExistingChargers {
    stations: Vec<SnappedStation>,
    dc_fast_ports: BTreeMap<u32, u32>,
}

impl ExistingChargers {
    /// Keeps the stations within `radius_km` of a segment and snaps each one
    /// to its nearest segment (ties to the earlier segment).
    pub fn snap(highway: &Highway, stations: Vec<ExistingStation>, radius_km: f64) -> Self {
        let mut kept = Vec::new();
        let mut dc_fast_ports = BTreeMap::new();
        for station in stations {
            let here = (station.latitude, station.longitude);
            let nearest = highway
                .segments()
                .iter()
                .map(|seg| (seg.lhrs, great_circle_km(here, (seg.latitude, seg.longitude))))
                .fold(None, |best: Option<(u32, f64)>, (lhrs, d)| match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((lhrs, d)),
                });
            let Some((lhrs, distance_km)) = nearest.filter(|(_, d)| *d <= radius_km) else {
                tracing::debug!(name = %station.name, "charger off the corridor");
                continue;
            };
            *dc_fast_ports.entry(lhrs).or_insert(0) += station.dc_fast_ports.unwrap_or(0);
            kept.push(SnappedStation {
                station,
                lhrs,
                distance_km,
            });
        }
        tracing::debug!(kept = kept.len(), "existing chargers snapped to corridor");
        Self {
            stations: kept,
            dc_fast_ports,
        }
    }

    /// Bundled sample snapped onto `highway`.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded CSV is corrupt.
    pub fn sample(highway: &Highway) -> Result<Self, DataError> {
        let stations = parse_existing_stations(SAMPLE_CSV.as_bytes())?;
        Ok(Self::snap(highway, stations, CORRIDOR_RADIUS_KM))
    }

    /// Loads a station CSV and snaps it onto `highway`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Io` if the file cannot be opened, otherwise the
    /// errors of [`parse_existing_stations`].
    pub fn from_csv(highway: &Highway, path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stations = parse_existing_stations(file)?;
        Ok(Self::snap(highway, stations, CORRIDOR_RADIUS_KM))
    }

    pub fn stations(&self) -> &[SnappedStation] {
        &self.stations
    }

    /// DC fast ports snapped to a segment.
    pub fn dc_fast_ports(&self, lhrs: u32) -> u32 {
        self.dc_fast_ports.get(&lhrs).copied().unwrap_or(0)
    }

    /// Cars per day the DC fast ports at each segment can serve.
    ///
    /// A port serves as many cars as one port of a level 3 station.
    pub fn daily_capacity(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        let per_port =
            StationLevel::Level3.daily_capacity() / f64::from(StationLevel::Level3.ports());
        self.dc_fast_ports
            .iter()
            .filter(|(_, ports)| **ports > 0)
            .map(move |(&lhrs, &ports)| (lhrs, f64::from(ports) * per_port))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
