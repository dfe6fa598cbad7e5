//! CSV export for per-segment results and car event logs.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::SimEvent;
use crate::sim::report::SimulationReport;

/// Column header for per-segment results.
const RESULTS_HEADER: &str = "lhrs,cars_charged,cars_not_charged,coverage,station_level,\
                              utilization,average_wait_min";

/// Column header for the event log.
const EVENTS_HEADER: &str = "time_min,segment,station,event,minutes";

/// Exports per-segment results to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_results_csv(report: &SimulationReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_results_csv(report, io::BufWriter::new(file))
}

/// Writes one row per segment, in LHRS order.
///
/// Station columns are empty for segments without a station.
///
/// # Arguments
///
/// * `report` - Report of a finished run
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_results_csv(report: &SimulationReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(RESULTS_HEADER.split(',').map(str::trim))?;

    for seg in &report.segments {
        let station = report.stations.iter().find(|s| s.lhrs == seg.lhrs);
        wtr.write_record(&[
            seg.lhrs.to_string(),
            seg.cars_charged.to_string(),
            seg.cars_not_charged.to_string(),
            format!("{:.2}", seg.coverage),
            station.map_or_else(String::new, |s| s.level.index().to_string()),
            station.map_or_else(String::new, |s| format!("{:.2}", s.utilization)),
            station.map_or_else(String::new, |s| format!("{:.1}", s.average_wait_minutes)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the car event log to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_events_csv(events: &[SimEvent], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_events_csv(events, io::BufWriter::new(file))
}

/// Writes one row per event in the order they happened.
pub fn write_events_csv(events: &[SimEvent], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(EVENTS_HEADER.split(','))?;

    for ev in events {
        wtr.write_record(&[
            ev.time.to_string(),
            ev.segment.to_string(),
            ev.station.map(|s| s.to_string()).unwrap_or_default(),
            ev.kind.label().to_string(),
            ev.kind.minutes().map(|m| m.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
