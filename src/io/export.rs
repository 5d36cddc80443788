//! CSV export for per-string design results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::catalog::MatchOutcome;
use crate::design::{DesignReport, StringReport};

/// Column header for per-string CSV export.
const HEADER: &str = "string,topology,panels,volts,amps,watts,open_circuit_volts,\
                       max_voltage,min_voltage,best_mppt,assigned_mppt,load_pct,status";

/// Exports the string results of a report to a CSV file at the given path.
///
/// # Arguments
///
/// * `report` - Assembled design report
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(report: &DesignReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(&report.strings, buf)
}

/// Writes string results as CSV to any writer.
///
/// One row per string in report order. The MPPT columns are empty when no
/// controller is found or assigned; `best_mppt` reads `unavailable` when the
/// controller listing could not be fetched.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[StringReport], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        let best = match &r.best {
            MatchOutcome::Found(m) => m.id.clone(),
            MatchOutcome::NoMatch => String::new(),
            MatchOutcome::CatalogUnavailable => "unavailable".to_string(),
        };
        let (assigned, load_pct, status) = match &r.assigned {
            Some(a) => (
                a.id.clone(),
                format!("{:.1}", a.load.percentage),
                a.load.status.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        wtr.write_record(&[
            r.name.clone(),
            r.topology.to_string(),
            r.panel_count.to_string(),
            format!("{:.2}", r.profile.volts),
            format!("{:.2}", r.profile.amps),
            format!("{:.1}", r.profile.watts),
            format!("{:.2}", r.profile.open_circuit_volts),
            format!("{:.2}", r.derated.max_voltage),
            format!("{:.2}", r.derated.min_voltage),
            best,
            assigned,
            load_pct,
            status,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
