//! Streams trip CSVs into a [`TripStats`] accumulator.
//!
//! Ingestion is best-effort over a dirty dataset: rows the parser rejects
//! are counted and skipped, rows the CSV layer itself cannot decode are
//! treated the same way, and a missing input file simply leaves the stats
//! empty. Nothing in this module returns an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use crate::parser::parse_record;
use crate::stats::TripStats;

/// Outcome of one ingestion pass. `rows_read == rows_ingested + rows_skipped`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub rows_read: u64,
    pub rows_ingested: u64,
    pub rows_skipped: u64,
}

/// Ingests a trip CSV from disk, replacing any counts already in `stats`.
///
/// A missing or unopenable file is not an error: the stats are left empty
/// and every report over them comes back empty, which is the intended
/// degradation.
pub fn ingest_path(stats: &mut TripStats, path: impl AsRef<Path>) -> IngestSummary {
    stats.reset();

    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Input not readable, reports will be empty");
            return IngestSummary::default();
        }
    };

    fold_records(stats, file)
}

/// Ingests trip records from any reader, replacing any counts already in
/// `stats`. Used for stdin ingestion and in tests.
pub fn ingest_reader<R: Read>(stats: &mut TripStats, rdr: R) -> IngestSummary {
    stats.reset();
    fold_records(stats, rdr)
}

fn fold_records<R: Read>(stats: &mut TripStats, rdr: R) -> IngestSummary {
    // Headers are detected per record by the parser, not stripped up
    // front: dirty exports repeat them mid-file. flexible() keeps rows
    // with the wrong column count readable so the parser can judge them.
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);

    let mut summary = IngestSummary::default();
    let mut record = csv::StringRecord::new();

    loop {
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                summary.rows_read += 1;
                match parse_record(&record) {
                    Some(trip) => {
                        stats.record(trip.zone, trip.hour);
                        summary.rows_ingested += 1;
                    }
                    None => {
                        summary.rows_skipped += 1;
                        debug!(row = summary.rows_read, "Skipping header or malformed row");
                    }
                }
            }
            Err(e) => {
                summary.rows_read += 1;
                summary.rows_skipped += 1;
                debug!(error = %e, "Skipping undecodable row");
            }
        }
    }

    info!(
        rows_read = summary.rows_read,
        rows_ingested = summary.rows_ingested,
        rows_skipped = summary.rows_skipped,
        zones = stats.zone_count(),
        "Ingestion pass complete"
    );

    summary
}
