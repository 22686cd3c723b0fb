//! Report assembly and rendering for trip hotspot results.
//!
//! Supports labeled plain-text blocks, pretty-printed JSON, and CSV export.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::ingest::IngestSummary;
use crate::stats::{SlotCount, TripStats, ZoneCount};

/// Complete result of one analysis run.
#[derive(Debug, Serialize)]
pub struct HotspotReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub rows_read: u64,
    pub rows_ingested: u64,
    pub rows_skipped: u64,
    pub top_zones: Vec<ZoneCount>,
    pub top_slots: Vec<SlotCount>,
}

impl HotspotReport {
    /// Snapshots the two ranked views at size `k` together with the
    /// ingestion summary for `source`.
    pub fn build(source: &str, summary: IngestSummary, stats: &TripStats, k: usize) -> Self {
        HotspotReport {
            generated_at: Utc::now(),
            source: source.to_string(),
            rows_read: summary.rows_read,
            rows_ingested: summary.rows_ingested,
            rows_skipped: summary.rows_skipped,
            top_zones: stats.top_zones(k),
            top_slots: stats.top_busy_slots(k),
        }
    }
}

/// Writes the report as two labeled blocks of comma-separated rows.
pub fn write_blocks<W: Write>(mut out: W, report: &HotspotReport) -> Result<()> {
    writeln!(out, "Top zones (zone,count)")?;
    for z in &report.top_zones {
        writeln!(out, "{},{}", z.zone, z.count)?;
    }
    writeln!(out)?;
    writeln!(out, "Top busy slots (zone,hour,count)")?;
    for s in &report.top_slots {
        writeln!(out, "{},{},{}", s.zone, s.hour, s.count)?;
    }
    Ok(())
}

/// Prints the report as pretty-printed JSON on stdout.
pub fn print_json(report: &HotspotReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the ranked zone table to `path` as a headered CSV file,
/// replacing any previous contents.
pub fn write_zone_csv(path: &str, rows: &[ZoneCount]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing zone CSV");
    let mut writer = WriterBuilder::new().from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the ranked slot table to `path` as a headered CSV file,
/// replacing any previous contents.
pub fn write_slot_csv(path: &str, rows: &[SlotCount]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing slot CSV");
    let mut writer = WriterBuilder::new().from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_report() -> HotspotReport {
        let mut stats = TripStats::new();
        stats.record("ZONEA".to_string(), 8);
        stats.record("ZONEA".to_string(), 8);
        stats.record("ZONEB".to_string(), 9);

        let summary = IngestSummary {
            rows_read: 4,
            rows_ingested: 3,
            rows_skipped: 1,
        };
        HotspotReport::build("trips.csv", summary, &stats, 10)
    }

    #[test]
    fn test_write_blocks_format() {
        let report = sample_report();
        let mut out = Vec::new();
        write_blocks(&mut out, &report).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = "\
Top zones (zone,count)
ZONEA,2
ZONEB,1

Top busy slots (zone,hour,count)
ZONEA,8,2
ZONEB,9,1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let report = sample_report();
        print_json(&report).unwrap();
    }

    #[test]
    fn test_write_zone_csv_headers_and_rows() {
        let path = temp_path("trip_hotspots_test_zones.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let report = sample_report();
        write_zone_csv(&path, &report.top_zones).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["zone,count", "ZONEA,2", "ZONEB,1"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_slot_csv_headers_and_rows() {
        let path = temp_path("trip_hotspots_test_slots.csv");
        let _ = fs::remove_file(&path);

        let report = sample_report();
        write_slot_csv(&path, &report.top_slots).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["zone,hour,count", "ZONEA,8,2", "ZONEB,9,1"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_report_renders_empty_tables() {
        let stats = TripStats::new();
        let report = HotspotReport::build("missing.csv", IngestSummary::default(), &stats, 5);

        assert!(report.top_zones.is_empty());
        assert!(report.top_slots.is_empty());

        let mut out = Vec::new();
        write_blocks(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Top zones"));
        assert!(text.contains("Top busy slots"));
    }
}
