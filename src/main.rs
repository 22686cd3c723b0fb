//! CLI entry point for the trip hotspots tool.
//!
//! Provides subcommands for producing the full hotspot report and for
//! dumping either ranked table on its own. Input is a trip CSV file, or
//! stdin when the source is `-`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_hotspots::{
    ingest::{IngestSummary, ingest_path, ingest_reader},
    output::{HotspotReport, print_json, write_blocks, write_slot_csv, write_zone_csv},
    stats::TripStats,
};

#[derive(Parser)]
#[command(name = "trip_hotspots")]
#[command(about = "Report the busiest pickup zones and (zone, hour) slots in a trip CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce the full report: top zones and top busy slots
    Analyze {
        /// Path to a trip CSV file, or `-` for stdin
        #[arg(value_name = "FILE")]
        source: String,

        /// Number of entries to keep in each ranked table
        #[arg(short, long, default_value_t = 10)]
        top: usize,

        /// Print the report as pretty JSON instead of labeled blocks
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Optional: also write the zone table to this CSV file
        #[arg(long)]
        zones_csv: Option<String>,

        /// Optional: also write the slot table to this CSV file
        #[arg(long)]
        slots_csv: Option<String>,
    },
    /// Print only the busiest pickup zones as `zone,count` rows
    TopZones {
        /// Path to a trip CSV file, or `-` for stdin
        #[arg(value_name = "FILE")]
        source: String,

        /// Number of zones to print
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
    /// Print only the busiest (zone, hour) slots as `zone,hour,count` rows
    TopSlots {
        /// Path to a trip CSV file, or `-` for stdin
        #[arg(value_name = "FILE")]
        source: String,

        /// Number of slots to print
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_hotspots.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_hotspots.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            top,
            json,
            zones_csv,
            slots_csv,
        } => {
            let mut stats = TripStats::new();
            let summary = ingest_source(&mut stats, &source);
            let report = HotspotReport::build(&source, summary, &stats, top);

            if json {
                print_json(&report)?;
            } else {
                write_blocks(io::stdout().lock(), &report)?;
            }

            if let Some(path) = zones_csv {
                write_zone_csv(&path, &report.top_zones)?;
                info!(path = %path, "Zone table written");
            }
            if let Some(path) = slots_csv {
                write_slot_csv(&path, &report.top_slots)?;
                info!(path = %path, "Slot table written");
            }
        }
        Commands::TopZones { source, top } => {
            let mut stats = TripStats::new();
            ingest_source(&mut stats, &source);

            let mut out = io::stdout().lock();
            for z in stats.top_zones(top) {
                writeln!(out, "{},{}", z.zone, z.count)?;
            }
        }
        Commands::TopSlots { source, top } => {
            let mut stats = TripStats::new();
            ingest_source(&mut stats, &source);

            let mut out = io::stdout().lock();
            for s in stats.top_busy_slots(top) {
                writeln!(out, "{},{},{}", s.zone, s.hour, s.count)?;
            }
        }
    }

    Ok(())
}

/// Ingests from a file path, or from stdin when the source is `-`.
fn ingest_source(stats: &mut TripStats, source: &str) -> IngestSummary {
    if source == "-" {
        ingest_reader(stats, io::stdin().lock())
    } else {
        ingest_path(stats, source)
    }
}
