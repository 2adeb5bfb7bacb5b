//! CLI entry point for the charge insights reporting tool.
//!
//! Provides subcommands for building a filtered session report from a
//! session log and station directory, and for inspecting the resolved
//! station directory.

use anyhow::{Result, bail};
use charge_insights::{
    fetch::{BasicClient, SourceCache},
    output::{export_session_detail, log_report, print_json},
    parser::{parse_sessions, parse_station_directory},
    pipeline::{
        self, aggregate, filter,
        types::{FilterOutcome, FilterSelection, Region},
    },
    stations::StationNames,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::hash::Hash;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "charge_insights")]
#[command(about = "EV charging session analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the session dataset, apply filters, and render the report
    Report {
        /// Path or URL of the session log JSON document
        #[arg(value_name = "SESSIONS")]
        sessions: String,

        /// Path or URL of the station directory JSON document
        #[arg(short, long)]
        stations: String,

        /// Providers to keep (repeatable; default: all)
        #[arg(long = "provider")]
        providers: Vec<String>,

        /// Station display names to keep (repeatable; default: all)
        #[arg(long = "station")]
        station_names: Vec<String>,

        /// Inclusive start of the date range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Inclusive end of the date range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Inclusive start of the hour range
        #[arg(long, default_value_t = 0)]
        from_hour: u32,

        /// Inclusive end of the hour range
        #[arg(long, default_value_t = 23)]
        to_hour: u32,

        /// Regions to keep (repeatable; default: all)
        #[arg(long = "region")]
        regions: Vec<Region>,

        /// Emit the full report as pretty JSON instead of log lines
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Optional CSV file for the session detail listing
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List resolved station names from a station directory
    ListStations {
        /// Path or URL of the station directory JSON document
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/charge_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("charge_insights.log"));

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
        Commands::Report {
            sessions,
            stations,
            providers,
            station_names,
            from,
            to,
            from_hour,
            to_hour,
            regions,
            json,
            output,
        } => {
            let date_range = match (from, to) {
                (Some(from), Some(to)) => Some((from, to)),
                (None, None) => None,
                _ => bail!("--from and --to must be given together"),
            };

            let client = BasicClient::new();
            let mut cache = SourceCache::new();
            let session_bytes = cache.load(&client, &sessions).await?;
            let station_bytes = cache.load(&client, &stations).await?;

            let records = parse_sessions(&session_bytes)?;
            let directory = parse_station_directory(&station_bytes)?;
            let names = StationNames::from_directory(&directory)?;
            info!(
                records = records.len(),
                stations = names.len(),
                "input documents loaded"
            );

            let dataset = pipeline::build_dataset(&records, &names)?;

            let selection = FilterSelection {
                providers: to_set(providers),
                stations: to_set(station_names),
                date_range,
                hour_range: (from_hour, to_hour),
                regions: to_set(regions),
            };

            match filter::apply(&dataset, &selection) {
                FilterOutcome::Empty => {
                    warn!("no data available for selected filters");
                }
                FilterOutcome::Rows(rows) => {
                    let report = aggregate::build_report(&rows);
                    if json {
                        print_json(&report)?;
                    } else {
                        log_report(&report);
                    }
                    if let Some(path) = output {
                        export_session_detail(&path, &rows)?;
                        info!(path, "session detail exported");
                    }
                }
            }
        }
        Commands::ListStations { source } => {
            let client = BasicClient::new();
            let mut cache = SourceCache::new();
            let bytes = cache.load(&client, &source).await?;

            let directory = parse_station_directory(&bytes)?;
            let names = StationNames::from_directory(&directory)?;

            info!(total = names.len(), "station directory resolved");
            for (station_id, provider, name) in names.iter() {
                info!(
                    station_id = %station_id,
                    provider = %provider,
                    name = name.unwrap_or("<unnamed>"),
                    "station"
                );
            }
        }
    }

    Ok(())
}

/// An empty flag list means the dimension is unfiltered.
fn to_set<T: Eq + Hash>(values: Vec<T>) -> Option<HashSet<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.into_iter().collect())
    }
}
