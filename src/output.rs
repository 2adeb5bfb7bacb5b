//! Report rendering and export for the presentation side.
//!
//! Supports structured log rendering, JSON serialization, and a CSV export
//! of the session detail listing.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::aggregate::session_detail;
use crate::pipeline::types::{Report, SessionRow};
use csv::WriterBuilder;

/// Logs the full report as pretty-printed JSON.
pub fn print_json(report: &Report) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Renders the report section by section as structured log lines, mirroring
/// the dashboard layout: KPIs, daily averages, weekday table, station
/// summary, breakdowns, map center.
pub fn log_report(report: &Report) {
    let k = &report.kpis;
    info!(
        total_sessions = k.total_sessions,
        avg_duration_hours = round2(k.avg_duration_hours),
        avg_effective_power = round2(k.avg_effective_power),
        max_effective_power = round2(k.max_effective_power),
        "performance overview"
    );

    info!(
        avg_sessions_per_day = round2(report.daily.avg_sessions_per_day),
        avg_duration_per_day = round2(report.daily.avg_duration_per_day),
        "daily averages"
    );

    for row in &report.weekday {
        match &row.stats {
            Some(stats) => info!(
                weekday = row.weekday,
                avg_sessions_per_day = round2(stats.avg_sessions_per_day),
                avg_duration_hours = round2(stats.avg_duration_hours),
                avg_effective_power = round2(stats.avg_effective_power),
                "weekday summary"
            ),
            None => info!(weekday = row.weekday, "weekday summary (no sessions)"),
        }
    }

    for station in &report.stations {
        info!(
            station = %station.station_name,
            sessions = station.sessions,
            avg_duration_hours = round2(station.avg_duration_hours),
            avg_effective_power = round2(station.avg_effective_power),
            "station summary"
        );
    }

    for (hour, sessions) in &report.breakdowns.sessions_by_hour {
        info!(hour, sessions, "sessions by hour");
    }
    for (region, sessions) in &report.breakdowns.sessions_by_region {
        info!(region, sessions, "sessions by region");
    }
    for (charger_type, avg_power) in &report.breakdowns.avg_power_by_type {
        info!(charger_type, avg_power = round2(*avg_power), "power by type");
    }
    for (price, sessions) in &report.breakdowns.sessions_by_price {
        info!(price, sessions, "price distribution");
    }

    info!(
        center_latitude = report.heatmap.center_latitude,
        center_longitude = report.heatmap.center_longitude,
        points = report.heatmap.points.len(),
        "heat map layer"
    );
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Columns of the session detail CSV, matching the dashboard's table view.
#[derive(Debug, Serialize)]
struct SessionDetailRecord<'a> {
    station_name: &'a str,
    source: &'a str,
    start_time: NaiveDateTime,
    duration_hour: f64,
    effective_power: f64,
    price: &'a str,
}

/// Writes the session detail listing (newest first) as a CSV file,
/// overwriting any previous export at `path`.
pub fn export_session_detail(path: &str, rows: &[&SessionRow]) -> Result<()> {
    debug!(path, rows = rows.len(), "writing session detail CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    for row in session_detail(rows) {
        writer.serialize(SessionDetailRecord {
            station_name: &row.station_name,
            source: &row.source,
            start_time: row.start_time,
            duration_hour: row.duration_hour,
            effective_power: row.effective_power,
            price: &row.price,
        })?;
    }
    writer.flush()?;

    Ok(())
}
