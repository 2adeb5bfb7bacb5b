//! Derived metrics: pure per-row computation of duration, effective power,
//! temporal buckets, and region.

use chrono::{Datelike, Timelike};

use crate::pipeline::types::{weekday_name, NormalizedRow, Region, SessionRow};

/// Buckets a latitude into a coarse region.
///
/// | Latitude        | Region  |
/// |-----------------|---------|
/// | > 17            | North   |
/// | > 13 and <= 17  | Central |
/// | <= 13           | South   |
pub fn region_for_latitude(latitude: f64) -> Region {
    if latitude > 17.0 {
        Region::North
    } else if latitude > 13.0 {
        Region::Central
    } else {
        Region::South
    }
}

/// Derives the full session row from a normalized one. Deterministic and
/// side-effect free; a missing end time yields NaN duration rather than an
/// error.
pub fn derive_row(row: NormalizedRow) -> SessionRow {
    let duration_hour = match row.end_time {
        Some(end) => (end - row.start_time).num_milliseconds() as f64 / 3_600_000.0,
        None => f64::NAN,
    };

    SessionRow {
        station_name: row.station_id.clone(),
        station_id: row.station_id,
        source: row.source,
        duration_hour,
        effective_power: row.estimate_power * row.efficiency,
        start_hour: row.start_time.hour(),
        date: row.start_time.date(),
        weekday_name: weekday_name(row.start_time.weekday()).to_string(),
        region: region_for_latitude(row.latitude),
        start_time: row.start_time,
        end_time: row.end_time,
        longitude: row.longitude,
        latitude: row.latitude,
        estimate_power: row.estimate_power,
        efficiency: row.efficiency,
        price: row.price,
        charger_type: row.charger_type,
    }
}

pub fn derive_rows(rows: Vec<NormalizedRow>) -> Vec<SessionRow> {
    rows.into_iter().map(derive_row).collect()
}
