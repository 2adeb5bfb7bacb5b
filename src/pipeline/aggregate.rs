//! Aggregation over the filtered session set: KPI scalars, daily and
//! weekday averages, station rollups, categorical breakdowns, and the
//! geographic handoff.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::pipeline::types::{
    Breakdowns, DailyAverages, HeatPoint, HeatmapLayer, Kpis, Report, SessionRow, StationDensity,
    StationSummary, WeekdayRow, WeekdayStats, WEEKDAY_ORDER,
};
use crate::pipeline::utility::{nan_max, nan_mean};

/// Computes the full report for one filtered view.
pub fn build_report(rows: &[&SessionRow]) -> Report {
    Report {
        kpis: kpis(rows),
        daily: daily_averages(rows),
        weekday: weekday_summary(rows),
        stations: station_summary(rows),
        breakdowns: breakdowns(rows),
        heatmap: heatmap_layer(rows),
    }
}

/// Headline scalars. Means and max skip NaN durations and powers; an
/// all-NaN column yields NaN.
pub fn kpis(rows: &[&SessionRow]) -> Kpis {
    Kpis {
        total_sessions: rows.len(),
        avg_duration_hours: nan_mean(rows.iter().map(|r| r.duration_hour)),
        avg_effective_power: nan_mean(rows.iter().map(|r| r.effective_power)),
        max_effective_power: nan_max(rows.iter().map(|r| r.effective_power)),
    }
}

/// Per-calendar-day session counts and mean durations, averaged across all
/// observed dates.
pub fn daily_averages(rows: &[&SessionRow]) -> DailyAverages {
    let mut per_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for row in rows {
        per_day.entry(row.date).or_default().push(row.duration_hour);
    }

    let counts: Vec<f64> = per_day.values().map(|d| d.len() as f64).collect();
    let day_means: Vec<f64> = per_day
        .values()
        .map(|d| nan_mean(d.iter().copied()))
        .collect();

    DailyAverages {
        avg_sessions_per_day: nan_mean(counts),
        avg_duration_per_day: nan_mean(day_means),
    }
}

/// Two-stage weekday averaging: per-day session counts first, then the
/// average of those counts across the calendar instances of each weekday.
/// This normalizes by the number of distinct days observed per weekday
/// instead of the raw row count. Duration and power are plain NaN-skipping
/// means over the weekday's rows. Output is fixed Monday..Sunday order with
/// `None` for absent weekdays.
pub fn weekday_summary(rows: &[&SessionRow]) -> Vec<WeekdayRow> {
    let mut day_counts: HashMap<(&str, NaiveDate), usize> = HashMap::new();
    let mut durations: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut powers: HashMap<&str, Vec<f64>> = HashMap::new();

    for row in rows {
        let weekday = row.weekday_name.as_str();
        *day_counts.entry((weekday, row.date)).or_default() += 1;
        durations.entry(weekday).or_default().push(row.duration_hour);
        powers.entry(weekday).or_default().push(row.effective_power);
    }

    WEEKDAY_ORDER
        .iter()
        .map(|&weekday| {
            let counts: Vec<f64> = day_counts
                .iter()
                .filter(|((name, _), _)| *name == weekday)
                .map(|(_, count)| *count as f64)
                .collect();

            let stats = if counts.is_empty() {
                None
            } else {
                Some(WeekdayStats {
                    avg_sessions_per_day: nan_mean(counts),
                    avg_duration_hours: nan_mean(durations[weekday].iter().copied()),
                    avg_effective_power: nan_mean(powers[weekday].iter().copied()),
                })
            };

            WeekdayRow { weekday, stats }
        })
        .collect()
}

/// Per-station rollup, groups emitted in name order and then stably sorted
/// descending by session count (ties keep name order).
pub fn station_summary(rows: &[&SessionRow]) -> Vec<StationSummary> {
    let mut groups: BTreeMap<&str, (usize, Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.station_name.as_str()).or_default();
        entry.0 += 1;
        entry.1.push(row.duration_hour);
        entry.2.push(row.effective_power);
    }

    let mut summaries: Vec<StationSummary> = groups
        .into_iter()
        .map(|(name, (sessions, durations, powers))| StationSummary {
            station_name: name.to_string(),
            sessions,
            avg_duration_hours: nan_mean(durations),
            avg_effective_power: nan_mean(powers),
        })
        .collect();

    summaries.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    summaries
}

/// Categorical frequency and mean tables over hour, region, charger type,
/// and price, keyed in sorted order.
pub fn breakdowns(rows: &[&SessionRow]) -> Breakdowns {
    let mut sessions_by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    let mut sessions_by_region: BTreeMap<String, usize> = BTreeMap::new();
    let mut power_by_type: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut sessions_by_price: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        *sessions_by_hour.entry(row.start_hour).or_default() += 1;
        *sessions_by_region
            .entry(row.region.to_string())
            .or_default() += 1;
        power_by_type
            .entry(row.charger_type.clone())
            .or_default()
            .push(row.effective_power);
        *sessions_by_price.entry(row.price.clone()).or_default() += 1;
    }

    Breakdowns {
        sessions_by_hour,
        sessions_by_region,
        avg_power_by_type: power_by_type
            .into_iter()
            .map(|(charger_type, powers)| (charger_type, nan_mean(powers)))
            .collect(),
        sessions_by_price,
    }
}

/// Geographic handoff: one point per filtered row, a view center at the
/// mean coordinates, and a per-coordinate station density rollup.
pub fn heatmap_layer(rows: &[&SessionRow]) -> HeatmapLayer {
    let points = rows
        .iter()
        .map(|r| HeatPoint {
            longitude: r.longitude,
            latitude: r.latitude,
        })
        .collect();

    // f64 is not hashable; key on the bit patterns, which is exact for the
    // repeated coordinates a station emits
    let mut groups: HashMap<(&str, u64, u64), usize> = HashMap::new();
    for row in rows {
        *groups
            .entry((
                row.station_name.as_str(),
                row.latitude.to_bits(),
                row.longitude.to_bits(),
            ))
            .or_default() += 1;
    }

    let mut station_density: Vec<StationDensity> = groups
        .into_iter()
        .map(|((name, lat, lon), sessions)| StationDensity {
            station_name: name.to_string(),
            latitude: f64::from_bits(lat),
            longitude: f64::from_bits(lon),
            sessions,
        })
        .collect();
    station_density.sort_by(|a, b| {
        a.station_name
            .cmp(&b.station_name)
            .then(a.latitude.total_cmp(&b.latitude))
            .then(a.longitude.total_cmp(&b.longitude))
    });

    HeatmapLayer {
        points,
        center_latitude: nan_mean(rows.iter().map(|r| r.latitude)),
        center_longitude: nan_mean(rows.iter().map(|r| r.longitude)),
        station_density,
    }
}

/// Session detail listing for the table/CSV view: newest first, stable.
pub fn session_detail<'a>(rows: &[&'a SessionRow]) -> Vec<&'a SessionRow> {
    let mut detail = rows.to_vec();
    detail.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    detail
}
