//! Data types flowing through the analytical pipeline.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Canonical weekday display order for summaries (Monday first).
pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Canonical English name for a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Coarse geographic bucket derived from latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    North,
    Central,
    South,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::Central => "Central",
            Region::South => "South",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "North" => Ok(Region::North),
            "Central" => Ok(Region::Central),
            "South" => Ok(Region::South),
            other => Err(format!("unknown region {other:?} (expected North, Central, or South)")),
        }
    }
}

/// A session record after normalization: flattened, typed fields, before any
/// derived metrics.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub station_id: String,
    pub source: String,
    /// Naive local timestamp, timezone stripped after parsing.
    pub start_time: NaiveDateTime,
    /// `None` when the session has no recorded end; duration becomes NaN.
    pub end_time: Option<NaiveDateTime>,
    pub longitude: f64,
    pub latitude: f64,
    pub estimate_power: f64,
    pub efficiency: f64,
    pub price: String,
    pub charger_type: String,
}

/// A fully derived session row, ready for filtering and aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRow {
    pub station_id: String,
    /// Resolved display name; falls back to `station_id` when the station
    /// directory has no usable match.
    pub station_name: String,
    pub source: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Hours between start and end. NaN when the end is missing; negative
    /// values are propagated as-is.
    pub duration_hour: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub estimate_power: f64,
    pub efficiency: f64,
    pub effective_power: f64,
    pub start_hour: u32,
    pub date: NaiveDate,
    pub weekday_name: String,
    pub region: Region,
    pub price: String,
    pub charger_type: String,
}

/// The user's current filter panel state. `None` dimensions are unfiltered,
/// matching the dashboard's everything-selected defaults.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    pub providers: Option<HashSet<String>>,
    pub stations: Option<HashSet<String>>,
    /// Inclusive calendar date range over the session start date.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Inclusive start-hour range, 0..=23.
    pub hour_range: (u32, u32),
    pub regions: Option<HashSet<Region>>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            providers: None,
            stations: None,
            date_range: None,
            hour_range: (0, 23),
            regions: None,
        }
    }
}

/// Result of applying a filter selection. An empty match is a normal
/// terminal state, not an error; callers skip aggregation and surface a
/// no-data message.
#[derive(Debug)]
pub enum FilterOutcome<'a> {
    Rows(Vec<&'a SessionRow>),
    Empty,
}

/// Headline scalars for the filtered set. Means and max skip NaN values;
/// all-NaN input yields NaN, never zero.
#[derive(Debug, Serialize)]
pub struct Kpis {
    pub total_sessions: usize,
    pub avg_duration_hours: f64,
    pub avg_effective_power: f64,
    pub max_effective_power: f64,
}

/// Per-calendar-day averages across the filtered set.
#[derive(Debug, Serialize)]
pub struct DailyAverages {
    pub avg_sessions_per_day: f64,
    pub avg_duration_per_day: f64,
}

/// Averages for one weekday slot of the Monday..Sunday table.
#[derive(Debug, Serialize)]
pub struct WeekdayStats {
    /// Per-day session counts averaged across calendar instances of this
    /// weekday, not a naive row-count average.
    pub avg_sessions_per_day: f64,
    pub avg_duration_hours: f64,
    pub avg_effective_power: f64,
}

/// One row of the weekday summary table. `stats` is `None` when the weekday
/// never occurs in the filtered set.
#[derive(Debug, Serialize)]
pub struct WeekdayRow {
    pub weekday: &'static str,
    pub stats: Option<WeekdayStats>,
}

/// Per-station rollup, sorted descending by session count.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub station_name: String,
    pub sessions: usize,
    pub avg_duration_hours: f64,
    pub avg_effective_power: f64,
}

/// Simple categorical frequency and mean tables, keyed in sorted order.
#[derive(Debug, Serialize)]
pub struct Breakdowns {
    pub sessions_by_hour: BTreeMap<u32, usize>,
    pub sessions_by_region: BTreeMap<String, usize>,
    pub avg_power_by_type: BTreeMap<String, f64>,
    pub sessions_by_price: BTreeMap<String, usize>,
}

/// One point of the geographic heat map layer.
#[derive(Debug, Serialize)]
pub struct HeatPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Session density for one station coordinate.
#[derive(Debug, Serialize)]
pub struct StationDensity {
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sessions: usize,
}

/// Geographic handoff for the map renderer: raw density points, a view
/// center, and a per-coordinate rollup.
#[derive(Debug, Serialize)]
pub struct HeatmapLayer {
    pub points: Vec<HeatPoint>,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub station_density: Vec<StationDensity>,
}

/// Everything the presentation layer needs for one filtered view.
#[derive(Debug, Serialize)]
pub struct Report {
    pub kpis: Kpis,
    pub daily: DailyAverages,
    pub weekday: Vec<WeekdayRow>,
    pub stations: Vec<StationSummary>,
    pub breakdowns: Breakdowns,
    pub heatmap: HeatmapLayer,
}
