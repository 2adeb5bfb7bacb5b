//! Raw input record types as received from the session log and station
//! directory sources.
//!
//! Every session field is optional at this boundary; presence is validated
//! during normalization so a missing field becomes a declared error instead
//! of a decode failure with no row context.

use serde::Deserialize;

/// Wrapper around Mongo extended-JSON date fields (`{"$date": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct DateWrapper {
    #[serde(rename = "$date")]
    pub value: DateRepr,
}

/// The shapes a `$date` payload shows up in: RFC 3339 text, epoch
/// milliseconds, or the `$numberLong` string form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateRepr {
    Text(String),
    Millis(i64),
    Long {
        #[serde(rename = "$numberLong")]
        millis: String,
    },
}

/// A scalar the upstream producer emits either as a JSON number, a string,
/// a boolean, or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexScalar {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl FlexScalar {
    /// Numeric view of the scalar, parsing string payloads.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexScalar::Number(n) => Some(*n),
            FlexScalar::Text(s) => s.trim().parse().ok(),
            FlexScalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FlexScalar::Null => None,
        }
    }

    /// Display label used for grouping keys and id fallbacks. Whole numbers
    /// render without a trailing `.0` so `123` and `"123"` produce the same
    /// key.
    pub fn label(&self) -> String {
        match self {
            FlexScalar::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                format!("{}", *n as i64)
            }
            FlexScalar::Number(n) => n.to_string(),
            FlexScalar::Text(s) => s.clone(),
            FlexScalar::Bool(b) => b.to_string(),
            FlexScalar::Null => String::new(),
        }
    }
}

/// GeoJSON-style point carried on each session record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub coordinates: Vec<FlexScalar>,
}

/// One session record as found in the session log document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSessionRecord {
    pub station_id: Option<FlexScalar>,
    pub source: Option<String>,
    pub start_charging_time: Option<DateWrapper>,
    pub end_charging_time: Option<DateWrapper>,
    pub location: Option<RawLocation>,
    pub estimate_power: Option<FlexScalar>,
    pub efficiency: Option<FlexScalar>,
    pub price: Option<FlexScalar>,
    #[serde(rename = "type")]
    pub charger_type: Option<String>,
}

/// One entry of the station directory. `name_obj` is a JSON-encoded string
/// (double-encoded upstream), decoded by [`crate::stations::StationNames`].
#[derive(Debug, Clone, Deserialize)]
pub struct StationDirectoryEntry {
    pub id: FlexScalar,
    pub source: String,
    pub name_obj: String,
}

/// Top-level shape of the station directory document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStationDirectory {
    pub station: Vec<StationDirectoryEntry>,
}
