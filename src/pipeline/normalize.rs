//! Session record normalization: raw nested records to flat, typed rows.
//!
//! A malformed record aborts the whole run; the error names the record index
//! and field so the source data can be fixed.

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

use crate::error::{InsightError, Result};
use crate::model::{DateRepr, DateWrapper, FlexScalar, RawSessionRecord};
use crate::pipeline::types::NormalizedRow;

/// Normalizes a batch of raw session records.
///
/// # Errors
///
/// Returns [`InsightError::DataFormat`] for malformed timestamps or
/// coordinates and [`InsightError::TypeConversion`] for non-numeric power or
/// efficiency fields.
pub fn normalize_records(records: &[RawSessionRecord]) -> Result<Vec<NormalizedRow>> {
    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        rows.push(normalize_record(idx, record)?);
    }
    debug!(rows = rows.len(), "session records normalized");
    Ok(rows)
}

fn normalize_record(idx: usize, record: &RawSessionRecord) -> Result<NormalizedRow> {
    let station_id = record
        .station_id
        .as_ref()
        .ok_or_else(|| missing(idx, "station_id"))?
        .label();
    let source = record
        .source
        .clone()
        .ok_or_else(|| missing(idx, "source"))?;

    // start is required to derive hour/date/weekday; a missing end is a
    // still-running or truncated session and yields NaN duration downstream
    let start_time = match &record.start_charging_time {
        Some(wrapper) => parse_timestamp(idx, "start_charging_time", wrapper)?,
        None => return Err(missing(idx, "start_charging_time")),
    };
    let end_time = match &record.end_charging_time {
        Some(wrapper) => Some(parse_timestamp(idx, "end_charging_time", wrapper)?),
        None => None,
    };

    let location = record
        .location
        .as_ref()
        .ok_or_else(|| missing(idx, "location"))?;
    let (longitude, latitude) = split_coordinates(idx, &location.coordinates)?;

    let estimate_power = coerce_f64(idx, "estimate_power", record.estimate_power.as_ref())?;
    let efficiency = coerce_f64(idx, "efficiency", record.efficiency.as_ref())?;

    Ok(NormalizedRow {
        station_id,
        source,
        start_time,
        end_time,
        longitude,
        latitude,
        estimate_power,
        efficiency,
        price: record.price.as_ref().map(FlexScalar::label).unwrap_or_default(),
        charger_type: record.charger_type.clone().unwrap_or_default(),
    })
}

/// Parses an embedded date wrapper into a naive timestamp, keeping the
/// wall-clock time of the source offset (timezone stripped, not converted).
fn parse_timestamp(idx: usize, field: &'static str, wrapper: &DateWrapper) -> Result<NaiveDateTime> {
    match &wrapper.value {
        DateRepr::Text(text) => DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
            .map_err(|e| InsightError::DataFormat {
                row: idx,
                field,
                message: format!("{text:?}: {e}"),
            }),
        DateRepr::Millis(millis) => millis_to_naive(idx, field, *millis),
        DateRepr::Long { millis } => {
            let millis: i64 = millis.parse().map_err(|_| InsightError::DataFormat {
                row: idx,
                field,
                message: format!("invalid $numberLong payload {millis:?}"),
            })?;
            millis_to_naive(idx, field, millis)
        }
    }
}

fn millis_to_naive(idx: usize, field: &'static str, millis: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| InsightError::DataFormat {
            row: idx,
            field,
            message: format!("epoch millis {millis} out of range"),
        })
}

/// Positional split of `location.coordinates`: index 0 is longitude,
/// index 1 is latitude.
fn split_coordinates(idx: usize, coordinates: &[FlexScalar]) -> Result<(f64, f64)> {
    if coordinates.len() != 2 {
        return Err(InsightError::DataFormat {
            row: idx,
            field: "location.coordinates",
            message: format!("expected 2 elements, found {}", coordinates.len()),
        });
    }
    let longitude = coordinate_value(idx, &coordinates[0])?;
    let latitude = coordinate_value(idx, &coordinates[1])?;
    Ok((longitude, latitude))
}

fn coordinate_value(idx: usize, value: &FlexScalar) -> Result<f64> {
    value.as_f64().ok_or_else(|| InsightError::DataFormat {
        row: idx,
        field: "location.coordinates",
        message: format!("non-numeric element {:?}", value.label()),
    })
}

/// Coerces a possibly-string numeric field. A missing or null field becomes
/// NaN (the producer omits these for some providers); anything non-numeric
/// is a conversion error.
fn coerce_f64(idx: usize, field: &'static str, value: Option<&FlexScalar>) -> Result<f64> {
    match value {
        None | Some(FlexScalar::Null) => Ok(f64::NAN),
        Some(scalar) => scalar.as_f64().ok_or_else(|| InsightError::TypeConversion {
            row: idx,
            field,
            value: scalar.label(),
        }),
    }
}

fn missing(row: usize, field: &'static str) -> InsightError {
    InsightError::DataFormat {
        row,
        field,
        message: "field is missing".to_string(),
    }
}
