//! The analytical core: normalization, metric derivation, station-name
//! enrichment, filtering, and aggregation over charging sessions.
//!
//! Data flows one way: raw records -> [`normalize`] -> [`metrics`] ->
//! [`enrich`] -> [`filter`] -> [`aggregate`]. Each stage returns a new
//! collection; the built dataset is immutable and can be shared across
//! concurrent filtered views.

pub mod aggregate;
pub mod enrich;
pub mod filter;
pub mod metrics;
pub mod normalize;
pub mod types;
pub mod utility;

use crate::error::Result;
use crate::model::RawSessionRecord;
use crate::pipeline::types::SessionRow;
use crate::stations::StationNames;

/// Builds the full session dataset from raw records and a resolved station
/// directory. Recomputed from scratch whenever the raw inputs change.
///
/// # Errors
///
/// Propagates normalization failures; a single malformed record aborts the
/// build.
pub fn build_dataset(
    records: &[RawSessionRecord],
    names: &StationNames,
) -> Result<Vec<SessionRow>> {
    let normalized = normalize::normalize_records(records)?;
    let derived = metrics::derive_rows(normalized);
    Ok(enrich::attach_station_names(derived, names))
}
