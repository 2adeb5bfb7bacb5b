//! Station-name enrichment: left join of session rows against the station
//! directory.

use crate::pipeline::types::SessionRow;
use crate::stations::StationNames;

/// Attaches resolved display names to session rows.
///
/// Left join semantics: every input row produces exactly one output row. A
/// miss or an empty resolved name falls back to the stringified station id.
pub fn attach_station_names(rows: Vec<SessionRow>, names: &StationNames) -> Vec<SessionRow> {
    rows.into_iter()
        .map(|mut row| {
            row.station_name = match names.resolve(&row.station_id, &row.source) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => row.station_id.clone(),
            };
            row
        })
        .collect()
}
