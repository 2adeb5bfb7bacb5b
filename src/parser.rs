//! JSON decoding for the two input documents.

use crate::error::Result;
use crate::model::{RawSessionRecord, RawStationDirectory};

/// Decodes the session log document: a top-level array of session records.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid JSON array of records.
pub fn parse_sessions(bytes: &[u8]) -> Result<Vec<RawSessionRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes the station directory document: an object with a top-level
/// `station` array.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or the `station` key is
/// missing.
pub fn parse_station_directory(bytes: &[u8]) -> Result<RawStationDirectory> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_session_array() {
        let records = parse_sessions(b"[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_invalid_bytes() {
        let result = parse_sessions(b"not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_minimal_session_record() {
        let doc = r#"[{"station_id": "ST-1", "source": "pea"}]"#;
        let records = parse_sessions(doc.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source.as_deref(), Some("pea"));
        assert!(records[0].start_charging_time.is_none());
    }

    #[test]
    fn test_parse_station_directory() {
        let doc = r#"{"station": [{"id": 7, "source": "pea", "name_obj": "{}"}]}"#;
        let directory = parse_station_directory(doc.as_bytes()).unwrap();
        assert_eq!(directory.station.len(), 1);
        assert_eq!(directory.station[0].source, "pea");
    }

    #[test]
    fn test_parse_station_directory_missing_key() {
        let result = parse_station_directory(b"{}");
        assert!(result.is_err());
    }
}
