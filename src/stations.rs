//! Station directory resolver.
//!
//! Builds a lookup from (station id, provider) to a display name. The
//! `name_obj` field arrives double-encoded: a JSON string whose payload is
//! itself a JSON object with optional `th` and `en` keys. The Thai name wins
//! when present and non-empty, otherwise the English one.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{InsightError, Result};
use crate::model::RawStationDirectory;

#[derive(Debug, Deserialize)]
struct LocalizedName {
    th: Option<String>,
    en: Option<String>,
}

/// Lookup table from (station id, provider) to resolved display name.
///
/// `None` values mean the directory entry exists but carries no usable name;
/// enrichment falls back to the station id in that case.
#[derive(Debug, Default)]
pub struct StationNames {
    names: HashMap<(String, String), Option<String>>,
}

impl StationNames {
    /// Builds the lookup from a decoded station directory.
    ///
    /// Duplicate (id, source) keys keep the first entry seen, matching left
    /// join semantics downstream.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::DataFormat`] when a `name_obj` payload is not
    /// valid embedded JSON.
    pub fn from_directory(directory: &RawStationDirectory) -> Result<Self> {
        let mut names = HashMap::new();

        for (idx, entry) in directory.station.iter().enumerate() {
            let parsed: LocalizedName =
                serde_json::from_str(&entry.name_obj).map_err(|e| InsightError::DataFormat {
                    row: idx,
                    field: "name_obj",
                    message: e.to_string(),
                })?;

            let resolved = parsed
                .th
                .filter(|name| !name.is_empty())
                .or(parsed.en)
                .filter(|name| !name.is_empty());

            names
                .entry((entry.id.label(), entry.source.clone()))
                .or_insert(resolved);
        }

        debug!(stations = names.len(), "station directory resolved");
        Ok(Self { names })
    }

    /// Pure lookup of the display name for a station.
    pub fn resolve(&self, station_id: &str, source: &str) -> Option<&str> {
        self.names
            .get(&(station_id.to_string(), source.to_string()))
            .and_then(|name| name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over all `(station_id, source, name)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Option<&str>)> {
        self.names
            .iter()
            .map(|((id, source), name)| (id.as_str(), source.as_str(), name.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_station_directory;

    fn directory(doc: &str) -> RawStationDirectory {
        parse_station_directory(doc.as_bytes()).unwrap()
    }

    #[test]
    fn test_thai_name_preferred() {
        let dir = directory(
            r#"{"station": [{"id": "ST-1", "source": "pea",
                "name_obj": "{\"th\": \"สถานีทดสอบ\", \"en\": \"Test Station\"}"}]}"#,
        );
        let names = StationNames::from_directory(&dir).unwrap();
        assert_eq!(names.resolve("ST-1", "pea"), Some("สถานีทดสอบ"));
    }

    #[test]
    fn test_english_fallback_when_thai_missing() {
        let dir = directory(
            r#"{"station": [{"id": "ST-1", "source": "pea",
                "name_obj": "{\"en\": \"Test Station\"}"}]}"#,
        );
        let names = StationNames::from_directory(&dir).unwrap();
        assert_eq!(names.resolve("ST-1", "pea"), Some("Test Station"));
    }

    #[test]
    fn test_english_fallback_when_thai_empty() {
        let dir = directory(
            r#"{"station": [{"id": "ST-1", "source": "pea",
                "name_obj": "{\"th\": \"\", \"en\": \"Test Station\"}"}]}"#,
        );
        let names = StationNames::from_directory(&dir).unwrap();
        assert_eq!(names.resolve("ST-1", "pea"), Some("Test Station"));
    }

    #[test]
    fn test_empty_name_obj_resolves_to_none() {
        let dir = directory(
            r#"{"station": [{"id": "ST-1", "source": "pea", "name_obj": "{}"}]}"#,
        );
        let names = StationNames::from_directory(&dir).unwrap();
        assert_eq!(names.resolve("ST-1", "pea"), None);
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_duplicate_keys_keep_first_entry() {
        let dir = directory(
            r#"{"station": [
                {"id": "ST-1", "source": "pea", "name_obj": "{\"en\": \"First\"}"},
                {"id": "ST-1", "source": "pea", "name_obj": "{\"en\": \"Second\"}"}
            ]}"#,
        );
        let names = StationNames::from_directory(&dir).unwrap();
        assert_eq!(names.resolve("ST-1", "pea"), Some("First"));
    }

    #[test]
    fn test_numeric_id_matches_string_lookup() {
        let dir = directory(
            r#"{"station": [{"id": 42, "source": "pea", "name_obj": "{\"en\": \"Answer\"}"}]}"#,
        );
        let names = StationNames::from_directory(&dir).unwrap();
        assert_eq!(names.resolve("42", "pea"), Some("Answer"));
    }

    #[test]
    fn test_invalid_name_obj_is_data_format_error() {
        let dir = directory(
            r#"{"station": [{"id": "ST-1", "source": "pea", "name_obj": "not json"}]}"#,
        );
        let err = StationNames::from_directory(&dir).unwrap_err();
        assert!(matches!(err, InsightError::DataFormat { field: "name_obj", .. }));
    }

    #[test]
    fn test_unknown_station_misses() {
        let names = StationNames::default();
        assert_eq!(names.resolve("ST-404", "pea"), None);
    }
}
