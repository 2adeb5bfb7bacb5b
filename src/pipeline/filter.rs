//! Filter engine: conjunction of the filter panel's independent predicates.

use tracing::debug;

use crate::pipeline::types::{FilterOutcome, FilterSelection, SessionRow};

impl FilterSelection {
    /// True when the row satisfies every selected predicate. Unselected
    /// dimensions (`None`) always pass.
    pub fn matches(&self, row: &SessionRow) -> bool {
        if let Some(providers) = &self.providers {
            if !providers.contains(&row.source) {
                return false;
            }
        }
        if let Some(stations) = &self.stations {
            if !stations.contains(&row.station_name) {
                return false;
            }
        }
        if let Some((from, to)) = self.date_range {
            if row.date < from || row.date > to {
                return false;
            }
        }
        let (from_hour, to_hour) = self.hour_range;
        if row.start_hour < from_hour || row.start_hour > to_hour {
            return false;
        }
        if let Some(regions) = &self.regions {
            if !regions.contains(&row.region) {
                return false;
            }
        }
        true
    }
}

/// Applies the selection to the dataset, preserving input order.
///
/// An empty match is a normal terminal state ([`FilterOutcome::Empty`]), not
/// an error; callers skip aggregation and surface a no-data message.
pub fn apply<'a>(rows: &'a [SessionRow], selection: &FilterSelection) -> FilterOutcome<'a> {
    let matched: Vec<&SessionRow> = rows.iter().filter(|row| selection.matches(row)).collect();
    debug!(input = rows.len(), matched = matched.len(), "filter applied");
    if matched.is_empty() {
        FilterOutcome::Empty
    } else {
        FilterOutcome::Rows(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::metrics::derive_row;
    use crate::pipeline::types::{NormalizedRow, Region};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashSet;

    fn session(station_id: &str, source: &str, start: &str, latitude: f64) -> SessionRow {
        derive_row(NormalizedRow {
            station_id: station_id.to_string(),
            source: source.to_string(),
            start_time: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap(),
            end_time: None,
            longitude: 100.5,
            latitude,
            estimate_power: 7.4,
            efficiency: 0.9,
            price: "5".to_string(),
            charger_type: "AC".to_string(),
        })
    }

    fn dataset() -> Vec<SessionRow> {
        vec![
            session("ST-1", "pea", "2026-03-02 08:30:00", 13.75),
            session("ST-2", "mea", "2026-03-03 14:00:00", 18.79),
            session("ST-3", "pea", "2026-03-05 22:15:00", 7.88),
        ]
    }

    fn set<T: std::hash::Hash + Eq>(values: impl IntoIterator<Item = T>) -> Option<HashSet<T>> {
        Some(values.into_iter().collect())
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_selection_keeps_everything() {
        let rows = dataset();
        match apply(&rows, &FilterSelection::default()) {
            FilterOutcome::Rows(matched) => assert_eq!(matched.len(), 3),
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_provider_predicate() {
        let rows = dataset();
        let selection = FilterSelection {
            providers: set(["pea".to_string()]),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => {
                assert_eq!(matched.len(), 2);
                assert!(matched.iter().all(|r| r.source == "pea"));
            }
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_station_predicate_by_display_name() {
        let rows = dataset();
        let selection = FilterSelection {
            stations: set(["ST-2".to_string()]),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => assert_eq!(matched[0].station_id, "ST-2"),
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let rows = dataset();
        let selection = FilterSelection {
            date_range: Some((date("2026-03-02"), date("2026-03-03"))),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => assert_eq!(matched.len(), 2),
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_hour_range_is_inclusive() {
        let rows = dataset();
        let selection = FilterSelection {
            hour_range: (8, 14),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => assert_eq!(matched.len(), 2),
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_region_predicate() {
        let rows = dataset();
        let selection = FilterSelection {
            regions: set([Region::South]),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => {
                assert_eq!(matched.len(), 1);
                assert_eq!(matched[0].station_id, "ST-3");
            }
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_predicates_combine_as_conjunction() {
        let rows = dataset();
        let selection = FilterSelection {
            providers: set(["pea".to_string()]),
            hour_range: (0, 12),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => {
                assert_eq!(matched.len(), 1);
                assert_eq!(matched[0].station_id, "ST-1");
            }
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let rows = dataset();
        let selection = FilterSelection {
            providers: set(["pea".to_string()]),
            ..Default::default()
        };
        match apply(&rows, &selection) {
            FilterOutcome::Rows(matched) => {
                assert_eq!(matched[0].station_id, "ST-1");
                assert_eq!(matched[1].station_id, "ST-3");
            }
            FilterOutcome::Empty => panic!("expected rows"),
        }
    }

    #[test]
    fn test_disjoint_providers_yield_empty_outcome() {
        let rows = dataset();
        let selection = FilterSelection {
            providers: set(["nobody".to_string()]),
            ..Default::default()
        };
        assert!(matches!(apply(&rows, &selection), FilterOutcome::Empty));
    }

    #[test]
    fn test_empty_dataset_yields_empty_outcome() {
        assert!(matches!(
            apply(&[], &FilterSelection::default()),
            FilterOutcome::Empty
        ));
    }
}
