//! Data model for the data.police.uk street crime API.
//!
//! The wire types mirror the JSON the API actually returns: coordinates
//! arrive as strings, outcome status may be null, and the category set is
//! open-ended. Records are immutable once received and have no stable
//! identity beyond their position in the result set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A WGS-84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single street-level crime as returned by the API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CrimeRecord {
    /// Machine category slug, e.g. `"bicycle-theft"`. Open set.
    pub category: String,
    pub location: Location,
    /// Month the crime was reported, `YYYY-MM`.
    pub month: String,
    /// Latest investigation outcome; absent while the case is open.
    #[serde(default)]
    pub outcome_status: Option<OutcomeStatus>,
}

/// Approximate location a record is anchored to.
///
/// The API serializes coordinates as JSON strings; use
/// [`CrimeRecord::coords`] for numeric access.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
    pub street: Street,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Street {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutcomeStatus {
    pub category: String,
}

impl CrimeRecord {
    /// Numeric coordinates, if the API sent parseable values.
    pub fn coords(&self) -> Option<LatLng> {
        let lat = self.location.latitude.parse().ok()?;
        let lng = self.location.longitude.parse().ok()?;
        Some(LatLng::new(lat, lng))
    }

    /// Human-readable category, e.g. `"bicycle theft"`.
    pub fn category_label(&self) -> String {
        self.category.replace('-', " ")
    }
}

/// Number of distinct coordinate pairs in a result set.
///
/// Several records frequently share one anchor point, so this is the number
/// of markers the map will actually show, not the number of crimes.
pub fn unique_location_count(records: &[CrimeRecord]) -> usize {
    records
        .iter()
        .map(|r| {
            (
                r.location.latitude.as_str(),
                r.location.longitude.as_str(),
            )
        })
        .collect::<HashSet<_>>()
        .len()
}

/// Checks the `YYYY-MM` month format the API accepts.
pub fn is_valid_month(month: &str) -> bool {
    let Some((year, month)) = month.split_once('-') else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 {
        return false;
    }
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(m) if (1..=12).contains(&m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, lat: &str, lng: &str) -> CrimeRecord {
        CrimeRecord {
            category: category.to_string(),
            location: Location {
                latitude: lat.to_string(),
                longitude: lng.to_string(),
                street: Street {
                    name: "On or near Test Street".to_string(),
                },
            },
            month: "2024-01".to_string(),
            outcome_status: None,
        }
    }

    #[test]
    fn coords_parse_string_coordinates() {
        let record = record("burglary", "52.63", "-1.13");
        assert_eq!(record.coords(), Some(LatLng::new(52.63, -1.13)));
    }

    #[test]
    fn coords_reject_unparseable_coordinates() {
        let record = record("burglary", "fifty-two", "-1.13");
        assert_eq!(record.coords(), None);
    }

    #[test]
    fn unique_location_count_collapses_duplicates() {
        let records = vec![
            record("burglary", "52.63", "-1.13"),
            record("drugs", "52.63", "-1.13"),
            record("robbery", "52.64", "-1.13"),
        ];
        assert_eq!(records.len(), 3);
        assert_eq!(unique_location_count(&records), 2);
    }

    #[test]
    fn deserializes_api_shaped_json() {
        let body = r#"{
            "category": "anti-social-behaviour",
            "location_type": "Force",
            "location": {
                "latitude": "52.636250",
                "street": {"id": 883344, "name": "On or near Shopping Area"},
                "longitude": "-1.133691"
            },
            "context": "",
            "outcome_status": null,
            "persistent_id": "",
            "id": 116627869,
            "location_subtype": "",
            "month": "2024-01"
        }"#;
        let record: CrimeRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.category, "anti-social-behaviour");
        assert_eq!(record.location.street.name, "On or near Shopping Area");
        assert!(record.outcome_status.is_none());
        assert!(record.coords().is_some());
    }

    #[test]
    fn month_validation_accepts_well_formed_months() {
        assert!(is_valid_month("2024-01"));
        assert!(is_valid_month("1999-12"));
    }

    #[test]
    fn month_validation_rejects_malformed_months() {
        assert!(!is_valid_month(""));
        assert!(!is_valid_month("2024"));
        assert!(!is_valid_month("2024-13"));
        assert!(!is_valid_month("2024-00"));
        assert!(!is_valid_month("24-01"));
        assert!(!is_valid_month("2024-1"));
        assert!(!is_valid_month("january"));
    }
}
