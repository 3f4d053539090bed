//! Result set store and derived presentation state.
//!
//! Owns the records of the most recent query. The set is replaced
//! wholesale on every load, never merged; the loading flag, the warning
//! banner and the drawer visibility live alongside it because they are
//! derived from the query lifecycle.

use crate::model::{self, CrimeRecord};
use eframe::egui::Color32;

/// Fixed category palette. The API category set is open-ended; unmapped
/// categories fall back to [`FALLBACK_COLOR`].
const CATEGORY_COLORS: &[(&str, Color32)] = &[
    ("anti-social-behaviour", Color32::from_rgb(0xec, 0x48, 0x99)),
    ("bicycle-theft", Color32::from_rgb(0xf5, 0x9e, 0x0b)),
    ("burglary", Color32::from_rgb(0x7c, 0x3a, 0xed)),
    ("criminal-damage-arson", Color32::from_rgb(0xdc, 0x26, 0x26)),
    ("drugs", Color32::from_rgb(0x05, 0x96, 0x69)),
    ("other-theft", Color32::from_rgb(0x63, 0x66, 0xf1)),
    ("possession-of-weapons", Color32::from_rgb(0xb9, 0x1c, 0x1c)),
    ("public-order", Color32::from_rgb(0xea, 0x58, 0x0c)),
    ("robbery", Color32::from_rgb(0x9f, 0x12, 0x39)),
    ("shoplifting", Color32::from_rgb(0x25, 0x63, 0xeb)),
    ("theft-from-the-person", Color32::from_rgb(0x4f, 0x46, 0xe5)),
    ("vehicle-crime", Color32::from_rgb(0x08, 0x91, 0xb2)),
    ("violent-crime", Color32::from_rgb(0x7f, 0x1d, 0x1d)),
    ("other-crime", Color32::from_rgb(0x52, 0x52, 0x5b)),
];

/// Marker color for categories outside the known mapping.
pub const FALLBACK_COLOR: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a);

/// Display color for a crime category slug.
pub fn category_color(category: &str) -> Color32 {
    CATEGORY_COLORS
        .iter()
        .find(|(slug, _)| *slug == category)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Legend rows shown in the dashboard panel.
pub fn legend() -> impl Iterator<Item = (&'static str, Color32)> {
    CATEGORY_COLORS.iter().copied()
}

#[derive(Default)]
pub struct ResultStore {
    records: Vec<CrimeRecord>,
    loading: bool,
    drawer_open: bool,
    warning: Option<String>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CrimeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Pending user-visible warning (the too-many-results banner).
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn set_warning(&mut self, warning: impl Into<String>) {
        self.warning = Some(warning.into());
    }

    pub fn dismiss_warning(&mut self) {
        self.warning = None;
    }

    /// Replaces the whole result set and ends the loading state.
    ///
    /// Results are never merged in place; each query owns the set it
    /// produced.
    pub fn replace(&mut self, records: Vec<CrimeRecord>) {
        self.records = records;
        self.loading = false;
        log::debug!(
            "data summary: {} crimes, {} unique locations",
            self.records.len(),
            self.unique_location_count()
        );
    }

    /// Number of distinct coordinate pairs, for diagnostics. Duplicated
    /// anchor points mean this is usually below the record count.
    pub fn unique_location_count(&self) -> usize {
        model::unique_location_count(&self.records)
    }

    /// Resets records, loading flag, warning and drawer in one step.
    pub fn clear(&mut self) {
        self.records.clear();
        self.loading = false;
        self.drawer_open = false;
        self.warning = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, Street};

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
    fn known_categories_map_to_their_palette_entry() {
        assert_eq!(
            category_color("burglary"),
            Color32::from_rgb(0x7c, 0x3a, 0xed)
        );
        assert_eq!(
            category_color("violent-crime"),
            Color32::from_rgb(0x7f, 0x1d, 0x1d)
        );
    }

    #[test]
    fn unknown_categories_fall_back_to_the_default_color() {
        assert_eq!(category_color("paleontological-crime"), FALLBACK_COLOR);
        assert_eq!(category_color(""), FALLBACK_COLOR);
    }

    #[test]
    fn replace_swaps_the_set_and_clears_loading() {
        let mut store = ResultStore::new();
        store.set_loading(true);

        store.replace(vec![record("drugs", "52.63", "-1.13")]);

        assert_eq!(store.len(), 1);
        assert!(!store.loading());

        store.replace(Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn unique_locations_count_distinct_pairs_not_records() {
        let mut store = ResultStore::new();
        store.replace(vec![
            record("drugs", "52.63", "-1.13"),
            record("burglary", "52.63", "-1.13"),
            record("robbery", "52.63", "-1.14"),
            record("drugs", "52.64", "-1.13"),
        ]);

        assert_eq!(store.len(), 4);
        assert_eq!(store.unique_location_count(), 3);
    }

    #[test]
    fn clear_resets_presentation_state_atomically() {
        let mut store = ResultStore::new();
        store.replace(vec![record("drugs", "52.63", "-1.13")]);
        store.set_drawer_open(true);
        store.set_loading(true);
        store.set_warning("too many crimes");

        store.clear();

        assert!(store.is_empty());
        assert!(!store.loading());
        assert!(!store.drawer_open());
        assert!(store.warning().is_none());
    }
}
