use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::CountryGroups;
use crate::data::cache::{DatasetCache, DatasetSource};
use crate::data::filter::{filter_selection, SelectionStatus, SelectionView};
use crate::data::model::{DataStatus, MacroDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the central panel shows instead of the chart and table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNotice {
    /// The data file could not be loaded.
    LoadFailed(String),
    /// The dataset is fine but nothing matches the selection.
    NoData,
}

impl ViewNotice {
    pub fn text(&self) -> &str {
        match self {
            ViewNotice::LoadFailed(msg) => msg,
            ViewNotice::NoData => "No data available for the selected countries and year.",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load-once dataset; swapped out when the user opens another file.
    cache: DatasetCache,

    /// Named country groups offered in the side panel.
    pub groups: CountryGroups,

    /// Selected year (None while the dataset is empty).
    pub selected_year: Option<i32>,

    /// Name of the selected country group.
    pub selected_group: String,

    /// Countries ticked within the selected group.
    pub selected_countries: BTreeSet<String>,

    /// Rows matching the current selection (cached).
    pub view: SelectionView,
}

impl AppState {
    /// Load the dataset and select the latest year with every country of
    /// the first group.
    pub fn new(cache: DatasetCache, groups: CountryGroups) -> Self {
        let selected_group = groups.first_name().unwrap_or_default().to_string();
        let mut state = AppState {
            cache,
            groups,
            selected_year: None,
            selected_group,
            selected_countries: BTreeSet::new(),
            view: SelectionView::default(),
        };
        state.reset_selection();
        state
    }

    pub fn dataset(&self) -> Arc<MacroDataset> {
        self.cache.dataset()
    }

    pub fn source_name(&self) -> String {
        self.cache.source_name()
    }

    /// User-facing description of a failed load, if any.
    pub fn status_message(&self) -> Option<String> {
        match &self.dataset().status {
            DataStatus::Ready => None,
            DataStatus::SourceMissing(path) => Some(format!(
                "ERROR: data file '{}' not found.",
                path.display()
            )),
            DataStatus::Unreadable(msg) => Some(format!("ERROR: {msg}")),
        }
    }

    /// Notice for the central panel. A load failure takes precedence over
    /// an empty selection.
    pub fn view_notice(&self) -> Option<ViewNotice> {
        if let Some(msg) = self.status_message() {
            return Some(ViewNotice::LoadFailed(msg));
        }
        match self.view.status() {
            SelectionStatus::Empty => Some(ViewNotice::NoData),
            SelectionStatus::Populated => None,
        }
    }

    /// Members of the currently selected group.
    pub fn group_members(&self) -> Vec<String> {
        self.groups.members(&self.selected_group, &self.dataset())
    }

    /// Select a year, clamped to the observed range.
    pub fn set_year(&mut self, year: i32) {
        self.selected_year = self
            .dataset()
            .year_range()
            .map(|(min, max)| year.clamp(min, max));
        self.refilter();
    }

    /// Switch group; every member of the new group becomes selected.
    pub fn set_group(&mut self, name: &str) {
        self.selected_group = name.to_string();
        self.select_all();
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected_countries.remove(country) {
            self.selected_countries.insert(country.to_string());
        }
        self.refilter();
    }

    /// Select every member of the current group.
    pub fn select_all(&mut self) {
        self.selected_countries = self.group_members().into_iter().collect();
        self.refilter();
    }

    pub fn select_none(&mut self) {
        self.selected_countries.clear();
        self.refilter();
    }

    /// Read the same source again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.reset_selection();
    }

    /// Replace the data source, e.g. after File → Open.
    pub fn open_source(&mut self, source: impl DatasetSource + 'static) {
        self.cache = DatasetCache::new(source);
        self.reset_selection();
    }

    /// Recompute `view` after a selection change.
    pub fn refilter(&mut self) {
        self.view = match self.selected_year {
            Some(year) => filter_selection(&self.dataset(), year, &self.selected_countries),
            None => SelectionView::default(),
        };
    }

    fn reset_selection(&mut self) {
        let dataset = self.dataset();
        self.selected_year = dataset.year_range().map(|(_, max)| max);
        if self.groups.members(&self.selected_group, &dataset).is_empty() {
            if let Some(first) = self.groups.first_name() {
                self.selected_group = first.to_string();
            }
        }
        self.select_all();
        log::debug!(
            "Selection reset: year {:?}, group '{}', {} countries",
            self.selected_year,
            self.selected_group,
            self.selected_countries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountryGroup;
    use crate::data::cache::FileSource;
    use crate::data::model::{IncomeTier, NormalizedRecord};
    use crate::error::LoadError;
    use pretty_assertions::assert_eq;

    struct Fixture(Vec<NormalizedRecord>);

    impl DatasetSource for Fixture {
        fn describe(&self) -> String {
            "fixture".to_string()
        }

        fn load(&self) -> Result<Vec<NormalizedRecord>, LoadError> {
            Ok(self.0.clone())
        }
    }

    fn rec(country: &str, year: i32, gdp: f64) -> NormalizedRecord {
        NormalizedRecord {
            year,
            country: country.to_string(),
            current_account_balance: 1.0,
            budget_balance: -2.0,
            gdp_per_capita: Some(gdp),
        }
    }

    fn groups() -> CountryGroups {
        CountryGroups::new(vec![
            CountryGroup {
                name: "All".into(),
                members: None,
            },
            CountryGroup {
                name: "G7".into(),
                members: Some(vec!["France".into(), "Japan".into(), "Italy".into()]),
            },
        ])
    }

    fn state() -> AppState {
        let cache = DatasetCache::new(Fixture(vec![
            rec("France", 2019, 40000.0),
            rec("France", 2020, 39000.0),
            rec("Japan", 2020, 40000.0),
            rec("Niger", 2020, 600.0),
            rec("Niger", 2021, 590.0),
        ]));
        AppState::new(cache, groups())
    }

    fn shown(state: &AppState) -> Vec<String> {
        state.view.rows.iter().map(|r| r.record.country.clone()).collect()
    }

    #[test]
    fn starts_on_latest_year_with_whole_first_group() {
        let state = state();
        assert_eq!(state.selected_year, Some(2021));
        assert_eq!(state.selected_group, "All");
        assert_eq!(state.selected_countries.len(), 3);
        assert_eq!(shown(&state), vec!["Niger"]);
        assert_eq!(state.view.rows[0].income_tier, IncomeTier::Low);
        assert_eq!(state.status_message(), None);
    }

    #[test]
    fn year_change_refilters_and_clamps() {
        let mut state = state();
        state.set_year(2020);
        assert_eq!(shown(&state), vec!["France", "Japan", "Niger"]);

        state.set_year(1900);
        assert_eq!(state.selected_year, Some(2019));
        assert_eq!(shown(&state), vec!["France"]);
    }

    #[test]
    fn group_change_selects_its_members() {
        let mut state = state();
        state.set_year(2020);
        state.set_group("G7");
        assert_eq!(state.selected_countries.len(), 3);
        assert_eq!(shown(&state), vec!["France", "Japan"]);

        state.toggle_country("Japan");
        assert_eq!(shown(&state), vec!["France"]);
        state.toggle_country("Japan");
        assert_eq!(shown(&state), vec!["France", "Japan"]);
    }

    #[test]
    fn select_none_is_an_empty_view_not_an_error() {
        let mut state = state();
        state.select_none();
        assert_eq!(state.view.status(), SelectionStatus::Empty);
        assert_eq!(state.status_message(), None);
        assert_eq!(state.view_notice(), Some(ViewNotice::NoData));
        state.select_all();
        assert_eq!(state.view.status(), SelectionStatus::Populated);
        assert_eq!(state.view_notice(), None);
    }

    #[test]
    fn missing_file_is_reported_and_view_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("donnees_macro.xlsx");
        let state = AppState::new(DatasetCache::new(FileSource::new(&path)), groups());
        assert_eq!(state.selected_year, None);
        assert!(state.view.is_empty());
        let msg = state.status_message().unwrap();
        assert!(msg.contains("donnees_macro.xlsx"), "{msg}");

        match state.view_notice() {
            Some(ViewNotice::LoadFailed(text)) => assert_eq!(text, msg),
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn opening_a_new_source_resets_selection() {
        let mut state = state();
        state.open_source(Fixture(vec![rec("Chile", 2015, 13000.0)]));
        assert_eq!(state.selected_year, Some(2015));
        assert_eq!(shown(&state), vec!["Chile"]);
        assert_eq!(state.view.rows[0].income_tier, IncomeTier::UpperMiddle);
    }
}
