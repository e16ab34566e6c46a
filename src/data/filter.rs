use std::collections::BTreeSet;

use super::model::{ClassifiedRecord, MacroDataset};

// ---------------------------------------------------------------------------
// SelectionView: the rows currently on screen
// ---------------------------------------------------------------------------

/// Whether a selection matched anything. The UI branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Empty,
    Populated,
}

/// Year- and country-filtered records, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionView {
    pub year: Option<i32>,
    pub rows: Vec<ClassifiedRecord>,
}

impl SelectionView {
    pub fn status(&self) -> SelectionStatus {
        if self.is_empty() {
            SelectionStatus::Empty
        } else {
            SelectionStatus::Populated
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Return the records of `year` whose country is in `countries`.
///
/// * Empty `countries` → empty view
/// * `year` outside the dataset → empty view
/// * Output keeps the dataset's load order, so equal inputs give equal output.
pub fn filter_selection(
    dataset: &MacroDataset,
    year: i32,
    countries: &BTreeSet<String>,
) -> SelectionView {
    let rows = if countries.is_empty() {
        Vec::new()
    } else {
        dataset
            .records
            .iter()
            .filter(|c| c.record.year == year && countries.contains(&c.record.country))
            .cloned()
            .collect()
    };

    SelectionView {
        year: Some(year),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DataStatus, NormalizedRecord};
    use pretty_assertions::assert_eq;

    fn rec(country: &str, year: i32) -> NormalizedRecord {
        NormalizedRecord {
            year,
            country: country.to_string(),
            current_account_balance: 1.0,
            budget_balance: -1.0,
            gdp_per_capita: Some(30000.0),
        }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> MacroDataset {
        MacroDataset::from_records(vec![
            rec("France", 2020),
            rec("Japan", 2020),
            rec("Japan", 2019),
            rec("Germany", 2020),
        ])
    }

    #[test]
    fn matches_year_and_country() {
        let view = filter_selection(&sample(), 2020, &set(&["France", "Japan"]));
        let got: Vec<(&str, i32)> = view
            .rows
            .iter()
            .map(|c| (c.record.country.as_str(), c.record.year))
            .collect();
        assert_eq!(got, vec![("France", 2020), ("Japan", 2020)]);
        assert_eq!(view.status(), SelectionStatus::Populated);
        assert_eq!(view.year, Some(2020));
    }

    #[test]
    fn output_order_is_reproducible() {
        let ds = sample();
        let countries = set(&["Japan", "Germany", "France"]);
        assert_eq!(
            filter_selection(&ds, 2020, &countries),
            filter_selection(&ds, 2020, &countries)
        );
    }

    #[test]
    fn empty_country_set_gives_empty_view() {
        let view = filter_selection(&sample(), 2020, &BTreeSet::new());
        assert!(view.is_empty());
        assert_eq!(view.status(), SelectionStatus::Empty);
    }

    #[test]
    fn unknown_year_gives_empty_view() {
        let view = filter_selection(&sample(), 1850, &set(&["France"]));
        assert_eq!(view.status(), SelectionStatus::Empty);
    }

    #[test]
    fn empty_dataset_gives_empty_view() {
        let ds = MacroDataset::empty(DataStatus::Ready);
        let view = filter_selection(&ds, 2020, &set(&["France"]));
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn rows_carry_tier_color() {
        let view = filter_selection(&sample(), 2020, &set(&["France"]));
        assert_eq!(view.rows[0].display_color, "#00008B");
    }
}
