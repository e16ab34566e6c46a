use std::collections::BTreeMap;

use super::model::{ClassifiedRecord, CountryIncomeIndex, IncomeTier, NormalizedRecord};

/// Upper bound (inclusive) of the low-income tier, in USD per capita.
pub const LOW_INCOME_MAX: f64 = 1135.0;
/// Upper bound (inclusive) of the lower-middle-income tier.
pub const LOWER_MIDDLE_INCOME_MAX: f64 = 4465.0;
/// Upper bound (inclusive) of the upper-middle-income tier.
pub const UPPER_MIDDLE_INCOME_MAX: f64 = 13845.0;

/// Map a GDP-per-capita value to its tier. Each boundary belongs to the
/// lower tier.
pub fn classify_gdp(gdp_per_capita: f64) -> IncomeTier {
    if gdp_per_capita <= LOW_INCOME_MAX {
        IncomeTier::Low
    } else if gdp_per_capita <= LOWER_MIDDLE_INCOME_MAX {
        IncomeTier::LowerMiddle
    } else if gdp_per_capita <= UPPER_MIDDLE_INCOME_MAX {
        IncomeTier::UpperMiddle
    } else {
        IncomeTier::High
    }
}

/// For each country, the GDP per capita of its most recent record.
///
/// When a country has several records for its latest year, the one that
/// appears last in `records` wins. A missing value on that record stays
/// missing even if older years carry one.
pub fn latest_gdp_per_country(records: &[NormalizedRecord]) -> BTreeMap<&str, Option<f64>> {
    let mut latest: BTreeMap<&str, (i32, Option<f64>)> = BTreeMap::new();

    for rec in records {
        latest
            .entry(rec.country.as_str())
            .and_modify(|(year, gdp)| {
                if rec.year >= *year {
                    *year = rec.year;
                    *gdp = rec.gdp_per_capita;
                }
            })
            .or_insert((rec.year, rec.gdp_per_capita));
    }

    latest
        .into_iter()
        .map(|(country, (_, gdp))| (country, gdp))
        .collect()
}

/// Build the country → tier index over the whole dataset.
pub fn build_income_index(records: &[NormalizedRecord]) -> CountryIncomeIndex {
    let latest = latest_gdp_per_country(records);
    log::debug!("Classifying {} countries by income", latest.len());

    let mut index = CountryIncomeIndex::default();
    for (country, gdp) in latest {
        let tier = gdp.map(classify_gdp).unwrap_or(IncomeTier::Unknown);
        index.insert(country.to_string(), tier);
    }
    index
}

/// Attach each record's country tier to the record.
pub fn classify_records(
    records: Vec<NormalizedRecord>,
    index: &CountryIncomeIndex,
) -> Vec<ClassifiedRecord> {
    records
        .into_iter()
        .map(|rec| {
            let tier = index.tier_of(&rec.country);
            ClassifiedRecord::new(rec, tier)
        })
        .collect()
}
