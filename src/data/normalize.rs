use crate::error::LoadError;

use super::model::{CellValue, CoercedRecord, NormalizedRecord, RawRecord, RawTable};

// ---------------------------------------------------------------------------
// Canonical schema
// ---------------------------------------------------------------------------

pub const YEAR_HEADER: &str = "Année";
pub const COUNTRY_HEADER: &str = "Pays";
pub const CURRENT_ACCOUNT_HEADER: &str = "SoldeCourant";
pub const BUDGET_HEADER: &str = "SoldeBudgétaire";
pub const GDP_PER_CAPITA_HEADER: &str = "PIB/habitant";

/// Column positions of the five canonical fields in a [`RawTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub year: usize,
    pub country: usize,
    pub current_account_balance: usize,
    pub budget_balance: usize,
    pub gdp_per_capita: usize,
}

/// Trim a header the way the source spreadsheets need it: surrounding
/// whitespace and a UTF-8 byte-order mark.
pub fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

// ---------------------------------------------------------------------------
// Step 1: rename
// ---------------------------------------------------------------------------

/// Locate every canonical column by its trimmed header. On duplicate
/// headers the first column wins.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnMap, LoadError> {
    let find = |name: &'static str| {
        headers
            .iter()
            .position(|h| clean_header(h) == name)
            .ok_or(LoadError::MissingColumn(name))
    };

    Ok(ColumnMap {
        year: find(YEAR_HEADER)?,
        country: find(COUNTRY_HEADER)?,
        current_account_balance: find(CURRENT_ACCOUNT_HEADER)?,
        budget_balance: find(BUDGET_HEADER)?,
        gdp_per_capita: find(GDP_PER_CAPITA_HEADER)?,
    })
}

// ---------------------------------------------------------------------------
// Step 2: project
// ---------------------------------------------------------------------------

/// Keep only the five canonical cells of every row. Cells beyond the end
/// of a short row read as [`CellValue::Empty`].
pub fn project(table: &RawTable, columns: &ColumnMap) -> Vec<RawRecord> {
    let cell = |row: &[CellValue], idx: usize| row.get(idx).cloned().unwrap_or(CellValue::Empty);

    table
        .rows
        .iter()
        .map(Vec::as_slice)
        .map(|row| RawRecord {
            year: cell(row, columns.year),
            country: cell(row, columns.country),
            current_account_balance: cell(row, columns.current_account_balance),
            budget_balance: cell(row, columns.budget_balance),
            gdp_per_capita: cell(row, columns.gdp_per_capita),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Step 3: coerce
// ---------------------------------------------------------------------------

/// Per-cell coercion. Never fails: anything that does not parse is `None`.
pub fn coerce(raw: &RawRecord) -> CoercedRecord {
    CoercedRecord {
        year: coerce_year(&raw.year),
        country: raw.country.as_text(),
        current_account_balance: raw.current_account_balance.as_f64(),
        budget_balance: raw.budget_balance.as_f64(),
        gdp_per_capita: raw.gdp_per_capita.as_f64(),
    }
}

/// Years are truncated toward zero; out-of-range or infinite values are dropped.
fn coerce_year(cell: &CellValue) -> Option<i32> {
    let v = cell.as_f64()?.trunc();
    if v.is_finite() && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Step 4: admit
// ---------------------------------------------------------------------------

/// Admit a record only if year, country and both balances are present.
pub fn admit(record: CoercedRecord) -> Option<NormalizedRecord> {
    Some(NormalizedRecord {
        year: record.year?,
        country: record.country?,
        current_account_balance: record.current_account_balance?,
        budget_balance: record.budget_balance?,
        gdp_per_capita: record.gdp_per_capita,
    })
}

/// Run the full rename → project → coerce → admit pipeline over a table.
pub fn normalize(table: &RawTable) -> Result<Vec<NormalizedRecord>, LoadError> {
    let columns = resolve_columns(&table.headers)?;
    let raw = project(table, &columns);
    let total = raw.len();

    let admitted: Vec<NormalizedRecord> = raw.iter().map(coerce).filter_map(admit).collect();

    let dropped = total - admitted.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} of {total} rows with missing year, country or balances");
    }
    Ok(admitted)
}
