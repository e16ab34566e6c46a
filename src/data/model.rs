use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CellValue – a single untyped cell read from the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what spreadsheet readers hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Interpret the cell as a float. Unparseable text, booleans, empty
    /// cells and NaN all become `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Empty => return None,
        };
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Interpret the cell as a string. Only a truly empty cell is missing;
    /// whitespace is kept as-is.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if !s.is_empty() => Some(s.clone()),
            CellValue::Text(_) | CellValue::Empty => None,
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – whatever the reader produced, before any normalization
// ---------------------------------------------------------------------------

/// Header row plus data rows, exactly as read from the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// The five cells of one row that matter, after column resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub year: CellValue,
    pub country: CellValue,
    pub current_account_balance: CellValue,
    pub budget_balance: CellValue,
    pub gdp_per_capita: CellValue,
}

/// A [`RawRecord`] after per-cell coercion. Any field may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedRecord {
    pub year: Option<i32>,
    pub country: Option<String>,
    pub current_account_balance: Option<f64>,
    pub budget_balance: Option<f64>,
    pub gdp_per_capita: Option<f64>,
}

// ---------------------------------------------------------------------------
// NormalizedRecord – one country/year observation
// ---------------------------------------------------------------------------

/// A row that passed admission: every field except GDP per capita is present.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub year: i32,
    pub country: String,
    pub current_account_balance: f64,
    pub budget_balance: f64,
    pub gdp_per_capita: Option<f64>,
}

// ---------------------------------------------------------------------------
// IncomeTier
// ---------------------------------------------------------------------------

/// Income classification of a country, from its most recent GDP per capita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncomeTier {
    Low,
    LowerMiddle,
    UpperMiddle,
    High,
    Unknown,
}

impl IncomeTier {
    /// All tiers, richest first (legend order).
    pub const ALL: [IncomeTier; 5] = [
        IncomeTier::High,
        IncomeTier::UpperMiddle,
        IncomeTier::LowerMiddle,
        IncomeTier::Low,
        IncomeTier::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncomeTier::Low => "Low income",
            IncomeTier::LowerMiddle => "Lower-middle income",
            IncomeTier::UpperMiddle => "Upper-middle income",
            IncomeTier::High => "High income",
            IncomeTier::Unknown => "Unknown",
        }
    }

    /// Hex colour used for this tier on the chart and in the legend.
    pub fn display_color(self) -> &'static str {
        match self {
            IncomeTier::High => "#00008B",
            IncomeTier::UpperMiddle => "#008000",
            IncomeTier::LowerMiddle => "#FFA500",
            IncomeTier::Low => "#A52A2A",
            IncomeTier::Unknown => "#808080",
        }
    }
}

impl fmt::Display for IncomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Country → tier, computed once per dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryIncomeIndex {
    tiers: BTreeMap<String, IncomeTier>,
}

impl CountryIncomeIndex {
    pub fn insert(&mut self, country: String, tier: IncomeTier) {
        self.tiers.insert(country, tier);
    }

    /// Tier of `country`, or [`IncomeTier::Unknown`] if it was never indexed.
    pub fn tier_of(&self, country: &str) -> IncomeTier {
        self.tiers
            .get(country)
            .copied()
            .unwrap_or(IncomeTier::Unknown)
    }
}

/// A normalized record annotated with its country's tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub record: NormalizedRecord,
    pub income_tier: IncomeTier,
    pub display_color: &'static str,
}

impl ClassifiedRecord {
    pub fn new(record: NormalizedRecord, income_tier: IncomeTier) -> Self {
        ClassifiedRecord {
            record,
            income_tier,
            display_color: income_tier.display_color(),
        }
    }
}

// ---------------------------------------------------------------------------
// MacroDataset – the classified working set
// ---------------------------------------------------------------------------

/// Outcome of the last load, surfaced to the user as a status line.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStatus {
    Ready,
    SourceMissing(PathBuf),
    Unreadable(String),
}

/// The full classified dataset plus the indices the UI needs.
#[derive(Debug, Clone)]
pub struct MacroDataset {
    /// Classified records in load order.
    pub records: Vec<ClassifiedRecord>,
    pub income_index: CountryIncomeIndex,
    /// Every year present in `records`, ascending.
    pub years: BTreeSet<i32>,
    /// Every country present in `records`, sorted.
    pub countries: BTreeSet<String>,
    pub status: DataStatus,
}

impl MacroDataset {
    /// Classify `records` and build the year/country indices.
    pub fn from_records(records: Vec<NormalizedRecord>) -> Self {
        let income_index = super::classify::build_income_index(&records);
        let years = records.iter().map(|r| r.year).collect();
        let countries = records.iter().map(|r| r.country.clone()).collect();
        let records = super::classify::classify_records(records, &income_index);
        MacroDataset {
            records,
            income_index,
            years,
            countries,
            status: DataStatus::Ready,
        }
    }

    /// An empty dataset carrying the reason nothing was loaded.
    pub fn empty(status: DataStatus) -> Self {
        MacroDataset {
            records: Vec::new(),
            income_index: CountryIncomeIndex::default(),
            years: BTreeSet::new(),
            countries: BTreeSet::new(),
            status,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed `(min, max)` year, if any record was loaded.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }
}
