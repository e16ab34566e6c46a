use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i64 = 1980;
const LAST_YEAR: i64 = 2029;

/// (country, GDP per capita in 1980, yearly growth, mean current account, mean budget balance)
const COUNTRIES: [(&str, f64, f64, f64, f64); 12] = [
    ("Canada", 11000.0, 0.035, -1.5, -1.8),
    ("France", 12500.0, 0.030, -0.5, -3.5),
    ("Germany", 13000.0, 0.030, 4.0, -1.0),
    ("Italy", 8500.0, 0.030, 0.5, -4.0),
    ("Japan", 9500.0, 0.025, 3.0, -5.0),
    ("United Kingdom", 10000.0, 0.035, -2.5, -3.0),
    ("United States", 12500.0, 0.040, -2.8, -4.5),
    ("Brazil", 2000.0, 0.035, -2.5, -5.5),
    ("India", 270.0, 0.060, -1.5, -7.0),
    ("Kenya", 450.0, 0.040, -5.0, -5.5),
    ("Niger", 420.0, 0.005, -10.0, -3.0),
    ("Chile", 2700.0, 0.050, -2.0, 0.5),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    year: i64,
    country: &'static str,
    current_account: Option<f64>,
    budget: Option<f64>,
    gdp_per_capita: Option<f64>,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(country, gdp0, growth, ca_mean, bb_mean) in &COUNTRIES {
        let mut gdp = gdp0;
        for year in FIRST_YEAR..=LAST_YEAR {
            gdp *= 1.0 + rng.gauss(growth, 0.02);

            // Sprinkle in the gaps real IMF extracts have.
            let current_account = (rng.next_f64() > 0.03).then(|| rng.gauss(ca_mean, 1.5));
            let budget = (rng.next_f64() > 0.03).then(|| rng.gauss(bb_mean, 1.5));
            let gdp_per_capita = (rng.next_f64() > 0.05).then_some(gdp.round());

            rows.push(Row {
                year,
                country,
                current_account,
                budget,
                gdp_per_capita,
            });
        }
    }
    rows
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".to_string())
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    // Padded headers on purpose: the loader trims them.
    writer.write_record([
        "Année",
        "Pays ",
        " SoldeCourant",
        "SoldeBudgétaire",
        "PIB/habitant",
        "Source",
    ])?;
    for row in rows {
        writer.write_record([
            row.year.to_string(),
            row.country.to_string(),
            fmt_opt(row.current_account),
            fmt_opt(row.budget),
            fmt_opt(row.gdp_per_capita),
            "sample".to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Année", DataType::Int64, false),
        Field::new("Pays", DataType::Utf8, false),
        Field::new("SoldeCourant", DataType::Float64, true),
        Field::new("SoldeBudgétaire", DataType::Float64, true),
        Field::new("PIB/habitant", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.current_account))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.budget))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.gdp_per_capita))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "sample_macro.csv")?;
    write_parquet(&rows, "sample_macro.parquet")?;

    println!(
        "Wrote {} rows ({} countries, {FIRST_YEAR}-{LAST_YEAR}) to sample_macro.csv and sample_macro.parquet",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
