use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::LoadError;

use super::model::{CellValue, NormalizedRecord, RawTable};
use super::normalize::normalize;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize an indicator table in one go.
pub fn load_records(path: &Path) -> Result<Vec<NormalizedRecord>, LoadError> {
    let table = load_file(path)?;
    let rows_read = table.rows.len();
    let records = normalize(&table)?;
    log::info!(
        "Loaded {} of {rows_read} rows from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Read a table from a file without interpreting it.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, first row is the header
/// * `.csv`     – header row, comma separated
/// * `.parquet` – one scalar column per field
/// * `.json`    – `[{ "Année": 2020, "Pays": "France", ... }, ...]`
pub fn load_file(path: &Path) -> Result<RawTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceMissing {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(load_spreadsheet(path)?),
        "csv" => Ok(load_csv(path)?),
        "parquet" | "pq" => Ok(load_parquet(path)?),
        "json" => Ok(load_json(path)?),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> anyhow::Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| anyhow!("opening spreadsheet: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("spreadsheet has no worksheet")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let rows = rows
        .map(|row| row.iter().map(spreadsheet_to_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn spreadsheet_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        _ => CellValue::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every cell read as text.
/// Rows may be shorter than the header.
fn load_csv(path: &Path) -> anyhow::Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(text_to_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

fn text_to_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
/// Headers are the union of keys in first-seen order.
fn load_json(path: &Path) -> anyhow::Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut objects = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !positions.contains_key(key) {
                positions.insert(key.clone(), headers.len());
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            let mut row = vec![CellValue::Empty; headers.len()];
            for (key, val) in obj {
                if let Some(&idx) = positions.get(key) {
                    row[idx] = json_to_cell(val);
                }
            }
            row
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_to_cell(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> anyhow::Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(batch.columns().iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => text_to_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_to_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => {
            log::debug!("Ignoring parquet cell of unsupported type {other:?}");
            CellValue::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use calamine::CellErrorType;
    use parquet::arrow::ArrowWriter;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.xlsx");
        match load_records(&path) {
            Err(LoadError::SourceMissing { path: p }) => assert_eq!(p, path),
            other => panic!("expected SourceMissing, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.txt", "hello");
        assert!(matches!(
            load_file(&path),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn csv_with_padded_headers_and_garbage_cells() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "macro.csv",
            " Année ,Pays, SoldeCourant,SoldeBudgétaire ,PIB/habitant,Source\n\
             2020,France,-1.9,-9.0,39030,IMF\n\
             2020,Japan,3.0,-12.6,,IMF\n\
             2020,Peru,n.d.,-8.9,6100,IMF\n\
             2019,Japan,3.4\n",
        );
        let records = load_records(&path).unwrap();
        assert_eq!(
            records,
            vec![
                NormalizedRecord {
                    year: 2020,
                    country: "France".into(),
                    current_account_balance: -1.9,
                    budget_balance: -9.0,
                    gdp_per_capita: Some(39030.0),
                },
                NormalizedRecord {
                    year: 2020,
                    country: "Japan".into(),
                    current_account_balance: 3.0,
                    budget_balance: -12.6,
                    gdp_per_capita: None,
                },
            ]
        );
    }

    #[test]
    fn xlsx_with_padded_headers_and_text_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("donnees_macro.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = [" Année", "Pays ", "SoldeCourant ", " SoldeBudgétaire", "PIB/habitant", "Source"];
        for (col, h) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *h).unwrap();
        }
        // France: balance stored as text, GDP not available
        sheet.write_number(1, 0, 2020).unwrap();
        sheet.write_string(1, 1, "France").unwrap();
        sheet.write_number(1, 2, -1.9).unwrap();
        sheet.write_string(1, 3, "-9").unwrap();
        sheet.write_string(1, 4, "n/a").unwrap();
        sheet.write_string(1, 5, "IMF").unwrap();
        // Chad: no budget balance
        sheet.write_number(2, 0, 2021).unwrap();
        sheet.write_string(2, 1, "Chad").unwrap();
        sheet.write_number(2, 2, -4.1).unwrap();
        sheet.write_number(2, 4, 700).unwrap();
        // Peru: short row
        sheet.write_number(3, 0, 2021).unwrap();
        sheet.write_string(3, 1, "Peru").unwrap();
        sheet.write_number(3, 2, 1.0).unwrap();
        workbook.save(&path).unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(
            records,
            vec![NormalizedRecord {
                year: 2020,
                country: "France".into(),
                current_account_balance: -1.9,
                budget_balance: -9.0,
                gdp_per_capita: None,
            }]
        );
    }

    #[test]
    fn spreadsheet_cells() {
        assert_eq!(spreadsheet_to_cell(&Data::Int(2020)), CellValue::Integer(2020));
        assert_eq!(spreadsheet_to_cell(&Data::Float(-1.5)), CellValue::Float(-1.5));
        assert_eq!(
            spreadsheet_to_cell(&Data::String("n/a".into())),
            CellValue::Text("n/a".into())
        );
        assert_eq!(spreadsheet_to_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(spreadsheet_to_cell(&Data::Error(CellErrorType::Div0)), CellValue::Empty);
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "macro.csv", "Année,Pays,SoldeCourant\n2020,France,1\n");
        assert!(matches!(
            load_records(&path),
            Err(LoadError::MissingColumn("SoldeBudgétaire"))
        ));
    }

    #[test]
    fn json_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "macro.json",
            r#"[
                {"Année": 2021, "Pays": "Chile", "SoldeCourant": -7.3, "SoldeBudgétaire": -7.7, "PIB/habitant": 16070.0},
                {"Pays": "Chad", "Année": 2021.0, "SoldeCourant": "-4.1", "SoldeBudgétaire": -1.5, "PIB/habitant": null},
                {"Pays": null, "Année": 2021, "SoldeCourant": 1, "SoldeBudgétaire": 1}
            ]"#,
        );
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, "Chile");
        assert_eq!(records[1].year, 2021);
        assert_eq!(records[1].current_account_balance, -4.1);
        assert_eq!(records[1].gdp_per_capita, None);
    }

    #[test]
    fn json_must_be_an_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "macro.json", r#"{"Pays": "France"}"#);
        assert!(matches!(load_file(&path), Err(LoadError::Read(_))));
    }

    #[test]
    fn parquet_scalar_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("macro.parquet");

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
                Arc::new(Int64Array::from(vec![2020, 2020])),
                Arc::new(StringArray::from(vec!["Italy", "Kenya"])),
                Arc::new(Float64Array::from(vec![Some(3.5), None])),
                Arc::new(Float64Array::from(vec![Some(-9.5), Some(-8.1)])),
                Arc::new(Float64Array::from(vec![Some(31700.0), Some(2000.0)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(
            records,
            vec![NormalizedRecord {
                year: 2020,
                country: "Italy".into(),
                current_account_balance: 3.5,
                budget_balance: -9.5,
                gdp_per_capita: Some(31700.0),
            }]
        );
    }
}
