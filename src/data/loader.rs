use std::path::Path;

use anyhow::{Context, bail};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Dataset;
use crate::error::{PlotError, Result};

/// Columns in source order, before the equal-length check.
type Columns = Vec<(String, Vec<f64>)>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a benchmark table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, first row is the header
/// * `.csv`     – header row with column names
/// * `.json`    – `[{ "Attributes": 1, "Time(ms)": 0.4 }, ...]`
/// * `.parquet` – numeric columns of any integer or float width
///
/// Columns that hold only text (e.g. a benchmark-name column) are dropped.
/// A column that mixes numbers and text is an error.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let columns = read_columns(path).map_err(|source| PlotError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();

    let dataset = Dataset::from_columns(name, columns)?;
    log::debug!(
        "loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

fn read_columns(path: &Path) -> anyhow::Result<Columns> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Column assembly shared by the text-based formats
// ---------------------------------------------------------------------------

enum Cell {
    Number(f64),
    Text(String),
    Blank,
}

impl Cell {
    fn from_text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() {
            return Cell::Blank;
        }
        match s.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(s.to_string()),
        }
    }
}

struct ColumnBuilder {
    name: String,
    /// How a location reads in errors, e.g. "CSV line" or "JSON record".
    unit: &'static str,
    values: Vec<f64>,
    numbers: usize,
    /// First text cell seen: (1-based location in the file, content).
    first_text: Option<(usize, String)>,
}

impl ColumnBuilder {
    fn new(name: String, unit: &'static str) -> Self {
        ColumnBuilder {
            name,
            unit,
            values: Vec::new(),
            numbers: 0,
            first_text: None,
        }
    }

    /// `row` is where the cell sits in the source file, counted from 1.
    fn push(&mut self, row: usize, cell: Cell) {
        let v = match cell {
            Cell::Number(v) => {
                self.numbers += 1;
                v
            }
            Cell::Text(s) => {
                self.first_text.get_or_insert((row, s));
                f64::NAN
            }
            Cell::Blank => f64::NAN,
        };
        self.values.push(v);
    }

    /// `None` when the column is all text (or blank with some text).
    fn finish(self) -> anyhow::Result<Option<(String, Vec<f64>)>> {
        match self.first_text {
            None => Ok(Some((self.name, self.values))),
            Some((row, text)) if self.numbers > 0 => bail!(
                "{} {row}, column '{}': '{text}' is not a number",
                self.unit,
                self.name
            ),
            Some(_) => {
                log::debug!("skipping text column '{}'", self.name);
                Ok(None)
            }
        }
    }
}

fn finish_all(builders: Vec<ColumnBuilder>) -> anyhow::Result<Columns> {
    let mut columns = Vec::with_capacity(builders.len());
    for builder in builders {
        if let Some(col) = builder.finish()? {
            columns.push(col);
        }
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Reads the first worksheet; the first row of its used range holds the column names.
fn load_spreadsheet(path: &Path) -> anyhow::Result<Columns> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("spreadsheet has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header = rows.next().context("worksheet is empty")?;
    let mut builders: Vec<ColumnBuilder> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => ColumnBuilder::new(format!("Unnamed: {i}"), SHEET_ROW),
            other => ColumnBuilder::new(other.to_string(), SHEET_ROW),
        })
        .collect();

    // Sheet row number of the header, as the spreadsheet shows it.
    let header_row = range.start().map_or(1, |(r, _)| r as usize + 1);
    for (row_no, row) in rows.enumerate() {
        for (builder, cell) in builders.iter_mut().zip(row.iter()) {
            let cell = match cell {
                Data::Int(i) => Cell::Number(*i as f64),
                Data::Float(f) => Cell::Number(*f),
                Data::String(s) => Cell::from_text(s),
                Data::Empty => Cell::Blank,
                other => Cell::Text(other.to_string()),
            };
            builder.push(header_row + 1 + row_no, cell);
        }
    }

    finish_all(builders)
}

const SHEET_ROW: &str = "Sheet row";

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one measurement per record.
fn load_csv(path: &Path) -> anyhow::Result<Columns> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut builders: Vec<ColumnBuilder> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| ColumnBuilder::new(h.trim().to_string(), "CSV line"))
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let fallback = row_no + 2;
        let record = result.with_context(|| format!("CSV line {fallback}"))?;
        let line = record
            .position()
            .map_or(fallback, |pos| pos.line() as usize);
        for (builder, value) in builders.iter_mut().zip(record.iter()) {
            builder.push(line, Cell::from_text(value));
        }
    }

    finish_all(builders)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Attributes": 1, "Time(ms)": 0.41 },
///   { "Attributes": 2, "Time(ms)": 0.83 }
/// ]
/// ```
///
/// A key missing from a record reads as a blank cell.
fn load_json(path: &Path) -> anyhow::Result<Columns> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut builders: Vec<ColumnBuilder> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("JSON record {} is not an object", i + 1))?;

        for key in obj.keys() {
            if !builders.iter().any(|b| &b.name == key) {
                let mut builder = ColumnBuilder::new(key.clone(), "JSON record");
                // Back-fill records seen before this key first appeared.
                for record in 1..=i {
                    builder.push(record, Cell::Blank);
                }
                builders.push(builder);
            }
        }

        for builder in &mut builders {
            let cell = match obj.get(&builder.name) {
                None | Some(JsonValue::Null) => Cell::Blank,
                Some(JsonValue::Number(n)) => {
                    Cell::Number(n.as_f64().unwrap_or(f64::NAN))
                }
                Some(JsonValue::String(s)) => Cell::from_text(s),
                Some(other) => Cell::Text(other.to_string()),
            };
            builder.push(i + 1, cell);
        }
    }

    finish_all(builders)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every numeric column of a Parquet file as `f64`.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nulls read as `NaN`.
fn load_parquet(path: &Path) -> anyhow::Result<Columns> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let numeric: Vec<(usize, String)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| {
            let keep = f.data_type().is_numeric();
            if !keep {
                log::debug!("skipping non-numeric column '{}'", f.name());
            }
            keep
        })
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    let mut columns: Columns = numeric
        .iter()
        .map(|(_, name)| (name.clone(), Vec::new()))
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for ((idx, name), (_, values)) in numeric.iter().zip(columns.iter_mut()) {
            let as_f64 = cast(batch.column(*idx), &DataType::Float64)
                .with_context(|| format!("converting column '{name}' to float"))?;
            let arr = as_f64
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array after cast")?;
            values.extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    Ok(columns)
}
