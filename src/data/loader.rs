use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawRow, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a fire-properties table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – spreadsheet export with a header row (the usual source)
/// * `.json`    – `[{ "MATERIAL": "...", "HEAT FLUX": 50, ... }, ...]`
/// * `.parquet` – one column per field
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header cleanup matching what spreadsheet tooling produces on export:
/// blank headers become `Unnamed: <index>` and repeated headers get a
/// `.1`, `.2`, ... suffix (so the second `POST TEST CMT` is `POST TEST CMT.1`).
pub fn normalize_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut headers = Vec::new();
    for (idx, header) in raw.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            trimmed.to_string()
        };
        let count = seen.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base
        } else {
            format!("{base}.{count}")
        };
        *count += 1;
        headers.push(name);
    }
    headers
}

fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers = normalize_headers(reader.headers().context("reading CSV headers")?.iter());

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(idx, col)| (col.clone(), guess_cell_type(record.get(idx).unwrap_or(""))))
            .collect();
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

/// Infer the cell type of a CSV field.
pub fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: a top-level array of flat objects. Columns keep
/// the order in which keys first appear.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = RawRow::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}

/// Convert a JSON scalar to a cell. Nested values are kept as their JSON text.
pub fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field. Works with files written
/// by both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let record: RawRow = schema
                .fields()
                .iter()
                .enumerate()
                .map(|(idx, field)| (field.name().clone(), extract_cell(batch.column(idx), row)))
                .collect();
            rows.push(record);
        }
    }

    Ok(RawTable::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => {
            log::warn!("unsupported parquet column type {other:?}, reading as null");
            CellValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    #[test]
    fn headers_are_deduplicated_and_blank_ones_named() {
        let headers = normalize_headers(["MATERIAL", "POST TEST CMT", "POST TEST CMT", ""]);
        assert_eq!(
            headers,
            vec!["MATERIAL", "POST TEST CMT", "POST TEST CMT.1", "Unnamed: 3"]
        );
    }

    #[test]
    fn cell_types_are_guessed() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("NaN"), CellValue::Null);
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type(" 2.5 "), CellValue::Float(2.5));
        assert_eq!(guess_cell_type("True"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("PMMA"), CellValue::String("PMMA".into()));
    }

    #[test]
    fn loads_csv_with_missing_cells() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "MATERIAL,HEAT FLUX,POST TEST CMT,POST TEST CMT,").unwrap();
        writeln!(file, "PMMA,50,ok,,").unwrap();
        writeln!(file, "Oak plank,,,charred,").unwrap();
        file.flush().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[3], "POST TEST CMT.1");
        assert_eq!(table.columns[4], "Unnamed: 4");
        assert_eq!(table.rows[0]["HEAT FLUX"], CellValue::Integer(50));
        assert!(table.rows[1]["HEAT FLUX"].is_null());
        assert_eq!(
            table.rows[1]["POST TEST CMT.1"],
            CellValue::String("charred".into())
        );
    }

    #[test]
    fn loads_json_records() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"MATERIAL": "PVC", "HEAT FLUX": 35.5}}, {{"MATERIAL": null, "ORIENTATION": "HORIZONTAL"}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        // first-seen key order, not alphabetical
        assert_eq!(table.columns, vec!["MATERIAL", "HEAT FLUX", "ORIENTATION"]);
        assert_eq!(table.rows[0]["HEAT FLUX"], CellValue::Float(35.5));
        assert!(table.rows[1]["MATERIAL"].is_null());
    }

    #[test]
    fn loads_parquet_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("MATERIAL", DataType::Utf8, true),
            Field::new("HEAT FLUX", DataType::Float64, true),
            Field::new("SCAN COUNT", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Nylon 6"), None])),
                Arc::new(Float64Array::from(vec![Some(25.0), None])),
                Arc::new(Int64Array::from(vec![300, 420])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.columns, vec!["MATERIAL", "HEAT FLUX", "SCAN COUNT"]);
        assert_eq!(table.rows[0]["MATERIAL"], CellValue::String("Nylon 6".into()));
        assert!(table.rows[1]["MATERIAL"].is_null());
        assert!(table.rows[1]["HEAT FLUX"].is_null());
        assert_eq!(table.rows[1]["SCAN COUNT"], CellValue::Integer(420));
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
