use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CellValue, Column, Dataset};

/// Cell texts read as missing values, in addition to the empty string.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-separated, header row first
/// * `.parquet` – flat columns of integer, float, boolean or string type
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV file {}", path.display()))?;
    read_csv(file)
}

/// Parse comma-separated text into a [`Dataset`].
///
/// The first record is the header. Records shorter than the header are
/// padded with missing cells; longer records are an error.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let raw_headers: Vec<String> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
        bail!("No columns to parse from file");
    }

    let headers = dedupe_headers(&raw_headers);
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        if record.len() > headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, saw {}",
                headers.len(),
                record.len()
            );
        }

        for (col_idx, values) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx).map_or(CellValue::Missing, guess_cell_type);
            values.push(cell);
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Ok(Dataset::from_columns(columns))
}

/// Name blank headers `Unnamed: {i}` and suffix repeats with `.1`, `.2`, ….
fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.clone()
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Missing;
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
        _ => CellValue::Text(raw.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding a flat table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if names.is_empty() {
        bail!("Parquet file has no columns");
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, values) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                let cell = extract_cell(array, row)
                    .with_context(|| format!("column '{}', row {row}", names[col_idx]))?;
                values.push(cell);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Ok(Dataset::from_columns(columns))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Missing);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            match i64::try_from(v) {
                Ok(i) => CellValue::Integer(i),
                Err(_) => CellValue::Float(v as f64),
            }
        }
        DataType::Float32 => {
            let v = col.as_primitive::<Float32Type>().value(row) as f64;
            if v.is_nan() { CellValue::Missing } else { CellValue::Float(v) }
        }
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if v.is_nan() { CellValue::Missing } else { CellValue::Float(v) }
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_types_cells() {
        let csv = "sqft,bedrooms,city,garage\n1200,3,Leeds,true\n850.5,2,York,false\n";
        let ds = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), vec!["sqft", "bedrooms", "city", "garage"]);
        assert_eq!(ds.cell(0, 0), Some(&CellValue::Integer(1200)));
        assert_eq!(ds.cell(1, 0), Some(&CellValue::Float(850.5)));
        assert_eq!(ds.cell(0, 2), Some(&CellValue::Text("Leeds".into())));
        assert_eq!(ds.cell(1, 3), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn test_read_csv_missing_tokens() {
        let csv = "a,b,c\n1,,3\nNA,2,nan\n4,5,6\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.missing_cells(), 3);
        assert!(ds.row_has_missing(0));
        assert!(ds.row_has_missing(1));
        assert!(!ds.row_has_missing(2));
    }

    #[test]
    fn test_read_csv_pads_short_rows() {
        let ds = read_csv("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(ds.cell(0, 2), Some(&CellValue::Missing));
    }

    #[test]
    fn test_read_csv_rejects_long_rows() {
        let err = read_csv("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("expected 2 fields"));
    }

    #[test]
    fn test_read_csv_rejects_invalid_utf8() {
        let err = read_csv(b"a,b\n1,\xff\n".as_slice()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"), "{err:#}");
    }

    #[test]
    fn test_read_csv_rejects_empty_input() {
        assert!(read_csv("".as_bytes()).is_err());
    }

    #[test]
    fn test_headers_are_deduplicated() {
        let ds = read_csv("x,x,,x\n1,2,3,4\n".as_bytes()).unwrap();
        assert_eq!(ds.column_names(), vec!["x", "x.1", "Unnamed: 2", "x.2"]);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let ds = read_csv("a,b\n".as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.width(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
