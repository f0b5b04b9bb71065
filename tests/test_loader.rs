//! Integration test: loading tables from disk

use std::io::Write;
use std::sync::Arc;

use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use sales_predictor::data::loader::load_file;
use sales_predictor::data::model::{CellValue, ColumnKind};
use sales_predictor::state::AppState;

#[test]
fn test_load_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ads.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "tv,radio,sales").unwrap();
    writeln!(file, "230.1,37.8,22.1").unwrap();
    writeln!(file, "44.5,,10.4").unwrap();
    writeln!(file, "17.2,45.9,9.3").unwrap();
    drop(file);

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.missing_cells(), 1);

    let mut state = AppState::default();
    state.load_path(&path);
    let table = state.table.as_ref().unwrap();
    assert_eq!(table.name, "ads.csv");
    assert_eq!(table.cleaning.dropped_rows, vec![1]);
    assert_eq!(table.dataset.len(), 2);
    assert!(state.status_message.is_none());
}

#[test]
fn test_malformed_csv_sets_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "a,b\n1,2\n3,4,5,6\n").unwrap();

    let mut state = AppState::default();
    state.load_path(&path);
    assert!(state.table.is_none());
    let msg = state.status_message.unwrap();
    assert!(msg.contains("expected 2 fields"), "{msg}");
}

#[test]
fn test_invalid_utf8_sets_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.csv");
    std::fs::write(&path, b"city,price\nM\xfcnchen,310\n").unwrap();

    let mut state = AppState::default();
    state.load_path(&path);
    assert!(state.table.is_none());
    assert!(state.outcome.is_none());
    let msg = state.status_message.unwrap();
    assert!(msg.starts_with("Error:"), "{msg}");
}

#[test]
fn test_load_parquet_file() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("rooms", DataType::Int64, false),
        Field::new("area", DataType::Float64, true),
        Field::new("city", DataType::Utf8, false),
        Field::new("garden", DataType::Boolean, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![2, 3, 4])),
            Arc::new(Float64Array::from(vec![Some(55.0), None, Some(90.5)])),
            Arc::new(StringArray::from(vec!["Leeds", "York", "Hull"])),
            Arc::new(BooleanArray::from(vec![false, true, true])),
        ],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("homes.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.column_names(), vec!["rooms", "area", "city", "garden"]);
    assert_eq!(ds.cell(0, 0), Some(&CellValue::Integer(2)));
    assert_eq!(ds.cell(1, 1), Some(&CellValue::Missing));
    assert_eq!(ds.cell(2, 1), Some(&CellValue::Float(90.5)));
    assert_eq!(ds.cell(2, 2), Some(&CellValue::Text("Hull".into())));
    assert_eq!(ds.cell(1, 3), Some(&CellValue::Bool(true)));
    assert_eq!(ds.column("city").unwrap().kind(), ColumnKind::Text);
    assert_eq!(ds.column("garden").unwrap().kind(), ColumnKind::Numeric);
}
