//! Integration test: upload → clean → select → split → fit → evaluate

use sales_predictor::config::PipelineConfig;
use sales_predictor::data::clean::drop_missing_rows;
use sales_predictor::data::loader::read_csv;
use sales_predictor::pipeline::{self, PipelineError, PipelineOutcome, Selection};
use sales_predictor::state::AppState;

/// `[sqft, bedrooms, price]`, 100 rows; rows listed in `missing_sqft` get an empty sqft.
fn housing_csv(missing_sqft: &[usize]) -> String {
    let mut csv = String::from("sqft,bedrooms,price\n");
    for i in 0..100 {
        let sqft = 600 + (i * 37) % 2400;
        let bedrooms = 1 + i % 5;
        let price = 40 + sqft / 10 + 15 * bedrooms;
        let sqft_cell = if missing_sqft.contains(&i) {
            String::new()
        } else {
            sqft.to_string()
        };
        csv.push_str(&format!("{sqft_cell},{bedrooms},{price}\n"));
    }
    csv
}

#[test]
fn test_complete_dataset_trains_and_evaluates() {
    let mut ds = read_csv(housing_csv(&[]).as_bytes()).unwrap();
    let report = drop_missing_rows(&mut ds);
    assert!(report.is_noop());
    assert_eq!(ds.len(), 100);

    let sel = Selection::new(&ds, "price", ["sqft", "bedrooms"]).unwrap();
    let outcome = pipeline::run(&ds, &sel, &PipelineConfig::default()).unwrap();
    let eval = outcome.evaluation().expect("run should complete");

    assert_eq!(eval.train_rows, 80);
    assert_eq!(eval.holdout_rows, 20);
    assert_eq!(eval.actual_vs_predicted.len(), 20);
    assert!(eval.metrics.mse >= 0.0);
    assert!(eval.metrics.r2.is_some());
    assert_eq!(eval.correlation.len(), 3);
}

#[test]
fn test_missing_values_are_dropped_then_run_proceeds() {
    let mut ds = read_csv(housing_csv(&[3, 17, 42, 66, 90]).as_bytes()).unwrap();
    let report = drop_missing_rows(&mut ds);

    assert_eq!(report.dropped_rows, vec![3, 17, 42, 66, 90]);
    assert_eq!(ds.len(), 95);
    assert_eq!(ds.missing_cells(), 0);

    let sel = Selection::with_default_features(&ds, "price").unwrap();
    let outcome = pipeline::run(&ds, &sel, &PipelineConfig::default()).unwrap();
    let eval = outcome.evaluation().expect("run should complete");
    assert_eq!(eval.holdout_rows, 19);
    assert_eq!(eval.train_rows, 76);
}

#[test]
fn test_deselecting_all_features_skips_training() {
    let mut state = AppState::default();
    state.set_dataset("houses.csv".into(), read_csv(housing_csv(&[]).as_bytes()).unwrap());
    state.set_target("price");
    assert!(state.evaluation().is_some());

    state.select_no_features();
    assert_eq!(state.outcome, Some(Ok(PipelineOutcome::NoFeatures)));
    assert!(state.evaluation().is_none());
}

#[test]
fn test_text_feature_is_reported() {
    let csv = "sales,tv,region\n10,100,north\n12,120,south\n9,90,east\n15,150,west\n";
    let ds = read_csv(csv.as_bytes()).unwrap();
    let sel = Selection::with_default_features(&ds, "sales").unwrap();
    assert_eq!(
        pipeline::run(&ds, &sel, &PipelineConfig::default()),
        Err(PipelineError::NonNumericColumn("region".into()))
    );

    let sel = Selection::new(&ds, "sales", ["tv"]).unwrap();
    let outcome = pipeline::run(&ds, &sel, &PipelineConfig::default()).unwrap();
    let eval = outcome.evaluation().unwrap();
    assert_eq!(eval.correlation.columns, vec!["sales", "tv"]);
}

#[test]
fn test_report_serializes() {
    let mut state = AppState::default();
    state.set_dataset("houses.csv".into(), read_csv(housing_csv(&[5]).as_bytes()).unwrap());
    state.set_target("price");

    let json = state.report().unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["source"], "houses.csv");
    assert_eq!(value["config"]["random_state"], 42);
    assert_eq!(value["cleaning"]["dropped_rows"][0], 5);
    assert_eq!(value["selection"]["target"], "price");
    assert_eq!(value["evaluation"]["holdout_rows"], 20);
}
