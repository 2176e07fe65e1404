//! End-to-end tests for the upload → view → summary / chart / export pipeline.

use proptest::prelude::*;
use rio_tourism_dash::data::chart::{ChartKind, ChartSeries};
use rio_tourism_dash::data::filter::FilterSpec;
use rio_tourism_dash::data::loader::{Separator, TableLoader, Upload};
use rio_tourism_dash::data::model::CellValue;
use rio_tourism_dash::error::DataError;
use rio_tourism_dash::state::{AppState, ViewState};

const CITIES: &str = "city,visitors\nRio,100\nSP,200\n";

fn session(text: &str, separator: Separator) -> AppState {
    let mut state = AppState::default();
    state.set_separator(separator);
    state.set_upload(Upload::new("upload-1", "cities.csv", text.as_bytes().to_vec()));
    state
}

#[test]
fn test_range_filter_summary_and_bar_chart() {
    let mut state = session(CITIES, Separator::Comma);

    let loaded = state.current_view().unwrap();
    assert_eq!(loaded.row_count(), 2);
    assert_eq!(loaded.column_names(), vec!["city", "visitors"]);

    state
        .set_filter(FilterSpec::Range {
            column: "visitors".into(),
            min: 100.0,
            max: 100.0,
        })
        .unwrap();
    let view = state.current_view().unwrap();
    assert_eq!(view.row_count(), 1);
    assert_eq!(
        view.row(0).unwrap(),
        vec![&CellValue::Text("Rio".into()), &CellValue::Integer(100)]
    );

    let summary = state.summary().unwrap();
    assert_eq!(summary.row_count, 1);
    assert_eq!(summary.means.len(), 1);
    assert_eq!(summary.mean_of("visitors"), Some(100.0));

    match state.chart(ChartKind::Bar).unwrap() {
        ChartSeries::Xy { x, y, .. } => {
            assert_eq!(x, vec![CellValue::Text("Rio".into())]);
            assert_eq!(y, vec![CellValue::Integer(100)]);
        }
        other => panic!("expected an x/y series, got {other:?}"),
    }
}

#[test]
fn test_equality_filter_then_export() {
    let mut state = session(CITIES, Separator::Comma);
    state
        .set_filter(FilterSpec::Equality {
            column: "city".into(),
            value: CellValue::Text("SP".into()),
        })
        .unwrap();

    let exported = String::from_utf8(state.export().unwrap()).unwrap();
    assert_eq!(exported, "city,visitors\nSP,200\n");
}

#[test]
fn test_export_always_uses_commas() {
    let state = session("city;visitors\nRio;100\n", Separator::Semicolon);
    let exported = String::from_utf8(state.export().unwrap()).unwrap();
    assert_eq!(exported, "city,visitors\nRio,100\n");
}

#[test]
fn test_all_rows_after_filter_returns_loaded_table() {
    let mut state = session(CITIES, Separator::Comma);
    let original = state.current_view().unwrap().clone();

    state
        .set_filter(FilterSpec::Equality {
            column: "city".into(),
            value: CellValue::Text("Rio".into()),
        })
        .unwrap();
    state.set_filter(FilterSpec::default()).unwrap();

    assert!(matches!(state.view, ViewState::Loaded { .. }));
    assert_eq!(state.current_view().unwrap(), &original);
}

#[test]
fn test_chart_notices_leave_summary_usable() {
    let mut state = session(CITIES, Separator::Comma);
    state
        .set_filter(FilterSpec::all_rows_with(vec!["city".into()]))
        .unwrap();

    let bar = state.chart(ChartKind::Bar).unwrap_err();
    assert!(matches!(bar, DataError::InsufficientColumns(1)));
    assert!(bar.is_notice());

    let hist = state.chart(ChartKind::Histogram).unwrap_err();
    assert!(matches!(hist, DataError::NoNumericColumn));

    let summary = state.summary().unwrap();
    assert_eq!(summary.row_count, 2);
    assert!(!summary.has_numeric_data());
}

#[test]
fn test_malformed_upload_stays_empty() {
    let state = session("a,b\n1,2,3\n", Separator::Comma);
    assert!(state.view.is_empty());
    assert!(state.status_message.is_some());
    assert!(matches!(state.export(), Err(DataError::NoDataLoaded)));
}

#[test]
fn test_exposed_data_serializes() {
    let state = session(CITIES, Separator::Comma);
    let summary = serde_json::to_value(state.summary().unwrap()).unwrap();
    assert_eq!(summary["row_count"], 2);
    assert_eq!(summary["means"][0]["column"], "visitors");
    assert_eq!(summary["means"][0]["mean"], 150.0);

    let series = serde_json::to_value(state.chart(ChartKind::Pie).unwrap()).unwrap();
    assert_eq!(series["type"], "pie");
    assert_eq!(series["names"][1], "SP");
    assert_eq!(series["values"][1], 200);
}

fn csv_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-z]{1,6}", 0i64..10_000), 0..30).prop_map(|rows| {
        let mut text = String::from("name,count\n");
        for (name, count) in rows {
            text.push_str(&format!("{name},{count}\n"));
        }
        text
    })
}

proptest! {
    #[test]
    fn test_repeated_load_hits_cache(text in csv_strategy()) {
        let mut loader = TableLoader::new();
        let upload = Upload::new("same", "same.csv", text.into_bytes());
        let first = loader.load(&upload, Separator::Comma).unwrap();
        let second = loader.load(&upload, Separator::Comma).unwrap();
        prop_assert_eq!(loader.parse_count(), 1);
        prop_assert_eq!(first.table.as_ref(), second.table.as_ref());
    }
}
