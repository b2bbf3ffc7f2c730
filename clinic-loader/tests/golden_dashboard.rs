use std::fs;

use clinic_core::{
    render_view, DashboardConfig, FilterCriteria, HeatmapCell, Interaction, SelectionState,
};
use clinic_loader::load_dataset;
use serde_json::{json, Value};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn sample_dataset_matches_golden_view() {
    let config = DashboardConfig::default();
    let dataset = load_dataset(fixture_path("clinical_sample.csv"), &config)
        .expect("Không đọc được dataset mẫu");
    let summary = dataset.summary();

    let criteria = FilterCriteria::from_params(
        "2014-01-01",
        "2014-01-15",
        "Madison Center",
        summary.admit_sources.iter().cloned(),
    )
    .expect("Điều kiện lọc không hợp lệ");
    let cell = HeatmapCell::from_labels("09 AM", "Thursday").expect("Ô heatmap không hợp lệ");
    let interaction = Interaction {
        criteria,
        selection: SelectionState::clicked(cell),
    };

    let view = render_view(&dataset, &interaction, &config);

    let nonzero_cells: Vec<Value> = view
        .heatmap
        .annotations
        .iter()
        .filter(|a| view.heatmap.value(a.weekday, a.hour) != 0.0)
        .map(|a| {
            json!({
                "weekday": a.weekday,
                "hour": a.hour,
                "value": view.heatmap.value(a.weekday, a.hour),
                "text": a.text,
                "emphasized": a.emphasized,
            })
        })
        .collect();

    let actual = json!({
        "summary": summary,
        "matched_records": view.matched_records,
        "nonzero_cells": nonzero_cells,
        "wait_time": view.wait_time,
        "care_score": view.care_score,
    });

    let expected = fs::read_to_string(fixture_path("clinical_sample_view.json"))
        .expect("Không đọc được golden view");
    let expected: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected);
}
