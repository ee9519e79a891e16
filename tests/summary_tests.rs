use commplot::model::{ConfigurationMetrics, RunCounts};
use commplot::render::{Summary, render_summary_json, render_summary_table, write_summary_json};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn metrics() -> Vec<ConfigurationMetrics> {
    vec![ConfigurationMetrics {
        name: "local".to_string(),
        label: "local clause sharing".to_string(),
        directory: PathBuf::from("local_clause_sharing/results"),
        worker_counts: vec![2, 4],
        average_total_time: vec![12.5, 7.25],
        average_comm_event_count: vec![3.0, 4.5],
        average_comm_event_time: vec![0.02, 0.035],
        runs: vec![
            RunCounts {
                completed: 2,
                timed_out: 0,
                missing: 0,
            },
            RunCounts {
                completed: 1,
                timed_out: 1,
                missing: 0,
            },
        ],
    }]
}

#[test]
fn json_summary_keeps_arrays_aligned_with_worker_counts() {
    let metrics = metrics();
    let cases = vec!["sat_case_1".to_string(), "sat_case_3".to_string()];
    let summary = Summary {
        worker_counts: &[2, 4],
        cases: &cases,
        configurations: &metrics,
    };

    let json = render_summary_json(&summary).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["worker_counts"], serde_json::json!([2, 4]));
    let config = &value["configurations"][0];
    assert_eq!(config["name"], "local");
    assert_eq!(config["average_total_time"], serde_json::json!([12.5, 7.25]));
    assert_eq!(config["runs"][1]["timed_out"], 1);
}

#[test]
fn json_summary_is_written_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.json");
    let metrics = metrics();
    let summary = Summary {
        worker_counts: &[2, 4],
        cases: &[],
        configurations: &metrics,
    };

    write_summary_json(&path, &summary).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"local clause sharing\""));
}

#[test]
fn table_has_one_row_per_worker_count() {
    let metrics = metrics();
    let summary = Summary {
        worker_counts: &[2, 4],
        cases: &[],
        configurations: &metrics,
    };

    let table = render_summary_table(&summary);
    let lines: Vec<&str> = table.lines().collect();

    assert!(lines[0].starts_with("local clause sharing (local)"));
    assert!(lines[2].trim_start().starts_with("2"));
    assert!(lines[2].contains("12.500"));
    assert!(lines[3].contains("7.250"));
}
