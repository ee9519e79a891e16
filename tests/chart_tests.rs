use commplot::experiment::{ConfigurationSpec, ExperimentSpec, MissingLogPolicy, SequenceScope};
use commplot::model::MetricAggregator;
use commplot::render::{ImageFormat, render_charts};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_run(root: &TempDir, case: &str, workers: u32, comm: &[f64], runtime: f64) {
    let dir = root.path().join("local");
    fs::create_dir_all(&dir).unwrap();
    let mut text = String::new();
    for (i, duration) in comm.iter().enumerate() {
        text.push_str(&format!("0.100 0 Communication {} took {:.4} s\n", i + 1, duration));
    }
    text.push_str(&format!("c {:.3} 0 Mono job done.\n", runtime));
    fs::write(dir.join(format!("{}-{}.txt", case, workers)), text).unwrap();
}

#[test]
fn svg_report_writes_both_charts() {
    let root = TempDir::new().unwrap();
    write_run(&root, "sat_case_1", 1, &[], 9.0);
    write_run(&root, "sat_case_1", 2, &[0.25, 0.5], 6.0);
    write_run(&root, "sat_case_1", 4, &[0.125, 0.25, 0.5], 4.0);
    let experiment = ExperimentSpec {
        cases: vec!["sat_case_1".to_string()],
        worker_counts: vec![1, 2, 4],
        configurations: vec![ConfigurationSpec {
            name: "local".to_string(),
            label: Some("local sharing".to_string()),
            directory: PathBuf::from("local"),
        }],
        sequence_scope: SequenceScope::Run,
        missing_logs: MissingLogPolicy::Fail,
    }
    .validate_and_build(root.path())
    .unwrap();
    let metrics = MetricAggregator::new(&experiment)
        .unwrap()
        .aggregate_all()
        .unwrap();
    let out = root.path().join("charts");

    let written =
        render_charts(&out, ImageFormat::Svg, &experiment.worker_counts, &metrics).unwrap();

    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("timing.svg"));
    assert!(written[1].ends_with("comm.svg"));
    for path in &written {
        let len = fs::metadata(path).unwrap().len();
        assert!(len > 0, "{} is empty", path.display());
    }
}
