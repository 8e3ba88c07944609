//! Integration tests for full processing runs.

use std::fs;
use std::path::Path;

use rowing_core::{
    ChartBuilder, CoreError, DataLayout, DatasetMode, Partition, Pipeline, Unit,
};
use tempfile::TempDir;

const SAMPLE_LOG: &str = "\
25.01.2020,2:12.6,2500 m
26.01.2020,2:15.0,2500 m
27.01.2020,30:00.0,30 min
";

fn project_with(mode: DatasetMode, log: &str) -> (TempDir, Pipeline) {
    let dir = TempDir::new().unwrap();
    let layout = DataLayout::for_project(dir.path());
    fs::create_dir_all(layout.data_dir()).unwrap();
    fs::write(layout.input_path(mode), log).unwrap();
    let pipeline = Pipeline::new(layout, ChartBuilder::new());
    (dir, pipeline)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_end_to_end_sample_run() {
    let (_dir, pipeline) = project_with(DatasetMode::Full, SAMPLE_LOG);
    let summary = pipeline.run(DatasetMode::Full).unwrap();

    assert_eq!(summary.count(Partition::DistanceRaw), 2);
    assert_eq!(summary.count(Partition::DurationRaw), 1);
    assert!(summary.failures.is_empty());

    let layout = pipeline.layout();
    assert_eq!(
        read_lines(&layout.output_path(Partition::DistanceRaw)),
        vec!["25.01.2020, 2:12.6, 2500", "26.01.2020, 2:15.0, 2500"]
    );
    assert_eq!(
        read_lines(&layout.output_path(Partition::DurationRaw)),
        vec!["27.01.2020, 30:00.0, 30"]
    );

    let power_lines = read_lines(&layout.output_path(Partition::DistancePower));
    assert_eq!(power_lines.len(), 2);
    assert!(power_lines[0].starts_with("25.01.2020, "));
    assert!(power_lines[1].starts_with("26.01.2020, "));
    for line in &power_lines {
        let watts: u32 = line.split(", ").nth(1).unwrap().parse().unwrap();
        assert!(watts > 0);
    }

    let duration_power = read_lines(&layout.output_path(Partition::DurationPower));
    assert_eq!(duration_power.len(), 1);
    // 30:00.0 per 500 m is barely moving
    assert_eq!(duration_power[0], "27.01.2020, 0, 30");
}

#[test]
fn test_bad_lines_are_skipped_not_fatal() {
    let log = "\
25.01.2020,2:12.6,2500 m
this is not a workout
31.02.2020,2:12.6,2500 m
26.01.2020,2:15.0,2500 m
";
    let (_dir, pipeline) = project_with(DatasetMode::MinDistance, log);
    let summary = pipeline.run(DatasetMode::MinDistance).unwrap();

    assert_eq!(summary.failures.len(), 2);
    assert_eq!(summary.count(Partition::DistanceRaw), 2);
    assert_eq!(summary.count(Partition::DistancePower), 2);
}

#[test]
fn test_running_twice_does_not_duplicate_records() {
    let (_dir, pipeline) = project_with(DatasetMode::Full, SAMPLE_LOG);
    let first = pipeline.run(DatasetMode::Full).unwrap();
    let first_lines = read_lines(&pipeline.layout().output_path(Partition::DistanceRaw));

    let second = pipeline.run(DatasetMode::Full).unwrap();
    let second_lines = read_lines(&pipeline.layout().output_path(Partition::DistanceRaw));

    assert_eq!(first.count(Partition::DistanceRaw), 2);
    assert_eq!(second.count(Partition::DistanceRaw), 2);
    assert_eq!(second.store.raw(Unit::Distance), first.store.raw(Unit::Distance));
    assert_eq!(first_lines, second_lines);
}

#[test]
fn test_missing_input_aborts_run_only() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(DataLayout::for_project(dir.path()), ChartBuilder::new());

    let err = pipeline.run(DatasetMode::MinDistanceNo1993).unwrap_err();
    match err {
        CoreError::Io { path, .. } => {
            assert!(path.ends_with("input_no_less_than_2500m_wo_1993.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_chart_is_written_under_plots() {
    let (_dir, pipeline) = project_with(DatasetMode::Full, SAMPLE_LOG);
    let summary = pipeline.run(DatasetMode::Full).unwrap();

    let expected = pipeline.layout().chart_path(DatasetMode::Full);
    assert_eq!(summary.chart.path, expected);
    assert_eq!((summary.chart.width, summary.chart.height), (744, 400));
    assert!(summary.chart.fit.is_none());

    let bytes = fs::read(&expected).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn test_regression_mode_reports_fit() {
    let log = "\
05.01.2021,2:10.0,2500 m
15.01.2021,2:09.0,2500 m
25.01.2021,2:08.5,2500 m
04.02.2021,2:07.0,2500 m
";
    let (_dir, pipeline) = project_with(DatasetMode::RegressionLate, log);
    let summary = pipeline.run(DatasetMode::RegressionLate).unwrap();

    let fit = summary.chart.fit.expect("regression fit");
    assert!(fit.slope > 0.0, "getting faster should raise power");
    assert!(fit.r_squared > 0.9);
    assert!(summary
        .chart
        .path
        .ends_with("plots/power_no_less_than_2500m_regression_late.png"));
}

#[test]
fn test_regression_with_single_point_is_insufficient_data() {
    let log = "05.01.2021,2:10.0,2500 m\n";
    let (_dir, pipeline) = project_with(DatasetMode::RegressionEarly, log);

    let err = pipeline.run(DatasetMode::RegressionEarly).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Chart(rowing_core::ChartError::InsufficientData(1))
    ));
    // lists were still written before the chart step failed
    assert!(pipeline
        .layout()
        .output_path(Partition::DistanceRaw)
        .exists());
}
