//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated HOME and data folder.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_rowing-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("ROWING_HISTORY_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("Data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("input_test.txt"),
        "25.01.2020,2:12.6,2500 m\n26.01.2020,2:15.0,2500 m\n27.01.2020,30:00.0,30 min\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_run_writes_lists() {
    let dir = project();
    let project_dir = dir.path().to_str().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["run", "--mode", "1", "--project-dir", project_dir]);
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("25.01.2020, 2:12.6, 2500, m"));
    assert!(stdout.contains("27.01.2020, 30:00.0, 30, min"));

    let list = fs::read_to_string(dir.path().join("Data/distanceList.txt")).unwrap();
    assert_eq!(list, "25.01.2020, 2:12.6, 2500\n26.01.2020, 2:15.0, 2500\n");
    assert!(dir.path().join("Data/plots/power.png").exists());
}

#[test]
fn test_run_json_summary() {
    let dir = project();
    let data_dir = dir.path().join("Data");
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["run", "--mode", "1", "--json", "--data-dir", data_dir.to_str().unwrap()],
    );
    assert_eq!(code, 0, "run failed: {stderr}");
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["mode"], "full");
    assert_eq!(summary["outputs"].as_array().unwrap().len(), 4);
}

#[test]
fn test_run_rejects_unknown_mode() {
    let dir = project();
    let (_, _, code) = run_cli(dir.path(), &["run", "--mode", "7"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_missing_input_fails() {
    let dir = project();
    let project_dir = dir.path().to_str().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["run", "--mode", "3", "--project-dir", project_dir]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_parse_reports_failures() {
    let dir = project();
    let log = dir.path().join("mixed.txt");
    fs::write(&log, "25.01.2020,2:12.6,2500 m\nnope\n").unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["parse", log.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("25.01.2020, 2:12.6, 2500, m"));
    assert!(stderr.contains("Line did not match pattern: nope"));
    assert!(stderr.contains("1 record(s), 1 rejected line(s)"));
}

#[test]
fn test_menu_exits_on_x() {
    let dir = project();
    let project_dir = dir.path().to_str().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_rowing-cli"))
        .args(["menu", "--project-dir", project_dir])
        .env("HOME", dir.path())
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    {
        use std::io::Write;
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(b"1\n\nx\n").unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Distances (meters):"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "chart.width", "1024"]);
    assert_eq!(code, 0, "config set failed: {stderr}");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "chart.width"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1024");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "chart.nope"]);
    assert_ne!(code, 0);
}
