//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "locked-cli", "--"])
        .args(args)
        .env("LOCKED_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.work_duration_secs"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "3600");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "history.granularity", "daily"]);
    assert_eq!(code, 0, "Config set failed");
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "history.granularity"]);
    assert_eq!(stdout.trim(), "daily");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_duration_command() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["duration", "rest", "90s"]);
    assert_eq!(code, 0, "Duration failed");
    assert!(stdout.contains("01:30"));
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.rest_duration_secs"]);
    assert_eq!(stdout.trim(), "90");

    let (_, stderr, code) = run_cli(dir.path(), &["duration", "work", "ten"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_theme_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["theme"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "dark");
    let (stdout, _, _) = run_cli(dir.path(), &["theme", "toggle"]);
    assert_eq!(stdout.trim(), "light");
    let (stdout, _, _) = run_cli(dir.path(), &["theme"]);
    assert_eq!(stdout.trim(), "light");
}

#[test]
fn test_stats_and_history_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["stats"]);
    assert_eq!(code, 0, "Stats failed");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["all_time"], 0);
    assert_eq!(report["today"]["change"], "0");

    let (stdout, _, code) = run_cli(dir.path(), &["history"]);
    assert_eq!(code, 0, "History failed");
    let history: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(history["work"].as_object().unwrap().is_empty());
    assert!(history["rest"].as_object().unwrap().is_empty());
}

#[test]
fn test_heatmap_json_has_seven_rows() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["heatmap", "--json", "--mode", "work"]);
    assert_eq!(code, 0, "Heatmap failed");
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 7);
}

#[test]
fn test_run_start_status_quit() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) =
        run_cli_with_input(dir.path(), &["run", "--json", "--mode", "rest"], "s\n?\nq\n");
    assert_eq!(code, 0, "Run failed");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types, ["session_started", "state_snapshot", "session_paused"]);
    assert_eq!(events[0]["mode"], "rest");
    assert_eq!(events[1]["state"], "running");
}

#[test]
fn test_run_rejects_resume_when_idle() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli_with_input(dir.path(), &["run", "--json"], "r\n");
    assert_eq!(code, 0);
    assert!(stdout.trim().is_empty());
    assert!(stderr.contains("error:"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("locked"));
}
