//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_focusloop"))
        .args(args)
        .env("FOCUSLOOP_DATA_DIR", data_dir)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

#[test]
fn test_catalog_ambient_lists_builtin_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["catalog", "ambient"]);
    assert_eq!(stdout.lines().count(), 8);
    assert!(stdout.contains("birds"));
    assert!(stdout.contains("Waterfall"));
}

#[test]
fn test_catalog_track_search() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["catalog", "tracks", "--search", "yasin"]);
    assert!(stdout.starts_with("036"));
}

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["config", "show"]);
    let settings: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(settings["pomodoro_minutes"], 25);
    assert_eq!(settings["short_break_minutes"], 5);
    assert_eq!(settings["long_break_minutes"], 15);
    assert_eq!(settings["sound_enabled"], true);
}

#[test]
fn test_config_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "volume", "55"]);
    let stdout = run_cli_success(dir.path(), &["config", "get", "volume"]);
    assert_eq!(stdout.trim(), "55");
}

#[test]
fn test_config_set_rejects_out_of_range_volume() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "volume", "150"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("volume"));

    let stdout = run_cli_success(dir.path(), &["config", "get", "volume"]);
    assert_eq!(stdout.trim(), "40");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "theme"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_reset() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "pomodoro_minutes", "50"]);
    run_cli_success(dir.path(), &["config", "reset"]);
    let stdout = run_cli_success(dir.path(), &["config", "get", "pomodoro_minutes"]);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_stats_starts_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["stats"]);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["completed_focus_count"], 0);
    assert_eq!(stats["cycle_position"], 1);
}

#[test]
fn test_dry_run_session_counts_skipped_focus() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli_with_input(
        dir.path(),
        &["run", "--dry-run"],
        "start\nskip\nstatus\nquit\n",
    );
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("Focus started"));
    assert!(stdout.contains("skipped: Short Break"));
    assert!(stdout.contains("Short Break 05:00 100% left (idle) cycle 2/4 [Start]"));

    let stdout = run_cli_success(dir.path(), &["stats"]);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["completed_focus_count"], 1);
}

#[test]
fn test_dry_run_applies_settings() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_with_input(
        dir.path(),
        &["run", "--dry-run"],
        "set play_during_breaks true\ntoggle rain\nquit\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("updated play_during_breaks"));
    assert!(stdout.contains("updated active_ambient_track_ids"));

    let stdout = run_cli_success(dir.path(), &["config", "get", "active_ambient_track_ids"]);
    assert!(stdout.contains("rain"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[storage\nbackend =").unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["stats"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error: Configuration error"), "{stderr}");
}
