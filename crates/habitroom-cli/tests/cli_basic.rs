//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitroom"))
        .env("HABITROOM_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn add_run(dir: &Path) {
    let (code, stdout, stderr) = run_cli(
        dir,
        &["habit", "add", "Run", "--start", "2099-01-01", "--end", "2099-01-10"],
    );
    assert_eq!(code, 0, "habit add failed: {stderr}");
    assert!(stdout.contains("Habit created: Run"));
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("habit"));
    assert!(stdout.contains("stats"));
}

#[test]
fn test_habit_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());
    assert!(dir.path().join("habits.json").exists());

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "list", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["name"], "Run");
    assert_eq!(parsed[0]["end_date"], "2099-01-10");
}

#[test]
fn test_duplicate_habit_fails() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["habit", "add", "Run", "--start", "2099-02-01", "--end", "2099-02-10"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_reversed_period_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["habit", "add", "Bad", "--start", "2099-01-10", "--end", "2099-01-01"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_check_and_stats_json() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());

    for day in ["2099-01-01", "2099-01-02"] {
        let (code, stdout, stderr) = run_cli(dir.path(), &["check", "Run", "--date", day]);
        assert_eq!(code, 0, "check failed: {stderr}");
        assert!(stdout.contains("Checked Run"));
    }
    let (_, stdout, _) = run_cli(dir.path(), &["check", "Run", "--date", "2099-01-02"]);
    assert!(stdout.contains("already checked"));

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "Run", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["completed_days"], 2);
    assert_eq!(parsed[0]["total_days"], 10);
    assert_eq!(parsed[0]["completion_rate"], 20.0);
    assert_eq!(parsed[0]["status"], "upcoming");
}

#[test]
fn test_toggle_and_uncheck() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());

    let (_, stdout, _) = run_cli(dir.path(), &["toggle", "Run", "--date", "2099-01-03"]);
    assert!(stdout.contains("Checked Run"));
    let (_, stdout, _) = run_cli(dir.path(), &["toggle", "Run", "--date", "2099-01-03"]);
    assert!(stdout.contains("Unchecked Run"));
    let (_, stdout, _) = run_cli(dir.path(), &["uncheck", "Run", "--date", "2099-01-03"]);
    assert!(stdout.contains("was not checked"));
}

#[test]
fn test_check_outside_period_fails() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());
    let (code, _, stderr) = run_cli(dir.path(), &["check", "Run", "--date", "2099-02-01"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("outside the period"));
}

#[test]
fn test_unknown_habit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["check", "Ghost"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Ghost"));

    let (code, _, _) = run_cli(dir.path(), &["habit", "remove", "Ghost"]);
    assert_eq!(code, 1);
}

#[test]
fn test_dates_then_remove() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());
    run_cli(dir.path(), &["check", "Run", "--date", "2099-01-09"]);

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["habit", "dates", "Run", "--start", "2099-01-01", "--end", "2099-01-05"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Habit updated"));

    let (_, stdout, _) = run_cli(dir.path(), &["stats", "Run", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["completed_days"], 0);
    assert_eq!(parsed[0]["total_days"], 5);

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "remove", "Run"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Habit removed"));
    let (_, stdout, _) = run_cli(dir.path(), &["habit", "list"]);
    assert!(stdout.contains("No habits yet."));
}

#[test]
fn test_corrupt_store_notice() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("habits.json"), "not json at all").unwrap();

    let (code, stdout, stderr) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("could not be read"));
    assert!(stdout.contains("No habits yet."));

    let backups = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("habits.json.backup."))
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "autosave.debounce_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2000");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "display.good_threshold", "40"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "display.good_threshold"]);
    assert_eq!(stdout.trim(), "40.0");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "nope.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));

    let (_, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert!(stdout.contains("display.good_threshold = 40.0"));
    assert!(stdout.contains("storage.data_file = habits.json"));
}

#[test]
fn test_config_rejects_inverted_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "display.good_threshold", "95"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must not exceed"));

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "display.good_threshold"]);
    assert_eq!(stdout.trim(), "50.0");
}

#[test]
fn test_habit_name_is_trimmed_on_add() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["habit", "add", "  Run  ", "--start", "2099-01-01", "--end", "2099-01-10"],
    );
    assert_eq!(code, 0, "habit add failed: {stderr}");

    let (code, stdout, _) = run_cli(dir.path(), &["check", "Run", "--date", "2099-01-01"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Checked Run"));
}

#[test]
fn test_calendar() {
    let dir = tempfile::tempdir().unwrap();
    add_run(dir.path());
    run_cli(dir.path(), &["check", "Run", "--date", "2099-01-05"]);

    let (code, stdout, _) = run_cli(dir.path(), &["calendar", "Run"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Run 2099-01"));
    assert!(stdout.contains("x5"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("habitroom"));
}
