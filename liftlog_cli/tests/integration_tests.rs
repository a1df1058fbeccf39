//! Integration tests for the liftlog binary.
//!
//! These tests drive the CLI against a temporary data directory with a
//! pinned `--today`, covering:
//! - Logging done and rest days
//! - Week schedule output
//! - Cycle and rest target edits
//! - Backfill of missed days

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary pointed at `data_dir` on a fixed day
///
/// The config lookup is redirected into `data_dir` so a user's own
/// config file cannot change the defaults under test.
fn cli(data_dir: &Path, today: &str) -> Command {
    let mut cmd = Command::cargo_bin("liftlog").expect("Failed to find liftlog binary");
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--today")
        .arg(today);
    cmd
}

fn read_state(data_dir: &Path) -> Value {
    let contents = fs::read_to_string(data_dir.join("state.json")).expect("Failed to read state");
    serde_json::from_str(&contents).expect("state.json should be valid JSON")
}

fn read_log(data_dir: &Path) -> Vec<Value> {
    fs::read_to_string(data_dir.join("log.jsonl"))
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("log line should be valid JSON"))
        .collect()
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("liftlog")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout rotation tracker"));
}

#[test]
fn test_first_run_creates_default_state() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-06")
        .assert()
        .success()
        .stdout(predicate::str::contains("Today: Push Day"))
        .stdout(predicate::str::contains("Rest: 0/2 this week"));

    let state = read_state(data_dir);
    assert_eq!(state["cycle"], serde_json::json!(["push", "pull", "legs"]));
    assert_eq!(state["position"], 0);
    assert!(state["last_log_date"].is_null());
}

#[test]
fn test_midweek_done_advances_rotation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-04").arg("done").assert().success();
    cli(data_dir, "2024-03-05").arg("done").assert().success();

    cli(data_dir, "2024-03-06")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Today: Legs Day"));

    cli(data_dir, "2024-03-06")
        .arg("done")
        .assert()
        .success()
        .stdout(predicate::str::contains("Legs — Done!"))
        .stdout(predicate::str::contains("Next up: Push"));

    let state = read_state(data_dir);
    assert_eq!(state["position"], 0);
    assert_eq!(state["last_log_date"], "2024-03-06");

    cli(data_dir, "2024-03-06")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 day streak"))
        .stdout(predicate::str::contains("✅ Legs"));
}

#[test]
fn test_double_logging_is_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-06").arg("done").assert().success();
    cli(data_dir, "2024-03-06")
        .arg("rest")
        .assert()
        .success()
        .stdout(predicate::str::contains("already logged"));

    assert_eq!(read_log(data_dir).len(), 1);
    assert_eq!(read_state(data_dir)["position"], 1);
}

#[test]
fn test_rest_keeps_workout_queued() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-06")
        .arg("rest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push stays queued"));

    let state = read_state(data_dir);
    assert_eq!(state["position"], 0);
    assert_eq!(state["last_log_date"], "2024-03-06");

    let log = read_log(data_dir);
    assert_eq!(log[0]["workout_type"], "rest");
    assert_eq!(log[0]["status"], "rest");

    cli(data_dir, "2024-03-06")
        .assert()
        .success()
        .stdout(predicate::str::contains("😴 Rest"))
        .stdout(predicate::str::contains("Rest: 1/2 this week"));
}

#[test]
fn test_schedule_output() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-04")
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week of Mar 4"))
        .stdout(predicate::str::contains("  Mon  ·  Push  ←"))
        .stdout(predicate::str::contains("  Thu  ·  Rest"))
        .stdout(predicate::str::contains("  Sun  ·  Rest"))
        .stdout(predicate::str::contains("Rest days: 0/2"));
}

#[test]
fn test_cycle_edit_resets_position() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-06").arg("done").assert().success();

    cli(data_dir, "2024-03-07")
        .arg("cycle")
        .arg(" Upper , LOWER,, ")
        .assert()
        .success()
        .stdout(predicate::str::contains("New cycle: Upper, Lower"))
        .stdout(predicate::str::contains("Position reset to start."));

    let state = read_state(data_dir);
    assert_eq!(state["cycle"], serde_json::json!(["upper", "lower"]));
    assert_eq!(state["position"], 0);

    cli(data_dir, "2024-03-07")
        .arg("cycle")
        .arg(" , ")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle unchanged"));
    assert_eq!(read_state(data_dir)["cycle"], serde_json::json!(["upper", "lower"]));
}

#[test]
fn test_rest_target_validation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-06")
        .arg("rest-target")
        .arg("3")
        .assert()
        .success();
    assert_eq!(read_state(data_dir)["rest_days_per_week"], 3);

    for bad in ["8", "-1", "two", "2.5"] {
        cli(data_dir, "2024-03-06")
            .arg("rest-target")
            .arg(bad)
            .assert()
            .success()
            .stdout(predicate::str::contains("Rest target unchanged"));
    }
    assert_eq!(read_state(data_dir)["rest_days_per_week"], 3);
}

#[test]
fn test_backfill_flag_fills_gap() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-01").arg("done").assert().success();

    cli(data_dir, "2024-03-05")
        .arg("--backfill")
        .arg("done")
        .assert()
        .success()
        .stdout(predicate::str::contains("Missed: Saturday Mar 2"))
        .stdout(predicate::str::contains("Backfilled 3 missed day(s)"));

    let state = read_state(data_dir);
    // One live done plus three backfilled dones
    assert_eq!(state["position"], 1);
    assert_eq!(state["last_log_date"], "2024-03-04");
    assert_eq!(read_log(data_dir).len(), 4);
}

#[test]
fn test_interactive_backfill_stops_at_end_of_input() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-01").arg("done").assert().success();

    // Answer only the first of three missed days
    cli(data_dir, "2024-03-05")
        .write_stdin("r\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scheduled workout: Pull"))
        .stdout(predicate::str::contains("2 missed day(s) left"));

    let state = read_state(data_dir);
    assert_eq!(state["position"], 1);
    assert_eq!(state["last_log_date"], "2024-03-02");

    // Resume with the remaining two
    cli(data_dir, "2024-03-05")
        .write_stdin("d\ns\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Missed: Sunday Mar 3"))
        .stdout(predicate::str::contains("Missed: Saturday Mar 2").not());

    let state = read_state(data_dir);
    assert_eq!(state["position"], 2);
    assert_eq!(state["last_log_date"], "2024-03-04");

    let statuses: Vec<String> = read_log(data_dir)
        .iter()
        .map(|e| e["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["done", "rest", "done", "skip"]);
}

#[test]
fn test_history_lists_newest_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-04").arg("done").assert().success();
    cli(data_dir, "2024-03-05").arg("rest").assert().success();

    cli(data_dir, "2024-03-05")
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)2024-03-05.*Rest.*2024-03-04.*Push").unwrap());
}

#[test]
fn test_config_default_cycle_seeds_first_run() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let config_dir = data_dir.join("config/liftlog");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[tracker]\ndefault_cycle = [\"Upper\", \"Lower\"]\n",
    )
    .unwrap();

    cli(data_dir, "2024-03-06")
        .assert()
        .success()
        .stdout(predicate::str::contains("Today: Upper Day"));

    assert_eq!(
        read_state(data_dir)["cycle"],
        serde_json::json!(["upper", "lower"])
    );
}

#[test]
fn test_earlier_today_does_not_relog() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir, "2024-03-07").arg("done").assert().success();
    cli(data_dir, "2024-03-06")
        .arg("done")
        .assert()
        .success()
        .stdout(predicate::str::contains("already logged"));

    assert_eq!(read_log(data_dir).len(), 1);
    assert_eq!(read_state(data_dir)["last_log_date"], "2024-03-07");
}

#[test]
fn test_corrupted_state_file_recovers() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    fs::write(data_dir.join("state.json"), "{ invalid json }}}}").unwrap();

    cli(data_dir, "2024-03-06")
        .arg("done")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push — Done!"));

    assert_eq!(read_state(data_dir)["position"], 1);
}
