//! Integration tests for the ascend CLI.
//!
//! Each test runs the real binary against a temporary data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI bound to a data directory, with config lookups kept inside it
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ascend"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn plan_bench(data_dir: &Path) {
    cli(data_dir)
        .args(["plan", "add", "--day", "monday", "--exercise", "Barbell Bench Press"])
        .args(["--sets", "3", "--reps", "6-8", "--weight", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Planned Barbell Bench Press on Monday"));
}

fn log_single(data_dir: &Path, exercise: &str, weight: &str, date: &str) {
    cli(data_dir)
        .args(["log", "--exercise", exercise, "--weight", weight, "--reps", "1", "--date", date])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("ascend"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("double progression"));
}

#[test]
fn test_plan_add_and_show() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);
    assert!(data_dir.join("wal/state.json").exists());

    cli(data_dir)
        .args(["plan", "show", "--day", "mon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Barbell Bench Press | 3 x 6-8 @ 60 kg (base)"));

    cli(data_dir)
        .args(["plan", "show", "--day", "tuesday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises planned."));
}

#[test]
fn test_plan_rejects_bad_targets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Off the 2.5 grid
    cli(data_dir)
        .args(["plan", "add", "--day", "monday", "--exercise", "Deadlift"])
        .args(["--reps", "4-6", "--weight", "101"])
        .assert()
        .failure();

    // Unknown rep range
    cli(data_dir)
        .args(["plan", "add", "--day", "monday", "--exercise", "Deadlift"])
        .args(["--reps", "8-11", "--weight", "100"])
        .assert()
        .failure();

    // Not in the catalog and no muscle group given
    cli(data_dir)
        .args(["plan", "add", "--day", "monday", "--exercise", "Zercher Carry"])
        .args(["--reps", "8-10", "--weight", "40"])
        .assert()
        .failure();

    assert!(!data_dir.join("wal/state.json").exists());
}

#[test]
fn test_plan_remove() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);

    let state: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(data_dir.join("wal/state.json")).unwrap()).unwrap();
    let id = state["plan"][0]["id"].as_str().unwrap().to_string();

    cli(data_dir).args(["plan", "remove", &id]).assert().success();
    cli(data_dir).args(["plan", "remove", &id]).assert().failure();

    cli(data_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises planned."));
}

#[test]
fn test_plan_edit() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);

    let state_path = data_dir.join("wal/state.json");
    let before: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
    let id = before["plan"][0]["id"].as_str().unwrap().to_string();

    cli(data_dir)
        .args(["plan", "edit", &id, "--reps", "8-10", "--weight", "62.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Barbell Bench Press on Monday: 3 x 8-10 @ 62.5 kg"));

    let after: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
    assert_eq!(after["plan"].as_array().unwrap().len(), 1);
    assert_eq!(after["plan"][0]["id"], before["plan"][0]["id"]);
    assert_eq!(after["plan"][0]["created_at"], before["plan"][0]["created_at"]);
    assert_eq!(after["plan"][0]["target_rep_range"], "8-10");

    // Off-grid weight and unknown ids are rejected without touching the plan
    cli(data_dir)
        .args(["plan", "edit", &id, "--weight", "61"])
        .assert()
        .failure();
    cli(data_dir)
        .args(["plan", "edit", "6f1b7c2e-2a4d-4f7e-9a51-0c9d1e3b8a21", "--sets", "4"])
        .assert()
        .failure();
    cli(data_dir).args(["plan", "edit", &id]).assert().failure();

    cli(data_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Barbell Bench Press | 3 x 8-10 @ 62.5 kg"));
}

#[test]
fn test_log_rep_range_uses_midpoint() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "--exercise", "Barbell Squat", "--weight", "100", "--reps", "6-8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 kg x 7"));

    let wal = std::fs::read_to_string(data_dir.join("wal/workouts.wal")).unwrap();
    let record: serde_json::Value = serde_json::from_str(wal.lines().next().unwrap()).unwrap();
    assert_eq!(record["reps"], 7);
    assert_eq!(record["muscle_group"], "Legs");
    let estimate = record["estimated_1rm"].as_f64().unwrap();
    assert!((estimate - 123.3).abs() < 1e-9);
}

#[test]
fn test_log_custom_exercise_needs_muscle() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "--exercise", "Zercher Squat", "--weight", "60", "--reps", "5"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["log", "--exercise", "Zercher Squat", "--muscle", "legs", "--weight", "60", "--reps", "5"])
        .assert()
        .success();
}

#[test]
fn test_session_progresses_plan() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);

    // 2024-06-03 is a Monday
    cli(data_dir)
        .args(["session", "--date", "2024-06-03", "--auto-complete", "--reps", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set 3/3: 60 kg x 8 | rest 150s"))
        .stdout(predicate::str::contains("Push to 8-10 reps this week"))
        .stdout(predicate::str::contains("Session complete! 3 sets logged."));

    let wal = std::fs::read_to_string(data_dir.join("wal/workouts.wal")).unwrap();
    assert_eq!(wal.lines().count(), 3);

    cli(data_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 x 8-10 @ 60 kg (next)"));

    // Topping out the next range adds weight and drops back
    cli(data_dir)
        .args(["session", "--day", "monday", "--date", "2024-06-10", "--auto-complete", "--reps", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+2.5 unlocked!"));

    cli(data_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 x 6-8 @ 62.5 kg (base)"));
}

#[test]
fn test_session_midpoint_holds_target() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);

    cli(data_dir)
        .args(["session", "--day", "monday", "--date", "2024-06-03", "--auto-complete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("60 kg x 7"))
        .stdout(predicate::str::contains("Keep pushing, aim for 8 reps on every set"));

    cli(data_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 x 6-8 @ 60 kg (base)"));
}

#[test]
fn test_dry_run_does_not_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);

    cli(data_dir)
        .args(["session", "--day", "monday", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MONDAY SESSION"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.join("wal/workouts.wal").exists());
}

#[test]
fn test_session_on_empty_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["session", "--day", "sunday", "--auto-complete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing planned for Sunday (Rest Day)"));
}

#[test]
fn test_stats_tier() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["profile", "--weight", "80", "--height", "180", "--path", "strength"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile updated"));

    log_single(data_dir, "Barbell Squat", "100", "2024-06-01");
    log_single(data_dir, "Barbell Bench Press", "80", "2024-06-01");
    log_single(data_dir, "Deadlift", "140", "2024-06-02");

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strength score: 4"))
        .stdout(predicate::str::contains("Heavy (50%)"))
        .stdout(predicate::str::contains("Next tier:      Strong"))
        .stdout(predicate::str::contains("2024-06-01  2.25"))
        .stdout(predicate::str::contains("(estimated)").not());
}

#[test]
fn test_stats_marks_estimated_lifts() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["profile", "--weight", "80"]).assert().success();
    log_single(data_dir, "Leg Press", "200", "2024-06-01");

    let output = cli(data_dir).args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["lifts"]["squat_1rm"], 200.0);
    assert_eq!(snapshot["lifts"]["estimated"][0], "squat");
    assert_eq!(snapshot["total_strength_score"], 2.5);
    assert_eq!(snapshot["tier"]["name"], "Iron");
}

#[test]
fn test_schedule_defaults_and_edit() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday     Push Day"))
        .stdout(predicate::str::contains("Sunday     Rest Day"));

    cli(data_dir)
        .args(["schedule", "--day", "sunday", "--workout", "core", "--label", "Abs Finisher"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sunday     Abs Finisher"));

    // A new split resets the week
    cli(data_dir).args(["profile", "--split", "upper_lower"]).assert().success();
    cli(data_dir)
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday     Upper Day"))
        .stdout(predicate::str::contains("Sunday     Rest Day"));
}

#[test]
fn test_coach_prints_request() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    plan_bench(data_dir);
    log_single(data_dir, "Deadlift", "140", "2024-06-02");

    let output = cli(data_dir)
        .args(["coach", "--message", "How is my deadlift?"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let request: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(request["max_tokens"], 1024);
    assert_eq!(request["messages"][0]["role"], "system");
    assert_eq!(request["messages"][1]["role"], "user");
    assert_eq!(request["messages"][1]["content"], "How is my deadlift?");

    let system = request["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("Deadlift 140kg"));
    assert!(system.contains("Monday: Barbell Bench Press (3 sets, 6-8 reps)"));
}

#[test]
fn test_rollup_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for date in ["2024-06-01", "2024-06-02", "2024-06-03"] {
        log_single(data_dir, "Barbell Squat", "100", date);
    }

    cli(data_dir)
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 3 workouts"));

    let csv = std::fs::read_to_string(data_dir.join("workouts.csv")).unwrap();
    assert!(csv.starts_with("id,date,muscle_group,exercise_name"));
    let live = std::fs::read_to_string(data_dir.join("wal/workouts.wal")).unwrap();
    assert!(live.is_empty());

    // A second rollup finds nothing new
    cli(data_dir)
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 0 workouts"));

    // History still sees archived workouts
    cli(data_dir)
        .args(["history", "--exercise", "Barbell Squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-03"))
        .stdout(predicate::str::contains("2024-06-01"));
}

#[test]
fn test_rollup_with_cleanup() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_single(data_dir, "Deadlift", "140", "2024-06-02");

    cli(data_dir)
        .args(["rollup", "--cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned up 1 processed WAL files"));

    let leftovers: Vec<_> = std::fs::read_dir(data_dir.join("wal"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".processed"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_empty_rollup() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));
}
