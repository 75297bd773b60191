use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use leaderboard_app::{AppState, LeaderboardConfig};
use serde_json::Value;
use tempfile::tempdir;

fn state_for(stats_dir: &std::path::Path, out: &std::path::Path) -> AppState {
    let config = LeaderboardConfig {
        stats_dir: stats_dir.to_path_buf(),
        out: out.to_path_buf(),
        ..LeaderboardConfig::default()
    };
    AppState::new(config.resolve().expect("resolve config"))
}

fn read_json(path: &std::path::Path) -> Value {
    let contents = fs::read_to_string(path).expect("read output");
    serde_json::from_str(&contents).expect("output json")
}

#[test]
fn run_writes_ranked_document() {
    let dir = tempdir().expect("temp dir");
    let stats_dir = dir.path().join("stats");
    fs::create_dir_all(&stats_dir).expect("stats dir");
    fs::write(stats_dir.join("shift_stats_2025-10-31.json"), r#"{"A":5,"B":3}"#)
        .expect("write first");
    fs::write(
        stats_dir.join("shift_stats_2025-11-01.json"),
        r#"{"calls":{"A":2,"B":3},"dur_sec":{"A":600},"after_0000":{"B":1},"max_sec":{"A":420}}"#,
    )
    .expect("write second");
    fs::write(stats_dir.join("shift_stats_2025-11-02.json"), "not json").expect("write bad");

    let out = dir.path().join("docs").join("data.json");
    let state = state_for(&stats_dir, &out);
    let now = NaiveDate::from_ymd_opt(2025, 11, 1)
        .and_then(|day| day.and_hms_opt(12, 0, 0))
        .expect("now");
    let generated_at = Utc
        .with_ymd_and_hms(2025, 11, 1, 19, 0, 0)
        .single()
        .expect("generated_at");

    let summary = state
        .services
        .leaderboard
        .run_at(now, generated_at)
        .expect("run");
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.total_score, 13);
    assert_eq!(summary.stats.files_skipped, 1);
    assert!(!summary.no_data);

    let value = read_json(&out);
    assert_eq!(value["generated_at"], "2025-11-01T19:00:00.000Z");
    assert_eq!(value["total_records"], 2);
    assert_eq!(value["skipped_files"], 1);
    assert_eq!(value["no_data"], false);
    assert_eq!(
        value["ranking"],
        serde_json::json!([{"name": "A", "score": 7}, {"name": "B", "score": 6}])
    );
    assert_eq!(value["periods"]["today"]["meta"]["shift_date"], "A-Shift 11/01/25");
    assert_eq!(value["periods"]["today"]["rows"][0]["unit"], "B");
    assert_eq!(value["periods"]["today"]["rows"][0]["after_0000"], 1);
    assert_eq!(value["periods"]["today"]["rows"][1]["avg_min"], 5.0);
    assert_eq!(value["periods"]["prior"]["rows"][0]["calls"], 5);
    assert_eq!(value["periods"]["week"]["rows"][0]["calls_abc"], serde_json::json!([2, 0, 5]));
}

#[test]
fn rerun_produces_identical_ranking() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("shift_stats_2025-11-01.json"), r#"{"X":1,"Y":1,"Z":4}"#)
        .expect("write stats");
    let out = dir.path().join("data.json");
    let state = state_for(dir.path(), &out);

    state.refresh_data().expect("first run");
    let first = read_json(&out);
    state.refresh_data().expect("second run");
    let second = read_json(&out);
    assert_eq!(first["ranking"], second["ranking"]);
    assert_eq!(
        first["ranking"],
        serde_json::json!([
            {"name": "Z", "score": 4},
            {"name": "X", "score": 1},
            {"name": "Y", "score": 1}
        ])
    );
}

#[test]
fn empty_stats_dir_writes_no_data_document() {
    let dir = tempdir().expect("temp dir");
    let stats_dir = dir.path().join("empty");
    fs::create_dir_all(&stats_dir).expect("stats dir");
    let out = dir.path().join("data.json");

    let summary = state_for(&stats_dir, &out).refresh_data().expect("run");
    assert!(summary.no_data);

    let value = read_json(&out);
    assert_eq!(value["total_records"], 0);
    assert_eq!(value["no_data"], true);
    assert!(value["ranking"].as_array().expect("ranking").is_empty());
}

#[test]
fn unwritable_output_fails_without_partial_file() {
    let dir = tempdir().expect("temp dir");
    let out = dir.path().join("data.json");
    fs::create_dir_all(out.join("occupied")).expect("directory in the way");

    let result = state_for(dir.path(), &out).refresh_data();
    assert!(result.is_err());
    assert!(out.is_dir());
    let leftovers = fs::read_dir(dir.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}
