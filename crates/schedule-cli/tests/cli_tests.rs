//! Integration tests for the `schedule` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the next, prev,
//! and explain subcommands through the actual binary, including JSON output
//! and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn schedule() -> Command {
    Command::cargo_bin("schedule").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// next
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn next_prints_first_fire_time() {
    schedule()
        .args(["next", "*.9.*/2 1-5 10:00:00", "--from", "2025-09-06T00:00:00"])
        .assert()
        .success()
        .stdout("2025-09-09T10:00:00.000\n");
}

#[test]
fn next_with_count_prints_one_line_each() {
    schedule()
        .args([
            "next",
            "*.9.*/2 1-5 10:00:00",
            "--from",
            "2025-09-06T00:00:00",
            "-n",
            "3",
        ])
        .assert()
        .success()
        .stdout("2025-09-09T10:00:00.000\n2025-09-11T10:00:00.000\n2025-09-15T10:00:00.000\n");
}

#[test]
fn next_is_exclusive_by_default() {
    schedule()
        .args(["next", "*.*.* 12:00:00", "--from", "2025-01-01T12:00:00"])
        .assert()
        .success()
        .stdout("2025-01-02T12:00:00.000\n");
}

#[test]
fn next_inclusive_returns_start_when_it_matches() {
    schedule()
        .args([
            "next",
            "*.*.* 12:00:00",
            "--from",
            "2025-01-01T12:00:00",
            "--inclusive",
        ])
        .assert()
        .success()
        .stdout("2025-01-01T12:00:00.000\n");
}

#[test]
fn next_accepts_fractional_from() {
    schedule()
        .args(["next", "*:*:*.*", "--from", "2025-01-01T00:00:00.250"])
        .assert()
        .success()
        .stdout("2025-01-01T00:00:00.251\n");
}

#[test]
fn next_json_outputs_array() {
    let output = schedule()
        .args([
            "next",
            "*.*.32 12:00:00",
            "--from",
            "2025-01-15T00:00:00",
            "-n",
            "2",
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!(["2025-01-31T12:00:00.000", "2025-02-28T12:00:00.000"])
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// prev
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn prev_walks_backward() {
    schedule()
        .args([
            "prev",
            "*.*.* 12:00:00",
            "--from",
            "2025-01-01T12:00:00",
            "-n",
            "2",
        ])
        .assert()
        .success()
        .stdout("2024-12-31T12:00:00.000\n2024-12-30T12:00:00.000\n");
}

#[test]
fn prev_finds_previous_leap_day() {
    schedule()
        .args(["prev", "*.2.29 12:00:00", "--from", "2025-03-01T00:00:00"])
        .assert()
        .success()
        .stdout("2024-02-29T12:00:00.000\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// explain
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn explain_prints_parsed_rules() {
    let output = schedule()
        .args(["explain", "2025.9.1-7 10:00:00"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["years"], serde_json::json!([{ "begin": 2025 }]));
    assert_eq!(parsed["months"], serde_json::json!([{ "begin": 9 }]));
    assert_eq!(parsed["days"], serde_json::json!([{ "begin": 1, "end": 7 }]));
    assert_eq!(parsed["hours"], serde_json::json!([{ "begin": 10 }]));
    assert_eq!(parsed["milliseconds"], serde_json::json!([{ "begin": 0 }]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_expression_fails() {
    schedule()
        .args(["next", "*.13.* 10:00:00", "--from", "2025-01-01T00:00:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse schedule"));
}

#[test]
fn invalid_from_fails() {
    schedule()
        .args(["next", "*:*:*", "--from", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --from timestamp"));
}

#[test]
fn impossible_date_reports_range_error() {
    schedule()
        .args(["next", "*.2.30 00:00:00", "--from", "2025-01-01T00:00:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to compute fire times"));
}

#[test]
fn explain_rejects_bad_input() {
    schedule()
        .args(["explain", "10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse schedule"));
}

#[test]
fn missing_subcommand_shows_usage() {
    schedule()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
