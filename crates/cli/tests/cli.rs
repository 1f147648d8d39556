// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests
//!
//! Drive the `gk` binary end to end: argument parsing, config loading,
//! report output, and exit codes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FAST_CONFIG: &str = r#"
gate_count = 4

[admission_delay]
min = "1ms"
max = "2ms"

[monitor_interval]
min = "1ms"
max = "3ms"
"#;

fn gk() -> Command {
    Command::cargo_bin("gk").unwrap()
}

fn fast_config(temp: &TempDir) -> String {
    let path = temp.path().join("gk.toml");
    fs::write(&path, FAST_CONFIG).expect("Failed to write config");
    path.display().to_string()
}

#[test]
fn test_gk_help() {
    gk().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gates"));
}

#[test]
fn test_gk_version() {
    gk().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gk"));
}

#[test]
fn test_plan_reports_remainder() {
    gk().args(["plan", "--entities", "7", "--gates", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gates: 3 (block size 2)"))
        .stdout(predicate::str::contains("gate-0: entity-1, entity-2"))
        .stdout(predicate::str::contains("Dropped: 1"))
        .stdout(predicate::str::contains("entity-7"));
}

#[test]
fn test_plan_json_output() {
    let output = gk()
        .args(["plan", "-n", "10", "-g", "5", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["gate_count"], 5);
    assert_eq!(plan["block_size"], 2);
    assert_eq!(plan["gates"].as_array().unwrap().len(), 5);
    assert!(plan["dropped"].as_array().unwrap().is_empty());
}

#[test]
fn test_plan_reads_names_file() {
    let temp = TempDir::new().unwrap();
    let names = temp.path().join("names.txt");
    fs::write(&names, "alice\nbob\n\ncarol\n").unwrap();

    gk().args(["plan", "--gates", "2", "--names"])
        .arg(&names)
        .assert()
        .success()
        .stdout(predicate::str::contains("gate-0: alice"))
        .stdout(predicate::str::contains("gate-1: bob"))
        .stdout(predicate::str::contains("- carol"));
}

#[test]
fn test_duplicate_names_are_rejected() {
    let temp = TempDir::new().unwrap();
    let names = temp.path().join("names.txt");
    fs::write(&names, "alice\nalice\n").unwrap();

    gk().args(["plan", "--gates", "1", "--names"])
        .arg(&names)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate entity id"));
}

#[test]
fn test_run_admits_everything() {
    let temp = TempDir::new().unwrap();
    let config = fast_config(&temp);

    gk().args(["run", "--entities", "20", "--config", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("Admitted: 20"))
        .stdout(predicate::str::contains("Final occupancy: 0"))
        .stdout(predicate::str::contains("Status: clean"));
}

#[test]
fn test_run_json_report() {
    let temp = TempDir::new().unwrap();
    let config = fast_config(&temp);

    let output = gk()
        .args([
            "run", "-n", "9", "-g", "2", "--config", &config, "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["gate_count"], 2);
    assert_eq!(report["admitted"].as_array().unwrap().len(), 8);
    assert_eq!(report["dropped"][0], "entity-9");
    assert_eq!(report["final_occupancy"], 0);
}

#[test]
fn test_run_with_uuid_ids() {
    let temp = TempDir::new().unwrap();
    let config = fast_config(&temp);

    let output = gk()
        .args([
            "run", "-n", "4", "--id-style", "uuid", "--config", &config, "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = report["admitted"][0]["id"].as_str().unwrap();
    assert_eq!(first.len(), 36);
}

#[test]
fn test_zero_gates_fails() {
    gk().args(["run", "--gates", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gate"));
}

#[test]
fn test_bad_config_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "gate_count = 2\nturbo = true\n").unwrap();

    gk().args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.toml"));
}

#[test]
fn test_entities_and_names_conflict() {
    gk().args(["plan", "--entities", "3", "--names", "x.txt"])
        .assert()
        .failure();
}
