use std::fs;
use std::path::Path;

use assert_cmd::Command;
use drawodds_cli::config::ScenarioConfig;
use drawodds_cli::report::Report;
use drawodds_cli::runner::{Calculation, Outcome, Request};
use predicates::prelude::*;
use tempfile::tempdir;

fn write_scenario(dir: &Path) -> std::path::PathBuf {
    let yaml = format!(
        r#"
run_id: "smoke"
hand_size: 2
deck:
  - name: "Starter"
    copies: 2
    categories: ["starter"]
  - name: "Extender"
    copies: 1
    categories: ["extender"]
  - name: "Both"
    copies: 1
    categories: ["starter", "extender"]
categories:
  - {{ name: starter, min: 1, max: 1 }}
  - {{ name: extender, min: 1, max: 1 }}
combos:
  - name: "extender"
    bounds:
      - {{ name: extender, min: 1, max: 1 }}
  - name: "starter + extender"
    bounds:
      - {{ name: starter, min: 1, max: 1 }}
      - {{ name: extender, min: 1, max: 1 }}
outputs:
  report_json: "{report}"
logging:
  enable_structured: false
  tracing_level: "warn"
"#,
        report = dir.join("{run_id}.json").display()
    );
    let path = dir.join("scenario.yaml");
    fs::write(&path, yaml).expect("scenario written");
    path
}

#[test]
fn scenario_runs_through_library() {
    let dir = tempdir().expect("temp dir");
    let config = ScenarioConfig::from_path(write_scenario(dir.path())).expect("config loads");

    let request = Request::Range {
        deck: config.items(),
        bounds: config.bounds(),
        hand_size: config.hand_size,
    };
    let outcome = Calculation::spawn(request).unwrap().wait().unwrap();
    let Outcome::Probability(p) = outcome else {
        panic!("calculation was cancelled");
    };
    assert!((p - 5.0 / 6.0).abs() < 1e-12);

    let report = Report::new(&config, config.mode(), outcome, 0);
    let path = config.resolved_outputs().report_json.expect("report path");
    report.write_json(&path).expect("report written");
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["run_id"], "smoke");
    assert_eq!(written["deck_size"], 4);
}

#[test]
fn binary_prints_combo_probability() {
    let dir = tempdir().expect("temp dir");
    let scenario = write_scenario(dir.path());

    // "starter + extender" is a sub-event of "extender": 1 - C(2,2)/C(4,2)
    Command::cargo_bin("drawodds")
        .unwrap()
        .arg("--config")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("Probability: 83.33%"));

    assert!(dir.path().join("smoke.json").exists());
}

#[test]
fn binary_range_mode_emits_json() {
    let dir = tempdir().expect("temp dir");
    let scenario = write_scenario(dir.path());

    Command::cargo_bin("drawodds")
        .unwrap()
        .args(["--mode", "range", "--json", "--hand-size", "5", "--config"])
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"probability\": 0.0"));
}

#[test]
fn binary_rejects_invalid_scenario() {
    let dir = tempdir().expect("temp dir");
    let scenario = write_scenario(dir.path());
    let broken = fs::read_to_string(&scenario)
        .unwrap()
        .replace("copies: 2", "copies: 0");
    fs::write(&scenario, broken).unwrap();

    Command::cargo_bin("drawodds")
        .unwrap()
        .arg("--config")
        .arg(&scenario)
        .arg("--validate-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deck[0].copies"));
}

#[test]
fn binary_reports_structured_log_path() {
    let dir = tempdir().expect("temp dir");
    let scenario = write_scenario(dir.path());
    let log_dir = dir.path().join("logs");
    let structured = fs::read_to_string(&scenario).unwrap().replace(
        "  enable_structured: false\n",
        &format!(
            "  enable_structured: true\n  directory: \"{}\"\n",
            log_dir.display()
        ),
    );
    fs::write(&scenario, structured).unwrap();

    Command::cargo_bin("drawodds")
        .unwrap()
        .arg("--config")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("Structured log:"));

    assert!(log_dir.join("smoke.jsonl").exists());
}

