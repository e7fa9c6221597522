//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the firecalc-cli binary (finds it in target/debug when run via cargo test).
fn firecalc_cli() -> Command {
    cargo_bin_cmd!("firecalc-cli")
}

/// Path to firecalc library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("firecalc")
        .join("tests")
        .join("fixtures")
}

/// One NAC far too long for its load: 20 unknown appliances over 500 ft of 18 AWG.
const FAILING_PROJECT: &str = r#"{
    "panels": [{
        "name": "FACP-9",
        "is_main": true,
        "circuits": {
            "NAC1": { "type": "NAC", "devices": [
                {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"},
                {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"},
                {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"},
                {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"}, {"name": "A"}
            ]}
        }
    }],
    "wires": [{ "length_ft": 500, "gauge": "18", "circuit": "NAC1" }]
}"#;

#[test]
fn test_cli_help() {
    let mut cmd = firecalc_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fire-alarm"));
}

#[test]
fn test_cli_version() {
    let mut cmd = firecalc_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_evaluate_fixture() {
    let mut cmd = firecalc_cli();

    cmd.arg("evaluate").arg(fixtures_dir().join("project.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("FACP-1"))
        .stdout(predicate::str::contains("NAC2"))
        .stdout(predicate::str::contains("WARN"))
        .stdout(predicate::str::contains("3/4 EMT — 10x18AWG + 4x14AWG — "))
        .stdout(predicate::str::contains("Booster-2").not());
}

#[test]
fn test_cli_evaluate_json_output() {
    let mut cmd = firecalc_cli();

    cmd.arg("evaluate")
        .arg(fixtures_dir().join("project.json"))
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["circuit_id"], "SLC1");
    assert_eq!(rows[2]["status"], "WARN");
    assert_eq!(report["stats"]["warn"], 1);
    assert!(report["id"].is_string());
}

#[test]
fn test_cli_evaluate_uses_specs_beside_project() {
    let mut cmd = firecalc_cli();

    cmd.arg("evaluate")
        .arg(fixtures_dir().join("project.json"))
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let nac1_current = report["rows"][1]["current_a"].as_f64().unwrap();
    assert!((nac1_current - 0.533).abs() < 1e-9, "NAC1: {}", nac1_current);
}

#[test]
fn test_cli_evaluate_fail_on() {
    let path = fixtures_dir().join("project.json");

    let mut cmd = firecalc_cli();
    cmd.arg("evaluate").arg(&path).arg("--fail-on").arg("warn");
    cmd.assert().code(1);

    let mut cmd = firecalc_cli();
    cmd.arg("evaluate").arg(&path).arg("--fail-on").arg("fail");
    cmd.assert().code(0);
}

#[test]
fn test_cli_evaluate_failing_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tower.json");
    std::fs::write(&path, FAILING_PROJECT).unwrap();

    let mut cmd = firecalc_cli();
    cmd.arg("evaluate").arg(&path).arg("--fail-on").arg("fail");

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_cli_evaluate_hide_fill() {
    let mut cmd = firecalc_cli();

    cmd.arg("evaluate")
        .arg(fixtures_dir().join("project.json"))
        .arg("--hide-fill");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("10x18AWG + 4x14AWG"))
        .stdout(predicate::str::contains("% fill").not());
}

#[test]
fn test_cli_evaluate_duty_cycle_flags() {
    let run = |extra: &[&str]| {
        let mut cmd = firecalc_cli();
        cmd.arg("evaluate")
            .arg(fixtures_dir().join("project.json"))
            .arg("--format")
            .arg("json")
            .args(extra);
        let output = cmd.output().unwrap();
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        report["rows"][0]["battery_ah"].as_f64().unwrap()
    };

    let standard = run(&[]);
    let extended = run(&["--standby-hours", "60", "--alarm-minutes", "15"]);
    assert!(extended > standard);
}

#[test]
fn test_cli_evaluate_unsupported_conduit() {
    let mut cmd = firecalc_cli();

    cmd.arg("evaluate")
        .arg(fixtures_dir().join("unsupported_conduit.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported conduit RMC 2"));
}

#[test]
fn test_cli_evaluate_nonexistent_file() {
    let mut cmd = firecalc_cli();

    cmd.arg("evaluate").arg("does_not_exist.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_fill_compliant() {
    let mut cmd = firecalc_cli();

    cmd.args(["fill", "--kind", "emt", "--size", "3/4", "--wire", "18:10", "--wire", "12:2"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3/4 EMT — 10x18AWG + 2x12AWG — "))
        .stdout(predicate::str::contains("[OK]"));
}

#[test]
fn test_cli_fill_overfilled() {
    let mut cmd = firecalc_cli();

    cmd.args(["fill", "--size", "1/2", "--wire", "10:50"]);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("OVERFILLED"));
}

#[test]
fn test_cli_fill_unsupported_gauge() {
    let mut cmd = firecalc_cli();

    cmd.args(["fill", "--size", "3/4", "--wire", "4:3"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("4 AWG"));
}

#[test]
fn test_cli_fill_rejects_bad_wire_argument() {
    let mut cmd = firecalc_cli();

    cmd.args(["fill", "--size", "3/4", "--wire", "eighteen"]);

    cmd.assert().failure();
}

#[test]
fn test_cli_device_keyword() {
    let mut cmd = firecalc_cli();

    cmd.args(["device", "--name", "Wall Horn Strobe"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1150"))
        .stdout(predicate::str::contains("Keyword"));
}

#[test]
fn test_cli_device_catalog() {
    let mut cmd = firecalc_cli();

    cmd.args(["device", "--part", "p2r", "--format", "json", "--specs"])
        .arg(fixtures_dir().join("device_specs.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"catalog\""))
        .stdout(predicate::str::contains("0.139"));
}

#[test]
fn test_cli_device_requires_description() {
    let mut cmd = firecalc_cli();

    cmd.arg("device");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("--name"));
}
