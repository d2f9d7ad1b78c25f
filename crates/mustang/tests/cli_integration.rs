//! Integration tests for the `mustang-cli` binary.
//!
//! Commands that need an attached amp are only exercised up to the point
//! where they fail on their own input, or via `--help`.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("mustang-cli")
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mustang-cli"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_no_subcommand_fails() {
    cli().assert().failure();
}

// ── config ──

#[test]
fn cli_config_json_produces_valid_json() {
    let output = cli()
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(
        json["settings"].is_object(),
        "JSON output should contain 'settings' object"
    );
    assert!(
        json["config_file"].is_string() || json["config_file"].is_null(),
        "config_file should be string or null"
    );
    assert!(json["problems"].is_array());
}

#[test]
fn cli_config_custom_path_missing_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let output = cli()
        .arg("--config")
        .arg(&path)
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["config_file_exists"], false);
    assert_eq!(json["settings"]["timeout_ms"], 500);
    assert_eq!(json["settings"]["device"], "");
}

#[test]
fn cli_config_reports_problems() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "device = \"zz\"\ntimeout_ms = 5\n").unwrap();

    let output = cli()
        .arg("--config")
        .arg(&path)
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["problems"].as_array().unwrap().len(), 2);
}

#[test]
fn cli_config_human_output_shows_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "device = \"0004\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("(loaded)"))
        .stdout(predicate::str::contains("Mustang I/II"));
}

#[test]
fn cli_config_init_writes_defaults_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    cli()
        .arg("--config")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# Mustang configuration"));
    assert!(written.contains("timeout_ms = 500"));

    cli()
        .arg("--config")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ── --verbose flag ──

#[test]
fn cli_verbose_flag_accepted() {
    cli().args(["-v", "config"]).assert().success();
}

#[test]
fn cli_verbose_long_flag_accepted() {
    cli().args(["--verbose", "config"]).assert().success();
}

// ── Subcommand integration tests ──

#[test]
fn cli_devices_succeeds() {
    cli().arg("devices").assert().success();
}

#[test]
fn cli_devices_json_is_valid() {
    let output = cli()
        .args(["--json", "devices"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(json["devices"].is_array());
    assert!(json["count"].is_u64());
}

#[test]
fn cli_set_amp_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .arg("set-amp")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn cli_set_amp_bad_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amp.json");
    std::fs::write(&path, r#"{ "amp_num": "not_an_amp" }"#).unwrap();

    cli()
        .arg("set-amp")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn cli_set_effect_rejects_slot_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fx.json");
    std::fs::write(&path, r#"{ "fx_slot": 4, "effect_num": "phaser" }"#).unwrap();

    cli()
        .arg("set-effect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fx_slot 4 is out of range"));
}

#[test]
fn cli_save_effects_bad_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("effects.json");
    std::fs::write(&path, r#"{ "fx_slot": 2 }"#).unwrap();

    cli()
        .args(["save-effects", "3", "Echoes"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn cli_load_rejects_non_numeric_slot() {
    cli().args(["load", "first"]).assert().failure();
}

#[test]
fn cli_presets_help_succeeds() {
    cli()
        .args(["presets", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("presets"));
}

#[test]
fn cli_current_help_succeeds() {
    cli()
        .args(["current", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active preset"));
}

#[test]
fn cli_load_help_succeeds() {
    cli()
        .args(["load", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SLOT"));
}

#[test]
fn cli_save_help_succeeds() {
    cli()
        .args(["save", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"));
}

#[test]
fn cli_save_effects_help_succeeds() {
    cli()
        .args(["save-effects", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"));
}
