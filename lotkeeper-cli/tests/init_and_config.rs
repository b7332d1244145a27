//! Integration tests for `init`, `validate` and configuration layering.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_init_creates_database() {
    let env = TestEnv::new();
    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created data directory"))
        .stdout(predicate::str::contains("Created database"));
    assert!(env.data_dir.join("lotkeeper.db").exists());

    // A second init refuses to clobber the inventory.
    env.command()
        .arg("init")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--overwrite"));
}

#[test]
fn test_init_overwrite_clears_inventory() {
    let env = TestEnv::with_standard_lot();
    env.command()
        .args(["init", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recreated database"));

    let slots = env.json(&["slot", "list"]);
    assert!(slots.as_array().unwrap().is_empty());
}

#[test]
fn test_init_dry_run_changes_nothing() {
    let env = TestEnv::new();
    env.command()
        .args(["init", "--dry-run", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode"))
        .stdout(predicate::str::contains("Create configuration file"));
    assert!(!env.data_dir.exists());
}

#[test]
fn test_init_with_config_writes_valid_file() {
    let env = TestEnv::new();
    env.command()
        .args(["init", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));

    env.command()
        .arg("validate")
        .arg(env.data_dir.join("config.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_validate_reports_bad_thresholds() {
    let env = TestEnv::new();
    let path = env.write_site_file(
        "lotkeeper.yaml",
        "overstay:\n  day_pass:\n    car: { warning: 30, alert: 24, critical: 36 }\n",
    );

    env.command()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("overstay.day_pass.car"));
}

#[test]
fn test_validate_missing_file() {
    let env = TestEnv::new();
    env.command()
        .args(["validate", "nowhere.yaml"])
        .assert()
        .code(4);
}

#[test]
fn test_site_rates_drive_billing() {
    let env = TestEnv::with_standard_lot();
    env.write_site_file("lotkeeper.yaml", "rates:\n  day_pass: 220\n");
    env.command()
        .args(["enter", "SITE1", "--billing", "day_pass"])
        .assert()
        .success();

    let receipt = env.json(&["exit", "SITE1"]);
    assert_eq!(receipt[0]["billing_amount"], 220);
}

#[test]
fn test_local_file_overrides_site_file() {
    let env = TestEnv::new();
    env.write_site_file("lotkeeper.yaml", "rates:\n  day_pass: 220\n");
    env.write_site_file("lotkeeper.local.yaml", "rates:\n  day_pass: 90\n");

    env.command()
        .args([
            "estimate",
            "--entry-time",
            "2020-01-01T00:00:00Z",
            "--billing",
            "day_pass",
        ])
        .assert()
        .success()
        .stdout(predicate::str::ends_with(": 90\n"));
}

#[test]
fn test_configured_output_format() {
    let env = TestEnv::new();
    env.add_slot("R-01", "regular");
    env.write_site_file("lotkeeper.yaml", "output_format: tsv\n");

    env.command()
        .args(["slot", "list"])
        .assert()
        .success()
        .stdout("slot\tcategory\tstatus\nR-01\tregular\tavailable\n");
}

#[test]
fn test_data_dir_from_environment() {
    let env = TestEnv::new();
    env.command_bare()
        .env("LOTKEEPER_DATA_DIR", &env.data_dir)
        .args(["slot", "add", "R-01"])
        .assert()
        .success();

    let slots = env.json(&["slot", "list"]);
    assert_eq!(slots[0]["number"], "R-01");
}
