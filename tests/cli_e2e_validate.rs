//! End-to-end tests for the `validate` command.
//!
//! These tests invoke the actual CLI binary and validate the behavior of the
//! `validate` subcommand from a user's perspective.

mod common;
use common::prelude::*;

#[test]
fn test_validate_valid_config() {
    let fixture = BundleFixture::new();

    fixture
        .command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file parsed successfully"))
        .stdout(predicate::str::contains("Minecraft version: 1.17.1"))
        .stdout(predicate::str::contains("Library dependencies: 4"))
        .stdout(predicate::str::contains(
            "remapper: net.fabricmc:tiny-remapper:0.4.3:fat",
        ));
}

#[test]
fn test_validate_explicit_config_path() {
    let fixture = BundleFixture::new();
    let elsewhere = assert_fs::TempDir::new().unwrap();

    cargo_bin_cmd!("dev-bundle")
        .current_dir(elsewhere.path())
        .env("NO_COLOR", "1")
        .arg("validate")
        .arg("--config")
        .arg(fixture.config_path())
        .assert()
        .success();
}

#[test]
fn test_validate_invalid_yaml() {
    let fixture = BundleFixture::new().with_raw_config(configs::INVALID_YAML);

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ERR] Configuration parsing failed"))
        .stderr(predicate::str::contains("Configuration parsing error"));
}

#[test]
fn test_validate_missing_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    cargo_bin_cmd!("dev-bundle")
        .current_dir(temp.path())
        .env_remove("DEV_BUNDLE_CONFIG")
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("-c/--config"));
}

#[test]
fn test_validate_rejects_empty_relocation() {
    let fixture =
        BundleFixture::new().with_config_extra("relocations:\n  - from: ''\n    to: org.example\n");

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty package"));
}

#[test]
fn test_validate_rejects_bad_include_glob() {
    let fixture = BundleFixture::new().with_raw_config(&format!(
        "{}\nvanilla-jar-includes: ['net/[minecraft']\n",
        configs::BASE.replace("vanilla-jar-includes: [\"/*.class\", \"/net/minecraft/**\"]\n", "")
    ));

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Glob pattern error"));
}

#[test]
fn test_validate_check_inputs() {
    let fixture = BundleFixture::new().with_config_extra("mappings-patch-file: work/absent.tiny\n");

    fixture
        .command()
        .args(["validate", "--check-inputs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[WARN] 'mappings-patch-file'"))
        .stdout(predicate::str::contains("All required inputs exist"));
}

#[test]
fn test_validate_check_inputs_missing_baseline() {
    let fixture = BundleFixture::new();
    std::fs::remove_dir_all(fixture.path().join("work/decompiled")).unwrap();

    fixture
        .command()
        .args(["validate", "--check-inputs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'baseline'"));
}
