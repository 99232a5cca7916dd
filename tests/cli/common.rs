//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("vargloss")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A validator and annotator for structured vars files",
        ));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("vargloss")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("vargloss")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("vargloss")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_check_help() {
    cargo_bin_cmd!("vargloss")
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SCHEMA DISCOVERY"));
}

#[test]
fn test_check_requires_files() {
    cargo_bin_cmd!("vargloss")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_resolve_help() {
    cargo_bin_cmd!("vargloss")
        .args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing field anchors"));
}
