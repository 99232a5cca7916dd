//! Check subcommand tests
//!
//! External collaborators are stubbed with small `sh -c` scripts wired up
//! through a `.vargloss.toml` next to the document. The appended schema and
//! document arguments land in `$0`/`$1` of the script.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SWITCH_VARS: &str = "\
hostname: sw1
devices:
  - name: eth0
    vlan: 10
  - name: eth1
";

fn write_vars(dir: &TempDir) -> std::path::PathBuf {
    let vars = dir.path().join("vars.yml");
    fs::write(&vars, SWITCH_VARS).unwrap();
    fs::write(dir.path().join("schema.yml"), "hostname: str()\n").unwrap();
    vars
}

#[test]
fn test_check_clean_file() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
linters = []

[validator]
cmd = "sh"
args = ["-c", "echo schema validation passed"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args(["check", vars.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("schema validation passed"))
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_schema_errors_annotate_resolved_lines() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
linters = []

[validator]
cmd = "sh"
args = ["-c", "echo header; echo '  devices.1.vlan: Required field missing'; echo '  hostname: Required field missing'; exit 1"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args(["check", vars.to_str().unwrap()])
        .assert()
        .failure()
        // The missing field anchors to its parent list item, line 5
        .stdout(predicate::str::contains("devices.1.vlan: Required field missing"))
        .stdout(predicate::str::contains("vars.yml:5"))
        // Single-segment paths address the document and anchor to line 1
        .stdout(predicate::str::contains("vars.yml:1"))
        .stdout(predicate::str::contains("Found 2 issue(s)"));
}

#[test]
fn test_check_style_findings_are_prefixed() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
[[linters]]
name = "stylecheck"
cmd = "sh"
args = ["-c", "echo '4:3: [warning] wrong indentation'; exit 1"]
format = "line-col"

[validator]
cmd = "sh"
args = ["-c", "echo ok"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args(["check", vars.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[stylecheck]: wrong indentation"))
        .stdout(predicate::str::contains("vars.yml:4"))
        .stdout(predicate::str::contains("Found 1 issue(s)"));
}

#[test]
fn test_check_no_style_skips_linters() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
[[linters]]
name = "stylecheck"
cmd = "sh"
args = ["-c", "echo '4:3: [warning] wrong indentation'; exit 1"]
format = "line-col"

[validator]
cmd = "sh"
args = ["-c", "echo ok"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args(["check", "--no-style", vars.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_without_schema_warns_but_passes() {
    let temp_dir = TempDir::new().unwrap();
    let vars = temp_dir.path().join("vars.yml");
    fs::write(&vars, SWITCH_VARS).unwrap();
    // No schema.yml sibling, no schema key in config
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
linters = []

[validator]
cmd = "sh"
args = ["-c", "echo ok"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args(["check", vars.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("no schema found"))
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_explicit_schema_flag() {
    let temp_dir = TempDir::new().unwrap();
    let vars = temp_dir.path().join("vars.yml");
    fs::write(&vars, SWITCH_VARS).unwrap();
    let schema = temp_dir.path().join("net-schema.yml");
    fs::write(&schema, "hostname: str()\n").unwrap();
    // The stub validator passes only when the schema argument is a real file
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
linters = []

[validator]
cmd = "sh"
args = ["-c", "if [ -f $0 ]; then echo ok; else echo no-schema-arg; exit 2; fi"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args([
            "check",
            "--schema",
            schema.to_str().unwrap(),
            vars.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn test_check_multiple_files_aggregate() {
    let temp_dir = TempDir::new().unwrap();
    let file1 = temp_dir.path().join("sw1.yml");
    let file2 = temp_dir.path().join("sw2.yml");
    fs::write(&file1, SWITCH_VARS).unwrap();
    fs::write(&file2, SWITCH_VARS).unwrap();
    fs::write(temp_dir.path().join("schema.yml"), "hostname: str()\n").unwrap();
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
linters = []

[validator]
cmd = "sh"
args = ["-c", "echo header; echo '  hostname: Required field missing'; exit 1"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args([
            "check",
            file1.to_str().unwrap(),
            file2.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("sw1.yml:1"))
        .stdout(predicate::str::contains("sw2.yml:1"))
        .stdout(predicate::str::contains("Found 2 issue(s)"));
}

#[test]
fn test_check_with_explicit_config() {
    let config_dir = TempDir::new().unwrap();
    let doc_dir = TempDir::new().unwrap();
    let vars = doc_dir.path().join("vars.yml");
    fs::write(&vars, SWITCH_VARS).unwrap();
    fs::write(doc_dir.path().join("schema.yml"), "hostname: str()\n").unwrap();

    let config_file = config_dir.path().join("custom.toml");
    fs::write(
        &config_file,
        r#"
linters = []

[validator]
cmd = "sh"
args = ["-c", "echo ok"]
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args([
            "check",
            "--config",
            config_file.to_str().unwrap(),
            vars.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_unreadable_file() {
    cargo_bin_cmd!("vargloss")
        .args(["check", "/definitely/not/a/real/vars.yml"])
        .assert()
        .failure();
}

#[test]
fn test_check_with_real_yamllint() {
    // Skip if yamllint not available
    if which::which("yamllint").is_err() {
        println!("Skipping yamllint test - yamllint not installed");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let vars = temp_dir.path().join("vars.yml");
    // Trailing spaces on line 2 are an error under yamllint's defaults
    fs::write(&vars, "hostname: sw1\nrole: spine   \n").unwrap();
    fs::write(temp_dir.path().join("schema.yml"), "hostname: str()\n").unwrap();
    fs::write(
        temp_dir.path().join(".vargloss.toml"),
        r#"
[validator]
cmd = "sh"
args = ["-c", "echo ok"]

[[linters]]
name = "yamllint"
cmd = "yamllint"
args = ["-f", "parsable"]
format = "line-col"
"#,
    )
    .unwrap();

    cargo_bin_cmd!("vargloss")
        .args(["check", vars.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[yamllint]"))
        .stdout(predicate::str::contains("trailing spaces"));
}
