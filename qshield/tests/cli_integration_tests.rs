// qshield/tests/cli_integration_tests.rs
//! Command-line integration tests for the `qshield` binary.
//!
//! Each test points `XDG_CONFIG_HOME` at an empty temporary directory and
//! clears `QSHIELD_CONFIG` so that only the configuration a test writes is
//! ever loaded.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn qshield(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("qshield"));
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.env_remove("QSHIELD_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_redact_stdin_with_default_patterns() -> Result<()> {
    let home = TempDir::new()?;
    qshield(&home)
        .args(["redact", "--conversation-id", "c-1"])
        .write_stdin("Deploy foo to bar with password\n")
        .assert()
        .success()
        .stdout("Deploy deployment to openshift with [REDACTED]\n");
    Ok(())
}

#[test]
fn test_redact_with_attachments() -> Result<()> {
    let home = TempDir::new()?;
    let dir = TempDir::new()?;
    let log = dir.path().join("app.log");
    fs::write(&log, "secret=xyz\n")?;
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "non-sensitive")?;

    qshield(&home)
        .arg("redact")
        .arg("--attachment")
        .arg(&log)
        .arg("--attachment")
        .arg(&notes)
        .write_stdin("check the token")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("check the [REDACTED]\n"))
        .stdout(predicate::str::contains("(log, text/plain) ---\n[REDACTED]=xyz\n"))
        .stdout(predicate::str::contains("---\nnon-sensitive\n"));
    Ok(())
}

#[test]
fn test_config_file_overrides_defaults() -> Result<()> {
    let home = TempDir::new()?;
    let dir = TempDir::new()?;
    let config = dir.path().join("config.yaml");
    fs::write(
        &config,
        r#"
shields:
  redaction_patterns:
    - pattern: '\bnode-\d+\b'
      replacement: "[NODE]"
"#,
    )?;
    let query = dir.path().join("query.txt");
    fs::write(&query, "drain node-12 and reset password")?;

    qshield(&home)
        .arg("--config")
        .arg(&config)
        .arg("redact")
        .arg("--input")
        .arg(&query)
        .assert()
        .success()
        .stdout("drain [NODE] and reset password\n");
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_default_config_location_is_used() -> Result<()> {
    let home = TempDir::new()?;
    fs::create_dir_all(home.path().join("qshield"))?;
    fs::write(
        home.path().join("qshield").join("config.yaml"),
        "redaction_patterns:\n  - pattern: 'alpha'\n    replacement: 'omega'\n",
    )?;

    qshield(&home)
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pattern\": \"alpha\""))
        .stdout(predicate::str::contains("\"replacement\": \"omega\""));
    Ok(())
}

#[test]
fn test_broken_config_falls_back_to_defaults() -> Result<()> {
    let home = TempDir::new()?;
    let dir = TempDir::new()?;
    let config = dir.path().join("config.yaml");
    fs::write(&config, "redaction_patterns: 42\n")?;

    qshield(&home)
        .args(["-q", "redact", "--config"])
        .arg(&config)
        .write_stdin("foo")
        .assert()
        .success()
        .stdout("deployment\n");
    Ok(())
}

#[test]
fn test_patterns_lists_defaults() -> Result<()> {
    let home = TempDir::new()?;
    qshield(&home)
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""pattern": "\\bapi[_-]?key\\b""#))
        .stdout(predicate::str::contains("openshift"));
    Ok(())
}

#[test]
fn test_missing_query_file_fails() -> Result<()> {
    let home = TempDir::new()?;
    qshield(&home)
        .args(["redact", "--input-file", "/no/such/query.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read query file"));
    Ok(())
}
