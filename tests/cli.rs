use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn tower_notify_bin() -> Result<Command> {
    let mut cmd = Command::cargo_bin("tower-notify")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_missing_required_flag_fails() -> Result<()> {
    let mut cmd = tower_notify_bin()?;
    cmd.arg("--notifications").arg("slack");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("--notification-slack-hook-url"));

    Ok(())
}

#[test]
fn test_missing_report_file_is_not_fatal() -> Result<()> {
    let mut cmd = tower_notify_bin()?;
    cmd.arg("--report").arg("/tmp/this/report/does/not/exist.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Failed to load report"));

    Ok(())
}

#[test]
fn test_malformed_report_is_not_fatal() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "this is not a report")?;

    let mut cmd = tower_notify_bin()?;
    cmd.arg("--report").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("failed to parse report"));

    Ok(())
}

#[test]
fn test_report_runs_one_cycle() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"{{"scanned": [{{"id": "sha256:01", "name": "web"}}], "updated": [{{"id": "sha256:01", "name": "web"}}]}}"#
    )?;

    let mut cmd = tower_notify_bin()?;
    cmd.arg("--notification-url")
        .arg("pushover://token@user")
        .arg("--report")
        .arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Using notifications: pushover"))
        .stdout(predicate::str::contains("pushover://***@user"))
        .stdout(predicate::str::contains("token@").not());

    Ok(())
}
