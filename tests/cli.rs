//! Binary smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

fn handle_forge() -> Command {
    let mut cmd = Command::cargo_bin("handle-forge").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("HANDLE_FORGE_MODE")
        .env_remove("HANDLE_FORGE_LOG_DIR")
        .env_remove("NAMECHK_TOKEN");
    cmd
}

#[test]
fn test_help() {
    handle_forge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"))
        .stdout(predicate::str::contains("github"));
}

#[test]
fn test_missing_site() {
    handle_forge()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Must specify a site"));
}

#[test]
fn test_invalid_lengths_fail_without_log() {
    let dir = tempfile::tempdir().unwrap();
    handle_forge()
        .current_dir(dir.path())
        .args(["nowhere", "--min", "4", "--max", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(!dir.path().join("nowhere.log").exists());
}

#[test]
fn test_bulk_without_token_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    handle_forge()
        .current_dir(dir.path())
        .args(["github", "--bulk", "--length", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("NAMECHK_TOKEN"));
}

#[test]
fn test_unknown_site_run_creates_empty_log() {
    let dir = tempfile::tempdir().unwrap();
    handle_forge()
        .args(["nowhere", "--alphabet", "ab", "--length", "2", "--log-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total checked: 4"))
        .stdout(predicate::str::contains("No available usernames found"));

    let log = std::fs::read_to_string(dir.path().join("nowhere.log")).unwrap();
    assert!(log.is_empty());
}
