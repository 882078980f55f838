//! Integration tests for the Lockbox CLI binary.
//!
//! These exercise the binary end-to-end using `assert_cmd`. Commands
//! that would unwrap the master key touch the OS keyring, which is not
//! available in CI, so we focus on the surfaces that stop before the
//! custodian: argument parsing, listing, and not-found paths.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the lockbox binary.
fn lockbox() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lockbox").expect("binary should exist")
}

#[test]
fn help_flag_shows_usage() {
    lockbox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Local secret store bound to your OS user account",
        ))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_shows_version() {
    lockbox()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lockbox"));
}

#[test]
fn no_args_shows_help() {
    lockbox()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn list_on_fresh_data_dir_is_empty() {
    let tmp = TempDir::new().unwrap();

    lockbox()
        .args(["list", "--data-dir", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 secret(s)"));
}

#[test]
fn get_missing_id_reports_not_found() {
    let tmp = TempDir::new().unwrap();

    lockbox()
        .args(["get", "42", "--data-dir", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No secret with id 42"));
}

#[test]
fn get_rejects_non_numeric_id() {
    lockbox().args(["get", "wifi"]).assert().failure();
}

#[test]
fn delete_missing_id_reports_not_found() {
    let tmp = TempDir::new().unwrap();

    lockbox()
        .args([
            "delete",
            "42",
            "--force",
            "--data-dir",
            tmp.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No secret with id 42"));
}

#[test]
fn add_rejects_empty_label() {
    let tmp = TempDir::new().unwrap();

    lockbox()
        .args([
            "add",
            "",
            "value",
            "--data-dir",
            tmp.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("label cannot be empty"));
}

#[test]
fn completions_bash_prints_script() {
    lockbox()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lockbox"));
}

#[test]
fn completions_unknown_shell_fails() {
    lockbox()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shell"));
}
