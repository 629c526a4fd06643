//! Integration tests for the gh-notify CLI
//!
//! These run the actual binary. Only paths that fail before any network
//! access are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get the binary to test
fn gh_notify_cmd() -> Command {
    Command::cargo_bin("gh-notify").unwrap()
}

#[test]
fn test_help_flag() {
    gh_notify_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub notifications"))
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("--mark-read"));
}

#[test]
fn test_version_flag() {
    gh_notify_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_mark_read_with_exclude_fails() {
    gh_notify_cmd()
        .args(["-r", "-e", "bug"])
        .env("GH_TOKEN", "unused")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ERROR:"))
        .stderr(predicate::str::contains(
            "Can't mark all notifications as read when either the '-e' or '-f' flag was used",
        ));
}

#[test]
fn test_mark_read_with_filter_fails() {
    gh_notify_cmd()
        .args(["-r", "-f", "release"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("filtered out"));
}

#[test]
fn test_error_is_a_single_line() {
    let output = gh_notify_cmd().args(["-r", "-e", "x"]).output().unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.trim_end().lines().count(), 1);
}

#[test]
fn test_invalid_num_is_rejected() {
    gh_notify_cmd()
        .args(["-n", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("many"));
}
