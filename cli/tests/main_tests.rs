//! # packrs CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Verifies top-level behavior of the `packrs` binary: `--help`, `--version`
//! and argument errors.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_lists_commands() {
    let dir = tempdir().unwrap();
    packrs_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("tar-contents"));
}

#[test]
fn test_version_flag() {
    let dir = tempdir().unwrap();
    packrs_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_fails() {
    let dir = tempdir().unwrap();
    packrs_cmd(dir.path()).assert().failure();
}
