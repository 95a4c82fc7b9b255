//! # packrs CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and uses [`packrs_cmd`] to run the compiled binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get packrs Command (`packrs_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `packrs` binary, running
/// in `workdir` with the user configuration directory pointed at `workdir` so
/// a developer's own `~/.config/packrs/config.toml` cannot leak into tests.
///
/// ## Panics
/// Panics if the `packrs` binary cannot be found via `Command::cargo_bin`.
pub fn packrs_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("packrs").expect("Failed to find packrs binary for testing");
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir)
        .env("HOME", workdir)
        .env_remove("RUST_LOG");
    cmd
}

/// Whether the system tar used by default is present.
pub fn tar_available() -> bool {
    Path::new("/bin/tar").is_file()
}
