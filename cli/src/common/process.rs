//! # packrs Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs an external program to completion with a given working directory and
//! captures its exit status, stdout and stderr. The archiver uses this to
//! drive the system `tar` executable.
//!
//! Spawn failures (e.g. the program does not exist) are returned as errors. A
//! non-zero exit is *not* an error at this level: callers inspect
//! [`CommandOutput::success`] and decide.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use packrs::common::process::run_command_capture;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let output = run_command_capture(Path::new("/bin/tar"), &["--version"], Path::new("."))?;
//! if !output.success() {
//!     output.dump(|line| eprintln!("{line}"));
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Human-readable exit status ("2", or "terminated by signal").
    pub fn status_text(&self) -> String {
        match self.status_code {
            Some(code) => code.to_string(),
            None => "terminated by signal".to_string(),
        }
    }

    /// Passes every captured line to `write_line`, stdout first, each prefixed
    /// with its stream name.
    pub fn dump<F: FnMut(&str)>(&self, mut write_line: F) {
        write_line(&format!("exit status: {}", self.status_text()));
        for line in self.stdout.lines() {
            write_line(&format!("stdout: {}", line));
        }
        for line in self.stderr.lines() {
            write_line(&format!("stderr: {}", line));
        }
    }

    /// Stdout and stderr joined into one block, for error messages.
    pub fn combined(&self) -> String {
        let mut text = String::new();
        text.push_str(self.stdout.trim_end());
        if !self.stdout.trim().is_empty() && !self.stderr.trim().is_empty() {
            text.push('\n');
        }
        text.push_str(self.stderr.trim_end());
        text
    }
}

/// Runs `cmd_path` with `args` inside `working_dir` and waits for it to exit.
///
/// # Errors
///
/// Returns an `Err` if the process cannot be spawned or waited on.
pub fn run_command_capture<S: AsRef<OsStr>>(
    cmd_path: &Path,
    args: &[S],
    working_dir: &Path,
) -> Result<CommandOutput> {
    debug!(
        "Running {:?} with {} argument(s) in {:?}",
        cmd_path,
        args.len(),
        working_dir
    );
    let output = Command::new(cmd_path)
        .args(args)
        .current_dir(working_dir)
        .output() // Capture output, don't inherit stdio
        .with_context(|| format!("Failed to execute {:?}", cmd_path))?;

    let result = CommandOutput {
        status_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(
        "{:?} finished: status={}, stdout={} bytes, stderr={} bytes",
        cmd_path,
        result.status_text(),
        result.stdout.len(),
        result.stderr.len()
    );
    Ok(result)
}
