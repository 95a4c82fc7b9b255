//! # packrs Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout packrs. Every fallible
//! operation returns [`Result<T>`], an alias for `anyhow::Result<T>`, so I/O
//! failures can carry context (`with_context`) while domain failures are
//! raised as a [`PackError`] variant that callers can recover with
//! `downcast_ref`.
//!
//! ## Architecture
//!
//! The variants map onto the failure categories of the tool:
//! - **Invalid argument**: unknown codec name, equal source/destination,
//!   malformed permission strings, strict-mode destination clashes.
//! - **Not found**: the file or directory to process does not exist.
//! - **Execution**: the external `tar` tool is missing.
//! - **External command**: `tar` ran but exited unsuccessfully.
//! - **Internal invariant**: a condition that can only arise from a logic
//!   defect (e.g. a source file vanishing when it was meant to be kept).
//! - **Configuration**: invalid values in a `.packrs.toml` file.
//!
//! Raw I/O failures are not wrapped in a variant: they stay `std::io::Error`
//! inside the `anyhow` chain, with context naming the file involved.
//!
//! ## Examples
//!
//! ```rust
//! use packrs::core::error::PackError;
//! use packrs::common::archive::compression::{compress_file, CompressOptions};
//!
//! let err = compress_file("notes.txt", "rar", &CompressOptions::default()).unwrap_err();
//! assert!(matches!(
//!     err.downcast_ref::<PackError>(),
//!     Some(PackError::InvalidArgument(_))
//! ));
//! ```
//!
use thiserror::Error;

/// Custom error type for packrs.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let invalid = PackError::InvalidArgument("Unknown compression: 'rar'".to_string());
        assert_eq!(
            invalid.to_string(),
            "Invalid argument: Unknown compression: 'rar'"
        );

        let failed = PackError::ExternalCommand {
            cmd: "/bin/tar -cf out.tar .".into(),
            status: "2".into(),
            output: "tar: boom".into(),
        };
        assert_eq!(
            failed.to_string(),
            "External command failed: /bin/tar -cf out.tar ., Status: 2, Output:\ntar: boom"
        );

        let internal = PackError::InternalInvariant("source vanished".into());
        assert_eq!(
            internal.to_string(),
            "Internal invariant violated: source vanished"
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = PackError::NotFound("missing.txt".into()).into();
        let err = err.context("while compressing");
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::NotFound(_))
        ));
    }
}
