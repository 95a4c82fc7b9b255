//! # packrs Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utility modules used by the command handlers:
//!
//! - **`archive`**: Stream spooling, the compression pipeline and tar archiving.
//! - **`fs`**: File creation with permission bits, sizes, deletion, directory listing.
//! - **`process`**: Running external programs and capturing their output.
//!

/// Compression pipeline, stream spooler and tar archiver.
pub mod archive;
/// Filesystem helpers and permission values.
pub mod fs;
/// Utilities for executing external processes.
pub mod process;
