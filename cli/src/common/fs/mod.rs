//! # packrs Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers used by the compression pipeline and the archiver.
//!
//! - **`io`**: File creation with optional permission bits, size queries,
//!   tolerant deletion, absolute-path resolution and shallow directory listing.
//! - **`permissions`**: The [`permissions::Permission`] value type and its
//!   octal/symbolic parsing.
//!
//! Callers import from the specific submodule (e.g. `crate::common::fs::io::create_file`).
//!

/// Basic file I/O operations (e.g., `create_file`, `file_size`, `remove_file_if_exists`).
pub mod io;
/// Permission bits for created files.
pub mod permissions;
