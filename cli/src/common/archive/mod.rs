//! # packrs Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module groups everything that turns files into archives or
//! compressed files.
//!
//! ## Architecture
//!
//! - **`spool`**: Chunked stream copy with a cooperative termination flag.
//! - **`compression`**: The single-file compression pipeline (gzip, bzip2, xz)
//!   built on top of `spool`.
//! - **`tar`**: Directory archiving through the external `tar` executable.
//!
//! `compression` and `tar` share no logic; both are used directly by the
//! command handlers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use packrs::common::archive::{compression, tar::Archiver};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! Archiver::default().tar_directory(Path::new("./logs"), Path::new("./logs.tar"))?;
//! let result = compression::compress_file(
//!     "./logs.tar",
//!     "xz",
//!     &compression::CompressOptions { delete_original: true, ..Default::default() },
//! )?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```
//!

pub mod compression;
pub mod spool;
pub mod tar;
