//! # packrs Library
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! packrs creates tar archives from directories (via the system `tar`) and
//! compresses single files with gzip, bzip2 or xz. The `packrs` binary is a
//! thin clap front-end over this library.
//!
//! - [`common::archive::compression::compress_file`]: compress one file.
//! - [`common::archive::tar::Archiver`]: `tar_directory` / `tar_directory_contents`.
//! - [`core::config::load_config`]: user/project configuration.
//! - [`core::error::PackError`]: error categories callers can match on.
//!
pub mod common;
pub mod core;
