//! # packrs Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the packrs CLI. Each
//! command defines its own clap arguments structure and an async handler
//! that loads the configuration, runs the library operation on tokio's
//! blocking pool, and reports the outcome.
//!
//! ## Commands
//!
//! - `compress`: Compress a single file with gzip, bzip2 or xz
//! - `tar`: Archive a directory (`tar` and `tar-contents`)
//!

/// Single-file compression (`packrs compress`).
pub mod compress;
/// Directory archiving (`packrs tar`, `packrs tar-contents`).
pub mod tar;
