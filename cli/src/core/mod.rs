//! # packrs Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure shared by the library and
//! the command handlers:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use packrs::core::config; // For loading configuration
//! use packrs::core::error::{PackError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
