//! # packrs Compress Command Handler
//!
//! File: cli/src/commands/compress.rs
//!
//! ## Overview
//!
//! Implements `packrs compress`, which compresses one file with gzip, bzip2
//! or xz and prints a summary of the result.
//!
//! ## Architecture
//!
//! 1. Load the configuration and merge it with the command-line flags
//!    (flags win).
//! 2. Create a termination flag and a Ctrl-C watcher task that raises it.
//! 3. Run the blocking compression pipeline on tokio's blocking pool.
//! 4. Print the [`CompressionResult`] summary to stdout.
//!
//! Pressing Ctrl-C stops spooling at the next chunk boundary. The destination
//! then holds a truncated stream and the source file is kept.
//!
//! ## Usage
//!
//! ```bash
//! # notes.txt -> notes.txt.gz (codec from config, default gzip)
//! packrs compress notes.txt
//!
//! # xz into an explicit destination, owner-only permissions, delete the source
//! packrs compress dump.sql -c xz -o /backups/dump.sql.xz --mode 600 --delete
//!
//! # refuse to overwrite an existing destination
//! packrs compress notes.txt --no-overwrite
//! ```
//!
use anyhow::Context;
use clap::Parser;
use packrs::common::archive::compression::{compress_file, CompressOptions, CompressionResult};
use packrs::common::archive::spool::TerminationFlag;
use packrs::common::fs::permissions::Permission;
use packrs::core::config::{self, Config};
use packrs::core::error::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Arguments for `packrs compress`.
#[derive(Parser, Debug)]
#[command(about = "Compress a single file with gzip, bzip2 or xz")]
pub struct CompressArgs {
    /// The file to compress.
    file: PathBuf,

    /// Where to write the compressed data. Defaults to FILE plus the codec extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Codec: gz, gzip, bz2, bzip2 or xz. Defaults to `compress.default_codec`.
    #[arg(short, long)]
    compression: Option<String>,

    /// Delete the source file after successful compression.
    #[arg(short, long)]
    delete: bool,

    /// Permission of the created file, octal ("640") or symbolic ("rw-r-----").
    #[arg(short, long)]
    mode: Option<String>,

    /// Fail instead of overwriting an existing destination.
    #[arg(long)]
    no_overwrite: bool,

    /// Spool chunk size in bytes.
    #[arg(long)]
    buffer_size: Option<usize>,
}

/// Handler for `packrs compress`.
pub async fn handle_compress(args: CompressArgs) -> Result<()> {
    info!("Handling compress command for {:?}", args.file);
    let cfg = config::load_config()?;
    let (codec, mut options) = build_options(&args, &cfg)?;

    let termination = TerminationFlag::new();
    options.termination = Some(termination.clone());
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current chunk...");
            termination.terminate();
        }
    });

    let file = args.file.clone();
    let outcome = tokio::task::spawn_blocking(move || compress_file(&file, &codec, &options))
        .await
        .context("Compression task failed unexpectedly")?;
    watcher.abort();

    let result = outcome.with_context(|| format!("Failed to compress {:?}", args.file))?;
    report(&result);
    Ok(())
}

/// Merges the configuration with the command-line flags.
fn build_options(args: &CompressArgs, cfg: &Config) -> Result<(String, CompressOptions)> {
    let codec = args
        .compression
        .clone()
        .unwrap_or_else(|| cfg.compress.default_codec.clone());
    let permission = match args.mode.as_deref().or(cfg.compress.default_mode.as_deref()) {
        Some(mode) => Some(mode.parse::<Permission>()?),
        None => None,
    };
    let options = CompressOptions {
        to_file_path: args.output.clone(),
        delete_original: args.delete,
        permission,
        termination: None,
        refuse_overwrite: args.no_overwrite || cfg.compress.refuse_overwrite,
        buffer_size: args.buffer_size.unwrap_or(cfg.compress.buffer_size),
    };
    debug!("Compressing with codec {:?} and options {:?}", codec, options);
    Ok((codec, options))
}

fn report(result: &CompressionResult) {
    println!("Compressed with {}:", result.compression_name());
    println!("  source:      {}", result.source_path().display());
    println!("  destination: {}", result.destination_path().display());
    println!(
        "  size:        {} -> {} bytes",
        result.original_size(),
        result.resulting_size()
    );
}
