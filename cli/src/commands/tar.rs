//! # packrs Tar Command Handlers
//!
//! File: cli/src/commands/tar.rs
//!
//! ## Overview
//!
//! Implements `packrs tar` (archive a whole directory) and
//! `packrs tar-contents` (archive selected top-level entries of a directory)
//! on top of [`Archiver`]. The tar executable comes from `archive.tar_path`
//! in the configuration unless `--tar-path` is given.
//!
//! ## Usage
//!
//! ```bash
//! # Everything below ./site, stored relative to ./site
//! packrs tar ./site site.tar
//!
//! # Only index.html and css/ from ./site
//! packrs tar-contents ./site pages.tar index.html css
//!
//! # Every top-level entry of ./site, listed at call time
//! packrs tar-contents ./site all.tar
//! ```
//!
use anyhow::Context;
use clap::Parser;
use packrs::common::archive::tar::Archiver;
use packrs::core::config;
use packrs::core::error::Result;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `packrs tar`.
#[derive(Parser, Debug)]
#[command(about = "Archive a directory into a tar file")]
pub struct TarArgs {
    /// Directory to archive.
    src_dir: PathBuf,
    /// Tar file to create.
    dest_tar: PathBuf,
    /// Use this tar executable instead of the configured one.
    #[arg(long)]
    tar_path: Option<PathBuf>,
}

/// Arguments for `packrs tar-contents`.
#[derive(Parser, Debug)]
#[command(about = "Archive selected top-level entries of a directory into a tar file")]
pub struct TarContentsArgs {
    /// Directory whose entries are archived.
    src_dir: PathBuf,
    /// Tar file to create.
    dest_tar: PathBuf,
    /// Entry names (no paths) to include. All entries when omitted.
    names: Vec<String>,
    /// Use this tar executable instead of the configured one.
    #[arg(long)]
    tar_path: Option<PathBuf>,
}

/// Handler for `packrs tar`.
pub async fn handle_tar(args: TarArgs) -> Result<()> {
    info!("Handling tar command for {:?}", args.src_dir);
    let archiver = archiver_for(args.tar_path.clone())?;
    let (src, dest) = (args.src_dir.clone(), args.dest_tar.clone());
    tokio::task::spawn_blocking(move || archiver.tar_directory(&src, &dest))
        .await
        .context("Archiving task failed unexpectedly")??;
    println!("Created {}", args.dest_tar.display());
    Ok(())
}

/// Handler for `packrs tar-contents`.
pub async fn handle_tar_contents(args: TarContentsArgs) -> Result<()> {
    info!(
        "Handling tar-contents command for {:?} (names: {:?})",
        args.src_dir, args.names
    );
    let archiver = archiver_for(args.tar_path.clone())?;
    let (src, dest) = (args.src_dir.clone(), args.dest_tar.clone());
    let names = (!args.names.is_empty()).then(|| args.names.clone());
    tokio::task::spawn_blocking(move || {
        archiver.tar_directory_contents(&src, &dest, names.as_deref())
    })
    .await
    .context("Archiving task failed unexpectedly")??;
    println!("Created {}", args.dest_tar.display());
    Ok(())
}

fn archiver_for(tar_path: Option<PathBuf>) -> Result<Archiver> {
    let tar_path = match tar_path {
        Some(path) => path,
        None => PathBuf::from(config::load_config()?.archive.tar_path),
    };
    Ok(Archiver::new(tar_path))
}
