//! # packrs Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem operations the compression pipeline
//! and the archiver depend on. Each helper is a thin wrapper around `std::fs`
//! that adds `anyhow::Context` naming the path involved.
//!
//! ## Architecture
//!
//! - **`create_file`**: Creates or truncates a file for writing. An optional
//!   [`Permission`] is applied atomically at creation and then enforced
//!   through the open handle before anything is written.
//! - **`create_new_file`**: Same, but fails if the file already exists.
//! - **`file_size`**: Byte length of a file from its metadata.
//! - **`remove_file_if_exists`**: Deletes a file, treating "already gone" as success.
//! - **`absolute_path`**: Makes a path absolute against the current directory
//!   and folds `.` and `..` lexically, without requiring it to exist.
//! - **`list_dir_names`**: Names of the immediate children of a directory.
//!
use super::permissions::Permission;
use crate::core::error::{PackError, Result};
use anyhow::{bail, Context};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Creates (or truncates) `path` for writing.
///
/// With `Some(permission)` the file is created with those mode bits passed to
/// `open(2)`, so it never exists with broader permissions than requested. As
/// the creation mode is filtered by the process umask and ignored for files
/// that already exist, the bits are then set exactly via `fchmod` on the open
/// handle, still before any data is written.
///
/// With `None` the platform defaults apply.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be created or its permissions cannot be set.
pub fn create_file(path: &Path, permission: Option<Permission>) -> Result<File> {
    open_for_write(path, permission, false)
}

/// Like [`create_file`], but the existence check and the creation are a
/// single `O_EXCL` open, so an existing file is never truncated.
///
/// # Errors
///
/// [`PackError::InvalidArgument`] if `path` already exists, otherwise the
/// same as [`create_file`].
pub fn create_new_file(path: &Path, permission: Option<Permission>) -> Result<File> {
    open_for_write(path, permission, true)
}

fn open_for_write(path: &Path, permission: Option<Permission>, exclusive: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if exclusive {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(permission) = permission {
            options.mode(permission.mode());
        }
    }

    let file = match options.open(path) {
        Ok(file) => file,
        Err(e) if exclusive && e.kind() == ErrorKind::AlreadyExists => {
            bail!(PackError::InvalidArgument(format!(
                "Destination already exists: {:?}",
                path
            )));
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to create file {:?}", path)),
    };

    if let Some(permission) = permission {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(permission.mode()))
                .with_context(|| {
                    format!("Failed to set permissions {} on {:?}", permission, path)
                })?;
            debug!("Created {:?} with mode {}", path, permission);
        }
        #[cfg(not(unix))]
        warn!(
            "Ignoring permission {} for {:?}: mode bits are not supported on this platform.",
            permission, path
        );
    }

    Ok(file)
}

/// Returns the size of the file at `path` in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .with_context(|| format!("Failed to read size of {:?}", path))
}

/// Removes the file at `path`.
///
/// Returns `Ok(false)` if there was nothing to remove.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("File {:?} already absent, nothing to remove", path);
            Ok(false)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to remove file {:?}", path)),
    }
}

/// Makes `path` absolute by joining it onto the current directory, then
/// removes `.` and `..` components lexically. Symlinks are not resolved and
/// the path does not need to exist. `..` at the root stays at the root.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(path)
    };
    Ok(normalize_lexically(&joined))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Lists the names of the immediate children of `dir`, sorted.
pub fn list_dir_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))? {
        let entry = entry.with_context(|| format!("Failed to read entry in {:?}", dir))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping non UTF-8 entry {:?} in {:?}", raw, dir),
        }
    }
    names.sort();
    Ok(names)
}
