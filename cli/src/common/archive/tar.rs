//! # packrs TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! Packs a directory into an uncompressed tar file by running the system
//! `tar` executable (default `/bin/tar`, configurable via `archive.tar_path`).
//! No compression is applied here; compress the resulting `.tar` with
//! [`super::compression::compress_file`] if needed.
//!
//! ## Architecture
//!
//! Both operations run `tar -cf <dest> -- <entries...>` with the source
//! directory as working directory, so archive members are relative to it.
//! Entries always follow `--`, so a name starting with `-` is never read as
//! an option:
//!
//! - [`Archiver::tar_directory`] archives `.` (the whole directory).
//! - [`Archiver::tar_directory_contents`] archives a list of top-level names,
//!   or every immediate child of the directory when no list is given.
//!
//! A missing `tar` executable or a non-zero exit status is an error. Before it
//! is returned, the captured tar output is written to the error log.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use packrs::common::archive::tar::Archiver;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let archiver = Archiver::default();
//! archiver.tar_directory(Path::new("./site"), Path::new("./site.tar"))?;
//! archiver.tar_directory_contents(
//!     Path::new("./site"),
//!     Path::new("./pages.tar"),
//!     Some(&["index.html".to_string(), "css".to_string()][..]),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
use crate::common::fs::io::{absolute_path, list_dir_names};
use crate::common::process::run_command_capture;
use crate::core::error::{PackError, Result};
use anyhow::bail;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span};

/// Well-known location of the tar executable.
pub const DEFAULT_TAR_PATH: &str = "/bin/tar";

/// Creates tar archives with an external `tar` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archiver {
    tar_path: PathBuf,
}

impl Default for Archiver {
    fn default() -> Self {
        Self::new(DEFAULT_TAR_PATH)
    }
}

impl Archiver {
    pub fn new(tar_path: impl Into<PathBuf>) -> Self {
        Self {
            tar_path: tar_path.into(),
        }
    }

    pub fn tar_path(&self) -> &Path {
        &self.tar_path
    }

    /// # Archive a Directory (`tar_directory`)
    ///
    /// Packs the entire contents of `src_dir` into `dest_tar_file`.
    ///
    /// ## Errors
    ///
    /// - [`PackError::NotFound`] if `src_dir` is not a directory.
    /// - [`PackError::Execution`] if the tar executable does not exist.
    /// - [`PackError::ExternalCommand`] if tar exits unsuccessfully.
    pub fn tar_directory(&self, src_dir: &Path, dest_tar_file: &Path) -> Result<()> {
        let span = info_span!("tar", dir = %src_dir.display());
        let _enter = span.enter();
        info!("Packing {:?} ...", src_dir);

        let (tar_path, src_dir, dest_tar_file) = self.prepare(src_dir, dest_tar_file)?;
        let args = vec![
            OsString::from("-cf"),
            dest_tar_file.into_os_string(),
            OsString::from("--"),
            OsString::from("."),
        ];
        run_tar(&tar_path, &src_dir, &args)
    }

    /// # Archive Selected Directory Entries (`tar_directory_contents`)
    ///
    /// Packs the named top-level entries of `src_dir` into `dest_tar_file`.
    /// With `names == None`, every entry directly inside `src_dir` is included,
    /// as listed at the time of the call.
    ///
    /// ## Errors
    ///
    /// Same as [`Archiver::tar_directory`], plus [`PackError::InvalidArgument`]
    /// for an empty entry name.
    pub fn tar_directory_contents(
        &self,
        src_dir: &Path,
        dest_tar_file: &Path,
        names: Option<&[String]>,
    ) -> Result<()> {
        let span = info_span!("tar", dir = %src_dir.display());
        let _enter = span.enter();
        info!("Packing {:?} ...", src_dir);

        if let Some(names) = names {
            if names.iter().any(String::is_empty) {
                bail!(PackError::InvalidArgument(
                    "Entry names to archive must not be empty".to_string()
                ));
            }
        }

        let (tar_path, src_dir, dest_tar_file) = self.prepare(src_dir, dest_tar_file)?;
        let names = match names {
            Some(names) => names.to_vec(),
            None => list_dir_names(&src_dir)?,
        };

        let mut args = vec![
            OsString::from("-cf"),
            dest_tar_file.into_os_string(),
            OsString::from("--"),
        ];
        args.extend(names.into_iter().map(OsString::from));
        run_tar(&tar_path, &src_dir, &args)
    }

    /// Resolves the tar executable and both paths against the current
    /// directory, then checks the preconditions shared by both operations.
    /// tar runs inside `src_dir`, so nothing passed to it may stay relative.
    fn prepare(
        &self,
        src_dir: &Path,
        dest_tar_file: &Path,
    ) -> Result<(PathBuf, PathBuf, PathBuf)> {
        let src_dir = absolute_path(src_dir)?;
        if !src_dir.is_dir() {
            bail!(PackError::NotFound(format!(
                "Not an existing directory: {:?}",
                src_dir
            )));
        }
        let dest_tar_file = absolute_path(dest_tar_file)?;
        let tar_path = absolute_path(&self.tar_path)?;
        if !tar_path.is_file() {
            bail!(PackError::Execution(format!(
                "'tar' not found at {:?}",
                tar_path
            )));
        }
        Ok((tar_path, src_dir, dest_tar_file))
    }
}

fn run_tar(tar_path: &Path, working_dir: &Path, args: &[OsString]) -> Result<()> {
    info!("Invoking {:?} with: {:?}", tar_path, args);
    let output = run_command_capture(tar_path, args, working_dir).map_err(|e| {
        PackError::Execution(format!("Failed to run {:?}: {:#}", tar_path, e))
    })?;
    if !output.success() {
        output.dump(|line| error!("{}", line));
        let cmd = std::iter::once(tar_path.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        bail!(PackError::ExternalCommand {
            cmd,
            status: output.status_text(),
            output: output.combined(),
        });
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::io::Read;
    use tempfile::tempdir;

    fn tar_available() -> bool {
        Path::new(DEFAULT_TAR_PATH).is_file()
    }

    /// Reads back the regular files of a tar archive as (normalized path, content).
    fn read_files(tar_path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
        let mut archive = ::tar::Archive::new(fs::File::open(tar_path)?);
        let mut files = Vec::new();
        for entry in archive.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let path = entry.path()?.to_string_lossy().trim_start_matches("./").to_string();
            let mut content = Vec::new();
            entry.read_to_end(&mut content)?;
            files.push((path, content));
        }
        files.sort();
        Ok(files)
    }

    fn entry_names(tar_path: &Path) -> Result<HashSet<String>> {
        let mut archive = ::tar::Archive::new(fs::File::open(tar_path)?);
        let mut names = HashSet::new();
        for entry in archive.entries()? {
            let entry = entry?;
            let path = entry.path()?.to_string_lossy().to_string();
            let path = path.trim_start_matches("./").trim_end_matches('/').to_string();
            if !path.is_empty() && path != "." {
                names.insert(path);
            }
        }
        Ok(names)
    }

    fn sample_dir() -> Result<tempfile::TempDir> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "alpha")?;
        fs::write(dir.path().join("b.txt"), "bravo")?;
        fs::create_dir(dir.path().join("c"))?;
        fs::write(dir.path().join("c/inner.txt"), "charlie")?;
        Ok(dir)
    }

    #[test]
    fn test_tar_directory_round_trip() -> Result<()> {
        if !tar_available() {
            eprintln!("skipping: {} not available", DEFAULT_TAR_PATH);
            return Ok(());
        }
        let src = sample_dir()?;
        let out = tempdir()?;
        let dest = out.path().join("all.tar");
        Archiver::default().tar_directory(src.path(), &dest)?;

        let names = entry_names(&dest)?;
        assert!(names.contains("a.txt"));
        assert!(names.contains("b.txt"));
        assert!(names.contains("c"));
        assert_eq!(
            read_files(&dest)?,
            vec![
                ("a.txt".to_string(), b"alpha".to_vec()),
                ("b.txt".to_string(), b"bravo".to_vec()),
                ("c/inner.txt".to_string(), b"charlie".to_vec()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_tar_directory_contents_with_names() -> Result<()> {
        if !tar_available() {
            eprintln!("skipping: {} not available", DEFAULT_TAR_PATH);
            return Ok(());
        }
        let src = sample_dir()?;
        let out = tempdir()?;
        let dest = out.path().join("one.tar");
        Archiver::default().tar_directory_contents(
            src.path(),
            &dest,
            Some(&["a.txt".to_string()][..]),
        )?;
        assert_eq!(
            read_files(&dest)?,
            vec![("a.txt".to_string(), b"alpha".to_vec())]
        );
        Ok(())
    }

    #[test]
    fn test_tar_directory_contents_lists_children() -> Result<()> {
        if !tar_available() {
            eprintln!("skipping: {} not available", DEFAULT_TAR_PATH);
            return Ok(());
        }
        let src = sample_dir()?;
        let out = tempdir()?;
        let dest = out.path().join("children.tar");
        Archiver::default().tar_directory_contents(src.path(), &dest, None)?;
        let names = entry_names(&dest)?;
        for expected in ["a.txt", "b.txt", "c", "c/inner.txt"] {
            assert!(names.contains(expected), "missing {expected}");
        }
        Ok(())
    }

    #[test]
    fn test_dash_leading_entries_are_archived_as_files() -> Result<()> {
        if !tar_available() {
            eprintln!("skipping: {} not available", DEFAULT_TAR_PATH);
            return Ok(());
        }
        let src = tempdir()?;
        fs::write(src.path().join("a.txt"), "alpha")?;
        fs::write(src.path().join("--no-recursion"), "flag-like")?;
        fs::create_dir(src.path().join("d"))?;
        fs::write(src.path().join("d/inner.txt"), "delta")?;
        let out = tempdir()?;
        let dest = out.path().join("dashes.tar");

        Archiver::default().tar_directory_contents(src.path(), &dest, None)?;
        assert_eq!(
            read_files(&dest)?,
            vec![
                ("--no-recursion".to_string(), b"flag-like".to_vec()),
                ("a.txt".to_string(), b"alpha".to_vec()),
                ("d/inner.txt".to_string(), b"delta".to_vec()),
            ]
        );

        let named = out.path().join("named.tar");
        Archiver::default().tar_directory_contents(
            src.path(),
            &named,
            Some(&["--no-recursion".to_string(), "d".to_string()][..]),
        )?;
        assert_eq!(
            read_files(&named)?,
            vec![
                ("--no-recursion".to_string(), b"flag-like".to_vec()),
                ("d/inner.txt".to_string(), b"delta".to_vec()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_relative_tar_path_resolved_against_current_dir() -> Result<()> {
        if !tar_available() {
            eprintln!("skipping: {} not available", DEFAULT_TAR_PATH);
            return Ok(());
        }
        // `../../..` up to the root, then the well-known location.
        let cwd = std::env::current_dir()?;
        let mut relative = PathBuf::new();
        for _ in 0..cwd.components().count().saturating_sub(1) {
            relative.push("..");
        }
        relative.push(DEFAULT_TAR_PATH.trim_start_matches('/'));
        assert!(relative.is_relative());

        let src = sample_dir()?;
        let out = tempdir()?;
        let dest = out.path().join("relative.tar");
        Archiver::new(&relative).tar_directory(src.path(), &dest)?;
        assert!(entry_names(&dest)?.contains("a.txt"));
        Ok(())
    }

    #[test]
    fn test_relative_missing_tar_is_execution_error() -> Result<()> {
        let src = sample_dir()?;
        let err = Archiver::new("no-such-dir/tar")
            .tar_directory(src.path(), &src.path().join("x.tar"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::Execution(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_tar_executable() -> Result<()> {
        let src = sample_dir()?;
        let archiver = Archiver::new("/nonexistent/bin/tar");
        let err = archiver
            .tar_directory(src.path(), &src.path().join("x.tar"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::Execution(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_source_directory() {
        let err = Archiver::default()
            .tar_directory(Path::new("/nonexistent/dir"), Path::new("/tmp/x.tar"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_name_rejected() -> Result<()> {
        let src = sample_dir()?;
        let err = Archiver::default()
            .tar_directory_contents(src.path(), &src.path().join("x.tar"), Some(&[String::new()][..]))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn test_nonzero_exit_is_external_command_error() -> Result<()> {
        if !tar_available() {
            eprintln!("skipping: {} not available", DEFAULT_TAR_PATH);
            return Ok(());
        }
        let src = sample_dir()?;
        let out = tempdir()?;
        let err = Archiver::default()
            .tar_directory_contents(
                src.path(),
                &out.path().join("bad.tar"),
                Some(&["does-not-exist.txt".to_string()][..]),
            )
            .unwrap_err();
        match err.downcast_ref::<PackError>() {
            Some(PackError::ExternalCommand { status, .. }) => assert_ne!(status, "0"),
            other => panic!("unexpected error: {:?}", other),
        }
        Ok(())
    }
}
