//! # packrs Compression Pipeline (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! ## Overview
//!
//! This module compresses a single file with one of three codecs (gzip, bzip2,
//! xz) and reports what happened as a [`CompressionResult`]. It is the heart of
//! `packrs compress`.
//!
//! ## Architecture
//!
//! [`compress_file`] runs these steps, in order:
//!
//! 1. Parse the codec name into a [`CompressionKind`] (`"gz"`/`"gzip"`,
//!    `"bz2"`/`"bzip2"`, `"xz"`). Unknown names fail before anything on disk is touched.
//! 2. Make the source path absolute and require it to be an existing regular file.
//!    Without an explicit destination, the codec extension is appended to the source path.
//! 3. Reject a destination equal to the source. Streaming cannot compress in place.
//! 4. Optionally refuse to overwrite an existing destination (strict mode; off by default).
//! 5. Record the original size, create the destination (optionally with explicit
//!    permission bits), wrap it in the codec writer and spool the source into it.
//! 6. Finish the codec stream, record the resulting size, then delete or keep the source.
//!
//! A failed run may leave a partial destination file behind; it is not removed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use packrs::common::archive::compression::{compress_file, CompressOptions};
//! use packrs::common::fs::permissions::Permission;
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = CompressOptions {
//!     permission: Some(Permission::from_mode(0o640)),
//!     ..Default::default()
//! };
//! let result = compress_file("backup.sql", "xz", &options)?;
//! println!("{} -> {} bytes", result.original_size(), result.resulting_size());
//! # Ok(())
//! # }
//! ```
//!
use super::spool::{spool_stream, SpoolOutcome, TerminationFlag, DEFAULT_BUFFER_SIZE};
use crate::common::fs::io::{
    absolute_path, create_file, create_new_file, file_size, remove_file_if_exists,
};
use crate::common::fs::permissions::Permission;
use crate::core::error::{PackError, Result};
use anyhow::{bail, Context};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, info_span, warn};
use xz2::write::XzEncoder;

/// xz preset used for the xz codec.
const XZ_PRESET: u32 = 6;

/// The codecs packrs can compress with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    Gzip,
    Bzip2,
    Xz,
}

impl CompressionKind {
    pub const ALL: [CompressionKind; 3] = [Self::Gzip, Self::Bzip2, Self::Xz];

    /// Canonical display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
        }
    }

    /// File extension, including the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
            Self::Xz => ".xz",
        }
    }

    /// Wraps `writer` in this codec's compressing stream.
    pub fn encoder<W: Write>(self, writer: W) -> CodecWriter<W> {
        match self {
            Self::Gzip => CodecWriter::Gzip(GzEncoder::new(writer, flate2::Compression::best())),
            Self::Bzip2 => CodecWriter::Bzip2(BzEncoder::new(writer, bzip2::Compression::best())),
            Self::Xz => CodecWriter::Xz(XzEncoder::new(writer, XZ_PRESET)),
        }
    }

    /// `source` with this codec's extension appended (`notes.txt` -> `notes.txt.gz`).
    pub fn derive_destination(self, source: &Path) -> PathBuf {
        let mut raw: OsString = source.as_os_str().to_owned();
        raw.push(self.extension());
        PathBuf::from(raw)
    }
}

impl FromStr for CompressionKind {
    type Err = PackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gz" | "gzip" => Ok(Self::Gzip),
            "bz2" | "bzip2" => Ok(Self::Bzip2),
            "xz" => Ok(Self::Xz),
            other => Err(PackError::InvalidArgument(format!(
                "Unknown compression: {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compressing writer for one of the supported codecs.
///
/// Call [`CodecWriter::finish`] to write the stream trailer and get the inner
/// writer back. Dropping it instead finishes on a best-effort basis and
/// swallows errors.
pub enum CodecWriter<W: Write> {
    Gzip(GzEncoder<W>),
    Bzip2(BzEncoder<W>),
    Xz(XzEncoder<W>),
}

impl<W: Write> CodecWriter<W> {
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Gzip(w) => w.finish(),
            Self::Bzip2(w) => w.finish(),
            Self::Xz(w) => w.finish(),
        }
    }
}

impl<W: Write> Write for CodecWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Gzip(w) => w.write(buf),
            Self::Bzip2(w) => w.write(buf),
            Self::Xz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Gzip(w) => w.flush(),
            Self::Bzip2(w) => w.flush(),
            Self::Xz(w) => w.flush(),
        }
    }
}

/// Optional knobs for [`compress_file`].
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Destination path. Defaults to the source path plus the codec extension.
    pub to_file_path: Option<PathBuf>,
    /// Delete the source once it has been compressed completely.
    pub delete_original: bool,
    /// Mode bits for the destination, applied when it is created.
    pub permission: Option<Permission>,
    /// Cooperative cancellation, checked between chunks.
    pub termination: Option<TerminationFlag>,
    /// Fail instead of overwriting an existing destination.
    pub refuse_overwrite: bool,
    /// Spool chunk size in bytes.
    pub buffer_size: usize,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            to_file_path: None,
            delete_original: false,
            permission: None,
            termination: None,
            refuse_overwrite: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Summary of one successful [`compress_file`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    source_path: PathBuf,
    destination_path: PathBuf,
    compression_name: &'static str,
    compression_extension: &'static str,
    original_size: u64,
    resulting_size: u64,
}

impl CompressionResult {
    /// Absolute path of the file that was compressed.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Absolute path of the compressed file.
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    pub fn compression_name(&self) -> &'static str {
        self.compression_name
    }

    pub fn compression_extension(&self) -> &'static str {
        self.compression_extension
    }

    /// Size of the source in bytes, taken before compression.
    pub fn original_size(&self) -> u64 {
        self.original_size
    }

    /// Size of the destination in bytes, taken after the codec stream was finished.
    pub fn resulting_size(&self) -> u64 {
        self.resulting_size
    }
}

impl fmt::Display for CompressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {} -> {} bytes)",
            self.source_path.display(),
            self.destination_path.display(),
            self.compression_name,
            self.original_size,
            self.resulting_size
        )
    }
}

/// # Compress a File (`compress_file`)
///
/// Compresses `file_path` with the codec named by `compression` and returns a
/// [`CompressionResult`] describing the outcome.
///
/// An existing destination is overwritten unless `options.refuse_overwrite` is set.
///
/// If the termination flag is raised while spooling, the destination holds a
/// valid but truncated stream. The call still returns `Ok` with the sizes of
/// that truncated output; the source is kept even when `delete_original` is set.
///
/// ## Errors
///
/// - [`PackError::InvalidArgument`]: unknown codec name, destination equal to
///   the source, or an existing destination in strict mode.
/// - [`PackError::NotFound`]: the source is missing or not a regular file.
/// - [`PackError::InternalInvariant`]: the source disappeared although it was
///   to be kept.
/// - Any I/O failure while reading, writing or deleting, as `std::io::Error`
///   with context. A partial destination file may remain.
pub fn compress_file(
    file_path: impl AsRef<Path>,
    compression: &str,
    options: &CompressOptions,
) -> Result<CompressionResult> {
    let file_path = file_path.as_ref();
    let span = info_span!("compress", file = %file_path.display());
    let _enter = span.enter();
    info!("Compressing {:?} ...", file_path);

    let kind: CompressionKind = compression.parse()?;

    let source = resolve_source(file_path)?;
    let destination = match &options.to_file_path {
        Some(path) => absolute_path(path)?,
        None => kind.derive_destination(&source),
    };
    ensure_distinct(&source, &destination)?;

    if !options.refuse_overwrite && destination.exists() {
        debug!("Overwriting existing destination {:?}", destination);
    }

    info!("Packing with {} ...", kind);

    let original_size = file_size(&source)?;
    let outcome = write_compressed(&source, &destination, kind, options)?;
    let resulting_size = file_size(&destination)?;

    if original_size > 0 {
        let factor = 100.0 * resulting_size as f64 / original_size as f64;
        info!("Compression factor: {:.2}%", factor);
    }

    match outcome {
        SpoolOutcome::Completed => settle_source(&source, options.delete_original)?,
        SpoolOutcome::Terminated => {
            warn!(
                "Compression of {:?} was terminated; {:?} is incomplete",
                source, destination
            );
            ensure_source_present(&source)?;
        }
    }

    Ok(CompressionResult {
        source_path: source,
        destination_path: destination,
        compression_name: kind.name(),
        compression_extension: kind.extension(),
        original_size,
        resulting_size,
    })
}

fn resolve_source(file_path: &Path) -> Result<PathBuf> {
    let source = absolute_path(file_path)?;
    if !source.is_file() {
        bail!(PackError::NotFound(format!(
            "Not an existing regular file: {:?}",
            source
        )));
    }
    Ok(source)
}

/// Fails if `source` and `destination` name the same file, either literally
/// or, when the destination already exists, after resolving links and `..`.
fn ensure_distinct(source: &Path, destination: &Path) -> Result<()> {
    let same = source == destination
        || match (fs::canonicalize(source), fs::canonicalize(destination)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
    if same {
        bail!(PackError::InvalidArgument(format!(
            "Source and destination are the same file: {:?}",
            source
        )));
    }
    Ok(())
}

fn write_compressed(
    source: &Path,
    destination: &Path,
    kind: CompressionKind,
    options: &CompressOptions,
) -> Result<SpoolOutcome> {
    let mut reader =
        File::open(source).with_context(|| format!("Failed to open {:?} for reading", source))?;
    encode_into(&mut reader, destination, kind, options)
}

/// Creates `destination`, spools `reader` through the codec into it and
/// finishes the stream.
fn encode_into<R: Read + ?Sized>(
    reader: &mut R,
    destination: &Path,
    kind: CompressionKind,
    options: &CompressOptions,
) -> Result<SpoolOutcome> {
    let file = if options.refuse_overwrite {
        create_new_file(destination, options.permission)?
    } else {
        create_file(destination, options.permission)?
    };
    let mut writer = kind.encoder(file);
    let outcome = spool_stream(
        reader,
        &mut writer,
        options.termination.as_ref(),
        options.buffer_size,
    )
    .with_context(|| format!("Failed to compress into {:?}", destination))?;
    let file = writer
        .finish()
        .with_context(|| format!("Failed to finish {} stream for {:?}", kind, destination))?;
    file.sync_all()
        .with_context(|| format!("Failed to flush {:?}", destination))?;
    Ok(outcome)
}

fn settle_source(source: &Path, delete_original: bool) -> Result<()> {
    if delete_original {
        if remove_file_if_exists(source)? {
            debug!("Deleted original {:?}", source);
        }
        Ok(())
    } else {
        ensure_source_present(source)
    }
}

fn ensure_source_present(source: &Path) -> Result<()> {
    if !source.is_file() {
        bail!(PackError::InternalInvariant(format!(
            "Source file {:?} disappeared during compression",
            source
        )));
    }
    Ok(())
}
