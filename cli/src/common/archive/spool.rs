//! # packrs Stream Spooler (`common::archive::spool`)
//!
//! File: cli/src/common/archive/spool.rs
//!
//! ## Overview
//!
//! Copies all bytes from a reader into a writer in bounded chunks, checking a
//! cooperative [`TerminationFlag`] before every read. The compression
//! pipeline uses it to feed the source file into a codec writer.
//!
//! Termination is not rollback: when the flag is observed, spooling stops
//! and whatever was written so far stays in the sink.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Chunk size used when no other size is configured (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Shared cancellation token.
///
/// The caller keeps a clone and calls [`TerminationFlag::terminate`]; the
/// spooler only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct TerminationFlag(Arc<AtomicBool>);

impl TerminationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests termination. Idempotent.
    pub fn terminate(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_terminated(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a spool run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoolOutcome {
    /// The reader reported end of data.
    Completed,
    /// The termination flag was observed before end of data.
    Terminated,
}

/// Copies `reader` into `writer` in chunks of at most `buffer_size` bytes.
///
/// Before each read the optional `termination` flag is checked; once set the
/// copy stops and returns [`SpoolOutcome::Terminated`]. A `buffer_size` of
/// zero is treated as [`DEFAULT_BUFFER_SIZE`].
///
/// # Errors
///
/// Any read or write failure is returned as-is (with context); nothing is retried
/// apart from reads interrupted by a signal.
pub fn spool_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    termination: Option<&TerminationFlag>,
    buffer_size: usize,
) -> Result<SpoolOutcome>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let buffer_size = if buffer_size == 0 {
        DEFAULT_BUFFER_SIZE
    } else {
        buffer_size
    };
    let mut buffer = vec![0u8; buffer_size];

    loop {
        if termination.is_some_and(TerminationFlag::is_terminated) {
            debug!("Termination requested, stopping spool");
            return Ok(SpoolOutcome::Terminated);
        }
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(SpoolOutcome::Completed),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read from source stream"),
        };
        writer
            .write_all(&buffer[..n])
            .context("Failed to write to destination stream")?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Reader that sets a flag once it has handed out `trip_after` chunks.
    struct TrippingReader {
        inner: Cursor<Vec<u8>>,
        flag: TerminationFlag,
        reads: usize,
        trip_after: usize,
    }

    impl Read for TrippingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads == self.trip_after {
                self.flag.terminate();
            }
            self.inner.read(buf)
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_spool_copies_everything() -> Result<()> {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut out = Vec::new();
        let outcome = spool_stream(&mut Cursor::new(data.clone()), &mut out, None, 1024)?;
        assert_eq!(outcome, SpoolOutcome::Completed);
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn test_spool_empty_source() -> Result<()> {
        let mut out = Vec::new();
        let flag = TerminationFlag::new();
        let outcome = spool_stream(&mut io::empty(), &mut out, Some(&flag), 16)?;
        assert_eq!(outcome, SpoolOutcome::Completed);
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_spool_preset_flag_copies_nothing() -> Result<()> {
        let flag = TerminationFlag::new();
        flag.terminate();
        let mut out = Vec::new();
        let outcome = spool_stream(&mut Cursor::new(vec![1u8; 100]), &mut out, Some(&flag), 10)?;
        assert_eq!(outcome, SpoolOutcome::Terminated);
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_spool_stops_at_chunk_boundary() -> Result<()> {
        let flag = TerminationFlag::new();
        let mut reader = TrippingReader {
            inner: Cursor::new(vec![7u8; 100]),
            flag: flag.clone(),
            reads: 0,
            trip_after: 3,
        };
        let mut out = Vec::new();
        let outcome = spool_stream(&mut reader, &mut out, Some(&flag), 10)?;
        assert_eq!(outcome, SpoolOutcome::Terminated);
        // The third chunk was already read when the flag went up; it is still written.
        assert_eq!(out.len(), 30);
        Ok(())
    }

    #[test]
    fn test_spool_propagates_write_error() {
        let err = spool_stream(&mut Cursor::new(vec![1u8; 10]), &mut FailingWriter, None, 4)
            .unwrap_err();
        let io_err = err.downcast_ref::<io::Error>().expect("io error in chain");
        assert_eq!(io_err.to_string(), "disk full");
    }

    #[test]
    fn test_zero_buffer_size_falls_back_to_default() -> Result<()> {
        let data = vec![3u8; DEFAULT_BUFFER_SIZE + 5];
        let mut out = Vec::new();
        spool_stream(&mut Cursor::new(data.clone()), &mut out, None, 0)?;
        assert_eq!(out, data);
        Ok(())
    }
}
