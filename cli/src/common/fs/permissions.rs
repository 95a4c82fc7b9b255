//! # packrs File Permission Values
//!
//! File: cli/src/common/fs/permissions.rs
//!
//! ## Overview
//!
//! [`Permission`] holds the POSIX mode bits that should be applied to a file
//! created by packrs. Values come from the command line (`--mode`), from the
//! configuration (`default_mode`) or directly from library callers, and can be
//! written in either of two forms:
//!
//! - **Octal**: `"644"`, `"0640"`, `"0o600"`
//! - **Symbolic**: nine characters in `ls -l` order, e.g. `"rw-r-----"`
//!
//! The bits are applied by [`super::io::create_file`] at creation time.
//!
use crate::core::error::PackError;
use std::fmt;
use std::str::FromStr;

/// Mask of the bits a mode may carry (permission bits plus setuid/setgid/sticky).
const MODE_MASK: u32 = 0o7777;

/// POSIX permission bits for a created file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission(u32);

impl Permission {
    /// Builds a permission from raw mode bits. Bits outside `0o7777` are dropped.
    pub const fn from_mode(mode: u32) -> Self {
        Self(mode & MODE_MASK)
    }

    pub const fn mode(self) -> u32 {
        self.0
    }

    fn parse_symbolic(s: &str) -> Option<u32> {
        let bytes = s.as_bytes();
        if bytes.len() != 9 {
            return None;
        }
        let mut mode = 0u32;
        for (i, &c) in bytes.iter().enumerate() {
            let expected = match i % 3 {
                0 => b'r',
                1 => b'w',
                _ => b'x',
            };
            mode <<= 1;
            if c == expected {
                mode |= 1;
            } else if c != b'-' {
                return None;
            }
        }
        Some(mode)
    }

    fn parse_octal(s: &str) -> Option<u32> {
        let digits = s.strip_prefix("0o").unwrap_or(s);
        if digits.is_empty() || digits.len() > 4 {
            return None;
        }
        u32::from_str_radix(digits, 8).ok()
    }
}

impl FromStr for Permission {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::parse_octal(s)
            .or_else(|| Self::parse_symbolic(s))
            .map(Self::from_mode)
            .ok_or_else(|| PackError::InvalidArgument(format!("Invalid permission value: {:?}", s)))
    }
}

impl From<u32> for Permission {
    fn from(mode: u32) -> Self {
        Self::from_mode(mode)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}
