//! Error types for arena allocation, scanning, and lookups.
//!
//! All failures in this crate are returned as values; nothing panics in
//! non-test code. Scan errors carry the byte offset and line where the scan
//! stopped so callers can report the failing input position.

use crate::store::Tag;

#[cfg(feature = "std")]
use std::path::PathBuf;

/// Errors reported by the arena allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// The request would exceed the arena's fixed capacity, or the backing
    /// block could not be obtained at creation time.
    OutOfMemory {
        /// Bytes requested by the failing call
        requested: usize,
        /// Bytes still available when the request failed
        remaining: usize,
    },
}

impl core::fmt::Display for ArenaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArenaError::OutOfMemory {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes, {remaining} remaining"
                )
            }
        }
    }
}

/// Errors that stop the scan.
///
/// The scan is fail-fast: the first error aborts it with no attempt to
/// resynchronize on a later line. Records from lines before the failure are
/// still available on the partially built document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanError {
    /// A label run ended without a `:` terminator
    MissingColon { offset: usize, line: usize },
    /// The byte immediately after `:` was not a space or tab
    NoSpaceAfterColon { offset: usize, line: usize },
    /// A quoted value reached end of input, or was closed by the other
    /// quote kind
    NonMatchingQuote {
        start_offset: usize,
        line: usize,
        quote: char,
    },
    /// A line started with a byte that cannot begin a label
    InvalidLabelStart {
        offset: usize,
        line: usize,
        found: char,
    },
    /// The document's arena ran out of capacity while storing a record
    OutOfMemory { requested: usize, remaining: usize },
}

impl core::fmt::Display for ScanError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScanError::MissingColon { offset, line } => {
                write!(f, "missing ':' after label at offset {offset} (line {line})")
            }
            ScanError::NoSpaceAfterColon { offset, line } => {
                write!(f, "no space after ':' at offset {offset} (line {line})")
            }
            ScanError::NonMatchingQuote {
                start_offset,
                line,
                quote,
            } => {
                write!(
                    f,
                    "non-matching quote {quote} starting at offset {start_offset} (line {line})"
                )
            }
            ScanError::InvalidLabelStart {
                offset,
                line,
                found,
            } => {
                write!(
                    f,
                    "label cannot start with {found:?} at offset {offset} (line {line})"
                )
            }
            ScanError::OutOfMemory {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena out of memory while storing record: requested {requested} bytes, {remaining} remaining"
                )
            }
        }
    }
}

impl From<ArenaError> for ScanError {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::OutOfMemory {
                requested,
                remaining,
            } => ScanError::OutOfMemory {
                requested,
                remaining,
            },
        }
    }
}

/// Errors reported by the typed lookup accessors.
///
/// Lookup errors are scoped to a single `get_*` call and never invalidate
/// the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// No record's label matched
    NotFound,
    /// The first record with a matching label holds a different type.
    /// The first label match is authoritative; later records with the same
    /// label are not consulted.
    TypeMismatch { expected: Tag, found: Tag },
    /// The stored string bytes are not valid UTF-8
    InvalidUtf8,
}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LookupError::NotFound => write!(f, "label not found"),
            LookupError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected:?}, found {found:?}")
            }
            LookupError::InvalidUtf8 => write!(f, "invalid UTF-8 in string value"),
        }
    }
}

/// Errors reported by [`Document::open`](crate::Document::open).
///
/// I/O failures are fatal to the `open` call; no retry is attempted.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum OpenError {
    /// The file does not exist
    FileNotFound { path: PathBuf },
    /// The file exists but could not be read
    Io {
        path: PathBuf,
        kind: std::io::ErrorKind,
    },
    /// The arena's backing block could not be obtained
    OutOfMemory { requested: usize },
}

#[cfg(feature = "std")]
impl core::fmt::Display for OpenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OpenError::FileNotFound { path } => {
                write!(f, "could not find \"{}\"", path.display())
            }
            OpenError::Io { path, kind } => {
                write!(f, "could not read \"{}\": {kind}", path.display())
            }
            OpenError::OutOfMemory { requested } => {
                write!(f, "could not obtain {requested} bytes for the arena")
            }
        }
    }
}
