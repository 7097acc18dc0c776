//! # Yamlite
//!
//! Loader for a restricted, flat, scalar-only dialect of YAML: one level of
//! `label: value` lines, no nesting, no lists, no comments. A document is
//! parsed in a single pass over a private mutable copy of the file bytes and
//! answers typed lookups by label.
//!
//! ## Module Organization
//!
//! - [`arena`] - Fixed-capacity arena with first-fit slot reuse
//! - `parser` - Single-pass in-place scanner (internal)
//! - `store` - Append-ordered chain of typed records (internal)
//! - [`document`] - Document lifecycle and typed lookup
//! - [`config`] - Loading configuration
//! - [`error`] - Error taxonomy
//!
//! ## Quick Start
//!
//! ```
//! use yamlite::{Document, DocumentConfig};
//!
//! let bytes = b"name: \"Ada\"\nscore: 42.5\nlikes_vim: yes\n".to_vec();
//! let doc = Document::from_bytes("example", bytes, &DocumentConfig::default())
//!     .expect("arena")
//!     .into_document();
//!
//! assert_eq!(doc.get_string("name").unwrap(), "Ada");
//! assert_eq!(doc.get_number("score").unwrap(), 42.5);
//! assert!(doc.get_bool("likes_vim").unwrap());
//!
//! doc.close();
//! ```
//!
//! ## The scalar dialect
//!
//! Each logical line is blank or `label: value`, with exactly one space
//! required after the `:`. Values are single- or double-quoted strings (no
//! escape processing), bare tokens classified as numbers when they start
//! with a digit or `.`, or booleans for the exact literals
//! `true`/`yes`/`TRUE`/`True` and `false`/`no`/`FALSE`/`False`. Parsing is
//! fail-fast: the first malformed line stops the scan, and the partially
//! built document is returned alongside the error.
//!
//! ## Features
//!
//! - `std` (default) - Enables [`Document::open`] for reading files.
//!   Disable for `no_std + alloc` use; [`Document::from_bytes`] remains
//!   available.
//! - `serde` - Enable serialization/deserialization for configuration types

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

/// Fixed-capacity arena with first-fit slot reuse.
pub mod arena;

/// Loading configuration.
pub mod config;

/// Document lifecycle and typed lookup.
pub mod document;

/// Error taxonomy.
pub mod error;

/// Single-pass in-place scanner (not part of the public API).
pub(crate) mod parser;

/// Typed record chain (not part of the public API).
pub(crate) mod store;

pub use arena::{Arena, SlotId};
pub use config::{DocumentConfig, DEFAULT_ARENA_CAPACITY};
pub use document::{Document, LoadOutcome};
#[cfg(feature = "std")]
pub use error::OpenError;
pub use error::{ArenaError, LookupError, ScanError};
pub use store::Tag;
