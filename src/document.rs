//! Document lifecycle and typed lookup.
//!
//! A [`Document`] owns everything a parse produced: the raw byte buffer
//! (mutated in place during the scan), the arena backing every record's
//! payload, and the record chain. The three live and die together, so no
//! record can outlive the bytes it points at.
//!
//! Loading is fail-fast but keeps the partial result: the first scan error
//! stops the scan, and [`LoadOutcome::Partial`] pairs the document built so
//! far with the error. Records from lines strictly before the failing line
//! remain retrievable; the record in flight when the error fired is never
//! committed.

#[cfg(not(test))]
use alloc::{string::String, vec::Vec};

#[cfg(feature = "std")]
use std::path::Path;

use crate::arena::{Arena, SlotId};
use crate::config::DocumentConfig;
use crate::error::{ArenaError, LookupError, ScanError};
#[cfg(feature = "std")]
use crate::error::OpenError;
use crate::parser::{RawValue, Scanner};
use crate::store::{RecordChain, Tag, Value};

/// An in-memory document of scalar records.
#[derive(Debug)]
pub struct Document {
    /// Source path, informational only
    name: String,
    /// Private copy of the file bytes; terminators were written in place
    /// during the scan
    buffer: Vec<u8>,
    arena: Arena,
    chain: RecordChain,
}

/// Result of loading a document.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Every line parsed
    Complete(Document),
    /// The scan stopped at the first error; the document holds the records
    /// parsed before the failing line
    Partial {
        document: Document,
        error: ScanError,
    },
}

impl LoadOutcome {
    /// The loaded document, complete or partial.
    pub fn document(&self) -> &Document {
        match self {
            LoadOutcome::Complete(document) => document,
            LoadOutcome::Partial { document, .. } => document,
        }
    }

    /// Take ownership of the document, complete or partial.
    pub fn into_document(self) -> Document {
        match self {
            LoadOutcome::Complete(document) => document,
            LoadOutcome::Partial { document, .. } => document,
        }
    }

    /// The scan error, if the load was partial.
    pub fn error(&self) -> Option<&ScanError> {
        match self {
            LoadOutcome::Complete(_) => None,
            LoadOutcome::Partial { error, .. } => Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, LoadOutcome::Complete(_))
    }
}

impl Document {
    /// Open a document from a file with the default configuration.
    #[cfg(feature = "std")]
    pub fn open(path: impl AsRef<Path>) -> Result<LoadOutcome, OpenError> {
        Self::open_with(path, &DocumentConfig::default())
    }

    /// Open a document from a file.
    ///
    /// The whole file is read into a private buffer up front; the scan then
    /// runs over that buffer synchronously to completion or first error.
    #[cfg(feature = "std")]
    pub fn open_with(
        path: impl AsRef<Path>,
        config: &DocumentConfig,
    ) -> Result<LoadOutcome, OpenError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => OpenError::FileNotFound {
                path: path.to_path_buf(),
            },
            kind => OpenError::Io {
                path: path.to_path_buf(),
                kind,
            },
        })?;

        let name = path.display().to_string();
        Self::from_bytes(name, bytes, config).map_err(|err| match err {
            ArenaError::OutOfMemory { requested, .. } => OpenError::OutOfMemory { requested },
        })
    }

    /// Load a document from bytes already in memory.
    ///
    /// This is the core entry point; `open` is a thin file-reading wrapper
    /// around it. The buffer becomes the document's private copy and is
    /// mutated in place during the scan. Creation only fails if the arena's
    /// backing block cannot be obtained; scan errors are reported through
    /// [`LoadOutcome::Partial`] instead.
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: Vec<u8>,
        config: &DocumentConfig,
    ) -> Result<LoadOutcome, ArenaError> {
        let mut arena = Arena::with_capacity(config.arena_capacity)?;
        let mut buffer = bytes;
        let mut chain = RecordChain::new();

        let result = load_records(&mut buffer, &mut arena, &mut chain);

        let document = Document {
            name: name.into(),
            buffer,
            arena,
            chain,
        };

        Ok(match result {
            Ok(()) => LoadOutcome::Complete(document),
            Err(error) => LoadOutcome::Partial { document, error },
        })
    }

    /// Source name this document was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records parsed.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The document's private buffer as the scan left it: terminator bytes
    /// sit where the `:` after each label and each value's line break used
    /// to be.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Look up a string by label.
    pub fn get_string(&self, label: &str) -> Result<&str, LookupError> {
        match self.find(label)? {
            Value::Str(slot) => {
                core::str::from_utf8(self.arena.get(slot)).map_err(|_| LookupError::InvalidUtf8)
            }
            other => Err(LookupError::TypeMismatch {
                expected: Tag::String,
                found: other.tag(),
            }),
        }
    }

    /// Look up a number by label.
    pub fn get_number(&self, label: &str) -> Result<f64, LookupError> {
        match self.find(label)? {
            Value::Number(n) => Ok(n),
            other => Err(LookupError::TypeMismatch {
                expected: Tag::Number,
                found: other.tag(),
            }),
        }
    }

    /// Look up a boolean by label.
    pub fn get_bool(&self, label: &str) -> Result<bool, LookupError> {
        match self.find(label)? {
            Value::Bool(b) => Ok(b),
            other => Err(LookupError::TypeMismatch {
                expected: Tag::Boolean,
                found: other.tag(),
            }),
        }
    }

    /// Close the document, releasing every record's arena slots before the
    /// arena and buffer are dropped together.
    ///
    /// Taking the document by value makes a second close unrepresentable.
    pub fn close(mut self) {
        self.release_records();
    }

    /// First record whose label matches, byte for byte. The first label
    /// match is authoritative regardless of tag; the scan never continues
    /// past it looking for a better-typed duplicate.
    fn find(&self, label: &str) -> Result<Value, LookupError> {
        for node in self.chain.iter() {
            if self.arena.get(node.label) == label.as_bytes() {
                return Ok(node.value);
            }
        }
        Err(LookupError::NotFound)
    }

    fn release_records(&mut self) {
        let mut slots: Vec<SlotId> = Vec::with_capacity(self.chain.len() * 2);
        for node in self.chain.iter() {
            slots.push(node.label);
            if let Value::Str(slot) = node.value {
                slots.push(slot);
            }
        }
        for slot in slots {
            self.arena.release(slot);
        }
    }
}

/// Pump the scanner and commit each finished record to the arena and chain.
///
/// A record is committed only after its line scanned cleanly, so a scan
/// error never leaves a half-built record in the chain. Arena exhaustion
/// surfaces as [`ScanError::OutOfMemory`] and aborts the scan like any
/// other error.
fn load_records(
    buffer: &mut [u8],
    arena: &mut Arena,
    chain: &mut RecordChain,
) -> Result<(), ScanError> {
    let mut scanner = Scanner::new(buffer);

    while let Some(record) = scanner.next_record()? {
        let label = arena.store(scanner.bytes(record.label))?;
        let value = match record.value {
            RawValue::Number(n) => Value::Number(n),
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::Str(span) => match arena.store(scanner.bytes(span)) {
                Ok(slot) => Value::Str(slot),
                Err(err) => {
                    // The record under construction is abandoned whole; its
                    // label slot goes back to the arena.
                    arena.release(label);
                    return Err(err.into());
                }
            },
        };
        chain.append(label, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(input: &[u8]) -> LoadOutcome {
        Document::from_bytes("test", input.to_vec(), &DocumentConfig::default()).unwrap()
    }

    #[test]
    fn typed_lookups() {
        let outcome = load(b"name: \"Ada\"\nscore: 42.5\nlikes_vim: yes\n");
        assert!(outcome.is_complete());
        let doc = outcome.into_document();

        assert_eq!(doc.get_string("name").unwrap(), "Ada");
        assert_eq!(doc.get_number("score").unwrap(), 42.5);
        assert!(doc.get_bool("likes_vim").unwrap());
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn missing_label_is_not_found() {
        let doc = load(b"name: Ada\n").into_document();
        assert_eq!(doc.get_string("missing").unwrap_err(), LookupError::NotFound);
    }

    #[test]
    fn mismatched_accessor_is_type_mismatch() {
        let doc = load(b"score: 42.5\n").into_document();
        assert_eq!(
            doc.get_string("score").unwrap_err(),
            LookupError::TypeMismatch {
                expected: Tag::String,
                found: Tag::Number
            }
        );
        assert_eq!(
            doc.get_bool("score").unwrap_err(),
            LookupError::TypeMismatch {
                expected: Tag::Boolean,
                found: Tag::Number
            }
        );
    }

    #[test]
    fn non_utf8_string_value_reports_invalid_utf8() {
        // The scan is byte-level; UTF-8 validity is checked only when the
        // string is read back.
        let doc = load(b"k: \xff\xfe\n").into_document();
        assert_eq!(doc.get_string("k").unwrap_err(), LookupError::InvalidUtf8);
        // The record itself is intact and findable
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn first_label_match_is_authoritative() {
        // The first "dup" is a number; the string duplicate after it must
        // never be reached, even by get_string.
        let doc = load(b"dup: 1\ndup: two\n").into_document();
        assert_eq!(doc.get_number("dup").unwrap(), 1.0);
        assert!(matches!(
            doc.get_string("dup").unwrap_err(),
            LookupError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn partial_document_keeps_earlier_records() {
        let outcome = load(b"a: 1\nb:2\nc: 3\n");
        assert!(matches!(
            outcome.error(),
            Some(ScanError::NoSpaceAfterColon { .. })
        ));

        let doc = outcome.into_document();
        assert_eq!(doc.get_number("a").unwrap(), 1.0);
        assert_eq!(doc.get_number("b").unwrap_err(), LookupError::NotFound);
        assert_eq!(doc.get_number("c").unwrap_err(), LookupError::NotFound);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn arena_exhaustion_surfaces_as_scan_error() {
        let config = DocumentConfig::default().with_arena_capacity(8);
        let outcome =
            Document::from_bytes("test", b"a: one\nb: two\nc: three\n".to_vec(), &config).unwrap();
        assert!(matches!(
            outcome.error(),
            Some(ScanError::OutOfMemory { .. })
        ));
        // Whatever fit before exhaustion is still retrievable
        let doc = outcome.into_document();
        assert_eq!(doc.get_string("a").unwrap(), "one");
    }

    #[test]
    fn lookup_errors_do_not_invalidate_the_document() {
        let doc = load(b"name: Ada\n").into_document();
        let _ = doc.get_number("name").unwrap_err();
        let _ = doc.get_string("nope").unwrap_err();
        assert_eq!(doc.get_string("name").unwrap(), "Ada");
    }

    #[test]
    fn close_releases_every_record_slot() {
        let mut doc = load(b"name: Ada\nscore: 42.5\nok: yes\n").into_document();
        // Four slots: three labels plus the "Ada" payload; numbers and
        // booleans carry no payload slot.
        let expected = doc.arena.allocations();
        assert_eq!(expected, 4);
        doc.release_records();
        assert_eq!(doc.arena.releases(), expected);
    }

    #[test]
    fn empty_document() {
        let doc = load(b"\n\n").into_document();
        assert!(doc.is_empty());
        assert_eq!(doc.get_string("x").unwrap_err(), LookupError::NotFound);
    }

    #[test]
    fn document_name_is_kept() {
        let doc = load(b"a: 1\n").into_document();
        assert_eq!(doc.name(), "test");
    }
}
