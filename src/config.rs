//! Configuration for document loading.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default arena capacity in bytes.
///
/// Sized for typical configuration files: label and string payloads only,
/// so a 64 KiB arena covers documents far larger than that.
pub const DEFAULT_ARENA_CAPACITY: usize = 64 * 1024;

/// Configuration for document loading.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DocumentConfig {
    /// Capacity of the document's arena in bytes (default: 64 KiB).
    ///
    /// The arena is created with exactly this capacity and never grows;
    /// documents whose record payloads exceed it fail to load with an
    /// out-of-memory scan error.
    pub arena_capacity: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
        }
    }
}

impl DocumentConfig {
    /// Set the arena capacity.
    pub fn with_arena_capacity(mut self, capacity: usize) -> Self {
        self.arena_capacity = capacity;
        self
    }
}
