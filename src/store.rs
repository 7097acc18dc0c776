//! Record store: typed scalar records in an append-ordered chain.
//!
//! Records are linked the way they were parsed: a singly linked chain with
//! head/tail handles and O(1) tail append. Links are slab indices rather
//! than pointers, so the chain stays safe to walk no matter how the nodes
//! were built. Labels need not be unique; lookups take the first match in
//! insertion order.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::arena::SlotId;

/// Scalar type tag.
///
/// Only `Number`, `String`, and `Boolean` have producers. The array and
/// nested-map tags are reserved by the dialect and cannot be constructed as
/// values, so they can never be silently mishandled; they appear here so
/// lookup errors can name them once producers exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Number,
    String,
    Boolean,
    /// Reserved; no current producer
    NumberArray,
    /// Reserved; no current producer
    StringArray,
    /// Reserved; no current producer
    NestedMap,
}

/// A record's payload. String bytes live in the document's arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Value {
    Number(f64),
    Str(SlotId),
    Bool(bool),
}

impl Value {
    pub(crate) fn tag(&self) -> Tag {
        match self {
            Value::Number(_) => Tag::Number,
            Value::Str(_) => Tag::String,
            Value::Bool(_) => Tag::Boolean,
        }
    }
}

/// Index of a node in the chain's slab.
pub(crate) type NodeId = u32;

/// One parsed `label: value` record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    /// Arena slot holding the label bytes
    pub label: SlotId,
    pub value: Value,
    /// Next record in insertion order
    pub next: Option<NodeId>,
}

/// Append-ordered chain of records.
#[derive(Debug, Default)]
pub(crate) struct RecordChain {
    nodes: Vec<Node>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl RecordChain {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Append a record at the tail in O(1).
    pub(crate) fn append(&mut self, label: SlotId, value: Value) {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            label,
            value,
            next: None,
        });

        match self.tail {
            Some(tail) => {
                self.nodes[tail as usize].next = Some(id);
                self.tail = Some(id);
            }
            None => {
                self.head = Some(id);
                self.tail = Some(id);
            }
        }
    }

    /// Walk the chain from head, following next links.
    pub(crate) fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            current: self.head,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator following the chain's next links.
pub(crate) struct ChainIter<'a> {
    chain: &'a RecordChain,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = &self.chain.nodes[id as usize];
        self.current = node.next;
        Some(node)
    }
}
