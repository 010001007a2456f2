use alloc::vec::Vec;
use core::fmt;

use crate::error::{ParseErrorKind, QueryError, Region};

/// Index of a node record in the document table.
///
/// Always the even position of the record's offset slot; the skip link lives
/// right after it. The root is [`NodeIndex::ROOT`].
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// The root record.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Wraps a raw table position. Validity is checked by every query.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw table position.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The record that follows this one in the table.
    pub(crate) fn following(self) -> Self {
        Self(self.0 + 2)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decoded `[byte_offset, sibling_skip]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Where the node's identifying byte sits in the compacted buffer.
    pub offset: u32,
    /// Next related record, or `None` at the end of a chain.
    pub skip: Option<NodeIndex>,
}

/// Flat table of node records with a capacity fixed at allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocumentTable {
    entries: Vec<u32>,
    capacity: usize,
}

impl DocumentTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Wraps persisted entries; the caller validates the layout.
    pub(crate) fn from_entries(entries: Vec<u32>) -> Self {
        let capacity = entries.len();
        Self { entries, capacity }
    }

    /// Index the next pushed entry will land on.
    #[inline]
    pub(crate) fn cursor(&self) -> u32 {
        // Bounded by capacity, itself bounded by the u32 input length check.
        self.entries.len() as u32
    }

    #[inline]
    fn push(&mut self, entry: u32) -> Result<(), ParseErrorKind> {
        if self.entries.len() >= self.capacity {
            return Err(ParseErrorKind::CapacityExceeded {
                region: Region::DocumentTable,
                capacity: self.capacity,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Pushes a record whose skip link is resolved later.
    pub(crate) fn push_record(&mut self, offset: u32) -> Result<NodeIndex, ParseErrorKind> {
        let index = NodeIndex(self.cursor());
        self.push(offset)?;
        self.push(0)?;
        Ok(index)
    }

    pub(crate) fn set_skip(&mut self, node: NodeIndex, skip: u32) {
        // Only called on records this builder just pushed.
        if let Some(slot) = self.entries.get_mut(node.0 as usize + 1) {
            *slot = skip;
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<u32> {
        self.entries
    }

    /// Checks that `node` names a whole record of this table.
    #[inline]
    pub(crate) fn check(&self, node: NodeIndex) -> Result<usize, QueryError> {
        let at = node.0 as usize;
        if at % 2 != 0 || at + 1 >= self.entries.len() {
            return Err(QueryError::IndexOutOfRange {
                index: node.0,
                len: self.entries.len(),
            });
        }
        Ok(at)
    }

    pub(crate) fn record(&self, node: NodeIndex) -> Result<Record, QueryError> {
        let at = self.check(node)?;
        let skip = self.entries[at + 1];
        Ok(Record {
            offset: self.entries[at],
            skip: (skip != 0).then_some(NodeIndex(skip)),
        })
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = (NodeIndex, Record)> + '_ {
        self.entries.chunks_exact(2).enumerate().map(|(i, pair)| {
            (
                NodeIndex((i * 2) as u32),
                Record {
                    offset: pair[0],
                    skip: (pair[1] != 0).then_some(NodeIndex(pair[1])),
                },
            )
        })
    }
}
