use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::query::NodeKind;

/// The pass that was running when a parse aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Phase 1: streaming the byte source into the compacted buffer.
    Compaction,
    /// Phase 2: building the document table from the compacted buffer.
    TableBuild,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Compaction => f.write_str("compaction"),
            Phase::TableBuild => f.write_str("table build"),
        }
    }
}

/// Which of the two fixed-size regions ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The compacted text buffer.
    CompactedBuffer,
    /// The document table.
    DocumentTable,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::CompactedBuffer => f.write_str("compacted buffer"),
            Region::DocumentTable => f.write_str("document table"),
        }
    }
}

/// A fatal parse failure. No partially built document survives one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} during {phase} at byte {offset}")]
pub struct ParseError {
    pub(crate) kind: ParseErrorKind,
    pub(crate) phase: Phase,
    pub(crate) offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, phase: Phase, offset: usize) -> Self {
        Self {
            kind,
            phase,
            offset,
        }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Which pass detected it.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Input offset for [`Phase::Compaction`], compacted-buffer offset for
    /// [`Phase::TableBuild`].
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// What stopped a parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input or compacted text ended inside a value.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A byte that cannot appear at this point of the grammar.
    #[error("unexpected byte {found:?} where {expected} was required")]
    MalformedStructuralByte {
        /// The offending byte.
        found: char,
        /// What the grammar allowed here.
        expected: &'static str,
    },
    /// A fixed-size region would have grown past its allocation.
    #[error("{region} capacity of {capacity} exceeded")]
    CapacityExceeded {
        /// The region that is full.
        region: Region,
        /// Its size, in bytes or table entries.
        capacity: usize,
    },
    /// Phase 2 filled fewer table entries than Phase 1 counted.
    #[error("document table holds {actual} entries but {expected} were counted")]
    TableSizeMismatch {
        /// Entries counted by Phase 1.
        expected: usize,
        /// Entries written by Phase 2.
        actual: usize,
    },
    /// Containers nested deeper than [`ParseOptions::max_depth`](crate::ParseOptions::max_depth).
    #[error("nesting deeper than {limit} levels")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The input cannot be addressed with 32-bit offsets.
    #[error("input of {len} bytes does not fit 32-bit offsets")]
    InputTooLarge {
        /// The announced input length.
        len: usize,
    },
    /// The reader failed.
    #[cfg(feature = "std")]
    #[error("read failed: {0}")]
    Io(std::io::ErrorKind),
}

/// A caller-contract violation against an already built document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The index is odd or past the end of the table.
    #[error("node index {index} is not a record of a table with {len} entries")]
    IndexOutOfRange {
        /// The rejected index.
        index: u32,
        /// Number of table entries.
        len: usize,
    },
    /// The operation does not apply to this kind of node.
    #[error("expected {expected}, found {found}")]
    WrongKind {
        /// Kind or kinds the operation accepts.
        expected: &'static str,
        /// Kind of the node that was passed.
        found: NodeKind,
    },
    /// A record points at a byte that starts no value.
    #[error("unknown type tag {found:?} at byte {offset}")]
    UnknownTag {
        /// The byte found.
        found: char,
        /// Its compacted-buffer offset.
        offset: usize,
    },
    /// The closing quote is missing.
    #[error("string starting at byte {offset} is not terminated")]
    UnterminatedString {
        /// Compacted-buffer offset of the opening quote.
        offset: usize,
    },
    /// The number text does not convert to the requested type.
    #[error("invalid number {text:?}")]
    InvalidNumber {
        /// The reconstructed number text.
        text: String,
    },
    /// A caller-provided destination is too short.
    #[error("destination holds {available} items but {needed} are required")]
    BufferTooSmall {
        /// Items the result needs.
        needed: usize,
        /// Items the destination holds.
        available: usize,
    },
}

/// Rejection of a persisted compacted buffer / table pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("table is empty")]
    EmptyTable,
    #[error("table has odd length {0}")]
    OddTableLength(usize),
    #[error("encoded table length {0} is not a multiple of 4")]
    MisalignedBytes(usize),
    #[error("record {index} points at byte {offset} of a {len}-byte buffer")]
    OffsetOutOfRange { index: usize, offset: u32, len: usize },
    #[error("record {index} has invalid skip link {skip}")]
    SkipOutOfRange { index: usize, skip: u32 },
    #[error("record {index} points at {found:?}, which starts no value")]
    UnknownTag { index: usize, found: char },
    #[error("compacted buffer of {len} bytes does not fit 32-bit offsets")]
    BufferTooLarge { len: usize },
    /// The table is not the one the compacted text produces. `index` is the
    /// first record that differs, or the table length when the text needs
    /// more records than the table has.
    #[error("table disagrees with the compacted text at record {index}")]
    TableMismatch { index: usize },
    /// The compacted text cannot be indexed at all.
    #[error("compacted text is malformed: {0}")]
    MalformedText(ParseError),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn parse_error_display_names_phase_and_offset() {
        let err = ParseError::new(
            ParseErrorKind::MalformedStructuralByte {
                found: 'x',
                expected: "a value",
            },
            Phase::Compaction,
            7,
        );
        assert_eq!(
            err.to_string(),
            "unexpected byte 'x' where a value was required during compaction at byte 7"
        );
    }

    #[test]
    fn capacity_error_names_region() {
        let err = ParseErrorKind::CapacityExceeded {
            region: Region::DocumentTable,
            capacity: 4,
        };
        assert_eq!(err.to_string(), "document table capacity of 4 exceeded");
    }
}
