use alloc::vec::Vec;

use crate::error::{ParseErrorKind, Region};

/// The whitespace-free, sign-normalized copy of the input text.
///
/// Allocated once with room for the input plus one byte, which covers the
/// only inflation Phase 1 can produce (an injected `+` on a bare number).
/// Also carries the table slot count Phase 1 accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompactBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    table_slots: usize,
}

impl CompactBuffer {
    /// Largest input whose offsets still fit a `u32` table entry.
    pub(crate) const MAX_INPUT_LEN: usize = u32::MAX as usize - 1;

    pub(crate) fn for_input_len(input_len: usize) -> Result<Self, ParseErrorKind> {
        if input_len > Self::MAX_INPUT_LEN {
            return Err(ParseErrorKind::InputTooLarge { len: input_len });
        }
        let capacity = input_len + 1;
        Ok(Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
            table_slots: 0,
        })
    }

    /// Rebuilds a finished buffer from persisted bytes.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        let capacity = bytes.len();
        Self {
            bytes,
            capacity,
            table_slots: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, byte: u8) -> Result<(), ParseErrorKind> {
        if self.bytes.len() >= self.capacity {
            return Err(ParseErrorKind::CapacityExceeded {
                region: Region::CompactedBuffer,
                capacity: self.capacity,
            });
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Reserves one node record (two table entries).
    #[inline]
    pub(crate) fn count_record(&mut self) {
        self.table_slots += 2;
    }

    pub(crate) fn table_slots(&self) -> usize {
        self.table_slots
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_stops_at_input_len_plus_one() {
        let mut buffer = CompactBuffer::for_input_len(2).unwrap();
        for byte in b"abc" {
            buffer.push(*byte).unwrap();
        }
        assert_eq!(
            buffer.push(b'd'),
            Err(ParseErrorKind::CapacityExceeded {
                region: Region::CompactedBuffer,
                capacity: 3,
            })
        );
        assert_eq!(buffer.as_bytes(), b"abc");
    }

    #[test]
    fn records_count_two_slots_each() {
        let mut buffer = CompactBuffer::for_input_len(0).unwrap();
        buffer.count_record();
        buffer.count_record();
        assert_eq!(buffer.table_slots(), 4);
    }
}
