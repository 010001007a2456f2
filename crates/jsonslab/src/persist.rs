//! Storing a document without re-serializing it.
//!
//! The compacted buffer is already the document's text and can be written as
//! is. The table is a sequence of `u32`s, written little-endian. Reloading goes
//! through [`Document::from_parts`](crate::Document::from_parts), which checks
//! the pair with [`validate`] before any query can observe it.

use alloc::vec::Vec;

use crate::{
    error::{LayoutError, ParseErrorKind, Region},
    parser,
    query::NodeKind,
};

/// Encodes table entries as little-endian bytes.
///
/// ```rust
/// use jsonslab::{persist, Document};
///
/// let doc = Document::parse(b"[true]")?;
/// let bytes = persist::encode_table(doc.table());
/// assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
///
/// let (compacted, _) = doc.clone().into_parts();
/// let reloaded = Document::from_parts(compacted, persist::decode_table(&bytes)?)?;
/// assert_eq!(reloaded, doc);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn encode_table(table: &[u32]) -> Vec<u8> {
    table.iter().flat_map(|entry| entry.to_le_bytes()).collect()
}

/// Decodes little-endian table bytes.
///
/// # Errors
///
/// [`LayoutError::MisalignedBytes`] unless the length is a multiple of four.
pub fn decode_table(bytes: &[u8]) -> Result<Vec<u32>, LayoutError> {
    if bytes.len() % 4 != 0 {
        return Err(LayoutError::MisalignedBytes(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Checks that `table` is exactly the index Phase 2 builds over `compacted`.
///
/// Records are first checked one at a time for a precise error, then the
/// table is rebuilt from the text and compared entry by entry.
pub(crate) fn validate(compacted: &[u8], table: &[u32]) -> Result<(), LayoutError> {
    if table.is_empty() {
        return Err(LayoutError::EmptyTable);
    }
    if table.len() % 2 != 0 {
        return Err(LayoutError::OddTableLength(table.len()));
    }
    if u32::try_from(compacted.len()).is_err() {
        return Err(LayoutError::BufferTooLarge {
            len: compacted.len(),
        });
    }
    for (record, pair) in table.chunks_exact(2).enumerate() {
        let index = record * 2;
        let (offset, skip) = (pair[0], pair[1]);
        let Some(&tag) = compacted.get(offset as usize) else {
            return Err(LayoutError::OffsetOutOfRange {
                index,
                offset,
                len: compacted.len(),
            });
        };
        if NodeKind::from_tag(tag).is_none() {
            return Err(LayoutError::UnknownTag {
                index,
                found: char::from(tag),
            });
        }
        let skip_at = skip as usize;
        if skip != 0 && (skip % 2 != 0 || skip_at <= index || skip_at >= table.len()) {
            return Err(LayoutError::SkipOutOfRange { index, skip });
        }
    }
    check_structure(compacted, table)?;
    tracing::trace!(
        compacted_len = compacted.len(),
        records = table.len() / 2,
        "layout validated"
    );
    Ok(())
}

fn check_structure(compacted: &[u8], table: &[u32]) -> Result<(), LayoutError> {
    let (rebuilt, built) = parser::index_compacted(compacted, table.len());
    if let Some(entry) = rebuilt
        .entries()
        .iter()
        .zip(table)
        .position(|(rebuilt, stored)| rebuilt != stored)
    {
        return Err(LayoutError::TableMismatch { index: entry & !1 });
    }
    match built {
        Ok(()) => Ok(()),
        Err(err) => match err.kind() {
            ParseErrorKind::CapacityExceeded {
                region: Region::DocumentTable,
                ..
            }
            | ParseErrorKind::TableSizeMismatch { .. } => Err(LayoutError::TableMismatch {
                index: rebuilt.len(),
            }),
            _ => Err(LayoutError::MalformedText(err)),
        },
    }
}
