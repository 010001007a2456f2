//! Two-phase parsing.
//!
//! Phase 1 ([`compact`]) streams the byte source once, writing a compacted
//! copy of the text and counting how many table entries the document needs.
//! Phase 2 ([`build`]) re-reads only the compacted copy and fills a table of
//! exactly that size. The buffer is allocated before Phase 1 and the table
//! between the phases; neither ever grows.

mod build;
mod compact;

use build::TableBuilder;
use compact::Compactor;

use crate::{
    buffer::CompactBuffer,
    error::{ParseError, Phase},
    options::ParseOptions,
    source::ByteSource,
    table::DocumentTable,
};

/// Exponent marker as written in JSON text and kept in compacted text.
#[inline]
pub(crate) fn is_exponent(byte: u8) -> bool {
    byte == b'e' || byte == b'E'
}

/// `false` is the only constant whose fourth byte is `s` and the only one
/// longer than four bytes.
#[inline]
pub(crate) fn is_long_constant(fourth: u8) -> bool {
    fourth == b's'
}

pub(crate) fn parse<S: ByteSource>(
    mut source: S,
    input_len: usize,
    options: &ParseOptions,
) -> Result<(CompactBuffer, DocumentTable), ParseError> {
    let result = run_phases(&mut source, input_len, options);
    if let Err(err) = &result {
        tracing::debug!(error = %err, "parse aborted");
        #[cfg(any(test, feature = "fuzzing"))]
        if options.panic_on_error {
            panic!("parse error: {err}");
        }
    }
    result
}

fn run_phases<S: ByteSource>(
    source: &mut S,
    input_len: usize,
    options: &ParseOptions,
) -> Result<(CompactBuffer, DocumentTable), ParseError> {
    let mut buffer = CompactBuffer::for_input_len(input_len)
        .map_err(|kind| ParseError::new(kind, Phase::Compaction, 0))?;

    let mut compactor = Compactor::new(&mut *source, &mut buffer, options);
    let compacted = compactor.run();
    let consumed = compactor.consumed();
    #[cfg(feature = "std")]
    if let Some(err) = compactor.source_mut().take_error() {
        return Err(ParseError::new(
            crate::error::ParseErrorKind::Io(err.kind()),
            Phase::Compaction,
            consumed,
        ));
    }
    compacted.map_err(|kind| ParseError::new(kind, Phase::Compaction, consumed))?;
    tracing::debug!(
        input_len,
        consumed,
        compacted_len = buffer.len(),
        table_entries = buffer.table_slots(),
        "compaction finished"
    );

    let (table, built) = index_compacted(buffer.as_bytes(), buffer.table_slots());
    built?;
    tracing::debug!(records = table.len() / 2, "table build finished");

    Ok((buffer, table))
}

/// Runs Phase 2 alone over text that is already compacted.
///
/// The table comes back even when indexing fails, holding whatever records
/// were pushed before the failure.
pub(crate) fn index_compacted(
    compacted: &[u8],
    capacity: usize,
) -> (DocumentTable, Result<(), ParseError>) {
    let mut table = DocumentTable::with_capacity(capacity);
    let mut builder = TableBuilder::new(compacted, &mut table);
    let built = builder
        .run()
        .map_err(|kind| ParseError::new(kind, Phase::TableBuild, builder.position()));
    (table, built)
}
