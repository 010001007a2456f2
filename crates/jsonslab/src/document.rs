use alloc::vec::Vec;

use bstr::{BStr, ByteSlice};

use crate::{
    buffer::CompactBuffer,
    error::{LayoutError, ParseError, QueryError},
    node::Node,
    options::ParseOptions,
    parser, persist,
    source::{ByteSource, SliceSource},
    table::{DocumentTable, NodeIndex, Record},
};

/// A parsed JSON document: the compacted text and the table indexing it.
///
/// Both regions are allocated once and never change after the parse. Queries
/// take a [`NodeIndex`]; [`Document::root_node`] gives a handle for chained
/// navigation instead.
///
/// ```rust
/// use jsonslab::{Document, NodeKind};
///
/// let doc = Document::parse(br#"{"a": 1, "b": {"c": true}}"#)?;
/// let root = doc.root();
/// let b = doc.get(root, "b")?.unwrap();
/// assert_eq!(doc.kind(b)?, NodeKind::Object);
/// let c = doc.get(b, "c")?.unwrap();
/// assert!(doc.is_true(c)?);
/// assert_eq!(doc.get(root, "z")?, None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: CompactBuffer,
    pub(crate) table: DocumentTable,
}

/// Documents are equal when their compacted text and table are.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.compacted() == other.compacted() && self.table() == other.table()
    }
}

impl Eq for Document {}

impl Document {
    /// Parses an in-memory JSON text with default options.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] either phase hits.
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        Self::parse_with_options(input, &ParseOptions::default())
    }

    /// Parses an in-memory JSON text.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] either phase hits.
    pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> Result<Self, ParseError> {
        Self::from_source(SliceSource::new(input), input.len(), options)
    }

    /// Parses from any byte source.
    ///
    /// `input_len` sizes the compacted buffer. It must be at least the number
    /// of bytes the parse consumes, otherwise the parse fails with
    /// [`CapacityExceeded`](crate::ParseErrorKind::CapacityExceeded).
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] either phase hits.
    pub fn from_source<S: ByteSource>(
        source: S,
        input_len: usize,
        options: &ParseOptions,
    ) -> Result<Self, ParseError> {
        let (buffer, table) = parser::parse(source, input_len, options)?;
        Ok(Self { buffer, table })
    }

    /// Parses from a reader producing at most `input_len` bytes of JSON.
    ///
    /// # Errors
    ///
    /// Read failures surface as [`ParseErrorKind::Io`](crate::ParseErrorKind::Io).
    #[cfg(feature = "std")]
    pub fn from_reader<R: std::io::Read>(
        reader: R,
        input_len: usize,
        options: &ParseOptions,
    ) -> Result<Self, ParseError> {
        let source = crate::source::ReaderSource::new(std::io::BufReader::new(reader));
        Self::from_source(source, input_len, options)
    }

    /// Parses a JSON file, sizing the buffer from the file's metadata.
    ///
    /// # Errors
    ///
    /// Failing to open or stat the file is reported as
    /// [`ParseErrorKind::Io`](crate::ParseErrorKind::Io) at offset 0.
    #[cfg(feature = "std")]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, ParseError> {
        use crate::error::{ParseErrorKind, Phase};

        let path = path.as_ref();
        let io_error = |err: std::io::Error| {
            ParseError::new(ParseErrorKind::Io(err.kind()), Phase::Compaction, 0)
        };
        let file = std::fs::File::open(path).map_err(io_error)?;
        // Lengths past usize are rejected as too large when the buffer is sized.
        let len = file.metadata().map_err(io_error)?.len();
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        tracing::debug!(path = %path.display(), len, "parsing file");
        Self::from_reader(file, len, &ParseOptions::default())
    }

    /// Rebuilds a document from a compacted buffer and table, typically ones
    /// produced by [`Document::into_parts`] and persisted elsewhere.
    ///
    /// The table must be exactly the one parsing the compacted text would
    /// build, so every query on the result answers as it did before saving.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayoutError`] found.
    pub fn from_parts(compacted: Vec<u8>, table: Vec<u32>) -> Result<Self, LayoutError> {
        persist::validate(&compacted, &table)?;
        Ok(Self {
            buffer: CompactBuffer::from_bytes(compacted),
            table: DocumentTable::from_entries(table),
        })
    }

    /// Splits the document into its compacted buffer and table.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, Vec<u32>) {
        (self.buffer.into_bytes(), self.table.into_entries())
    }

    /// The root record.
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex::ROOT
    }

    /// A navigation handle on the root.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        Node::new(self, NodeIndex::ROOT)
    }

    /// A navigation handle on `index`. The index is checked on first use.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Node<'_> {
        Node::new(self, index)
    }

    /// The compacted text.
    #[must_use]
    pub fn compacted(&self) -> &BStr {
        self.buffer.as_bytes().as_bstr()
    }

    /// The raw table: `[offset, skip]` pairs, root first.
    #[must_use]
    pub fn table(&self) -> &[u32] {
        self.table.entries()
    }

    /// Number of node records, keys included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.table.len() / 2
    }

    /// Decodes one record.
    ///
    /// # Errors
    ///
    /// [`QueryError::IndexOutOfRange`] for odd or out-of-range indices.
    pub fn record(&self, node: NodeIndex) -> Result<Record, QueryError> {
        self.table.record(node)
    }

    /// Every record in table order.
    pub fn records(&self) -> impl Iterator<Item = (NodeIndex, Record)> + '_ {
        self.table.records()
    }
}
