//! Classification, navigation and extraction over a built [`Document`].
//!
//! Every node is identified by the byte at its stored offset, so classifying
//! never touches more than one byte. Structure is followed through skip links:
//! a container's first child is the record right after it, a key's skip names
//! its value, and a value's (or element's) skip names the next sibling.
//! Lookups walk those chains linearly; callers doing many lookups against one
//! container should enumerate it once with [`Document::entries`] instead.

use alloc::{string::String, vec::Vec};
use core::{fmt, iter::FusedIterator};

use bstr::{BStr, BString, ByteSlice};

use crate::{
    document::Document,
    error::QueryError,
    number::{self, Number},
    table::NodeIndex,
    text::{self, Unescaped},
};

/// The JSON type of a node.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    /// Classifies a compacted type tag.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'{' => NodeKind::Object,
            b'[' => NodeKind::Array,
            b'"' => NodeKind::String,
            b'+' | b'-' => NodeKind::Number,
            b't' | b'f' => NodeKind::Boolean,
            b'n' => NodeKind::Null,
            _ => return None,
        })
    }

    /// Objects and arrays.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }

    /// `true`, `false` and `null`.
    #[must_use]
    pub fn is_constant(self) -> bool {
        matches!(self, NodeKind::Boolean | NodeKind::Null)
    }

    /// Lower-case name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A key/value pair of an object.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entry {
    /// The key's string node.
    pub key: NodeIndex,
    /// The value node.
    pub value: NodeIndex,
}

impl Document {
    /// Byte offset and type tag of `node`.
    fn tag(&self, node: NodeIndex) -> Result<(usize, u8), QueryError> {
        let offset = self.table.record(node)?.offset as usize;
        match self.buffer.as_bytes().get(offset) {
            Some(&tag) => Ok((offset, tag)),
            None => Err(QueryError::IndexOutOfRange {
                index: node.get(),
                len: self.table.len(),
            }),
        }
    }

    fn expect_kind(&self, node: NodeIndex, expected: NodeKind) -> Result<usize, QueryError> {
        let (offset, tag) = self.tag(node)?;
        match NodeKind::from_tag(tag) {
            Some(kind) if kind == expected => Ok(offset),
            Some(found) => Err(QueryError::WrongKind {
                expected: expected.name(),
                found,
            }),
            None => Err(unknown_tag(tag, offset)),
        }
    }

    /// Classifies `node` by its type tag.
    ///
    /// # Errors
    ///
    /// [`QueryError::IndexOutOfRange`] if `node` is not a record of this
    /// document.
    pub fn kind(&self, node: NodeIndex) -> Result<NodeKind, QueryError> {
        let (offset, tag) = self.tag(node)?;
        NodeKind::from_tag(tag).ok_or_else(|| unknown_tag(tag, offset))
    }

    /// Whether `node` is the constant `true`.
    ///
    /// # Errors
    ///
    /// Fails only for indices outside the table.
    pub fn is_true(&self, node: NodeIndex) -> Result<bool, QueryError> {
        Ok(self.tag(node)?.1 == b't')
    }

    /// Whether `node` is the constant `false`.
    ///
    /// # Errors
    ///
    /// Fails only for indices outside the table.
    pub fn is_false(&self, node: NodeIndex) -> Result<bool, QueryError> {
        Ok(self.tag(node)?.1 == b'f')
    }

    /// Whether `node` is `null`.
    ///
    /// # Errors
    ///
    /// Fails only for indices outside the table.
    pub fn is_null(&self, node: NodeIndex) -> Result<bool, QueryError> {
        Ok(self.tag(node)?.1 == b'n')
    }

    /// The value of a boolean node.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] for anything but `true` or `false`.
    pub fn as_bool(&self, node: NodeIndex) -> Result<bool, QueryError> {
        let (offset, tag) = self.tag(node)?;
        match tag {
            b't' => Ok(true),
            b'f' => Ok(false),
            _ => Err(wrong_kind("boolean", tag, offset)),
        }
    }

    /// Whether a container has no children, read from the byte after its
    /// opening delimiter.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is an object or array.
    pub fn is_empty(&self, node: NodeIndex) -> Result<bool, QueryError> {
        let (offset, tag) = self.tag(node)?;
        let close = match tag {
            b'{' => b'}',
            b'[' => b']',
            _ => return Err(wrong_kind("object or array", tag, offset)),
        };
        Ok(self
            .buffer
            .as_bytes()
            .get(offset + 1)
            .is_none_or(|&next| next == close))
    }

    /// The first child of a container: the first key of an object or the
    /// first element of an array. `None` when the container is empty.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is an object or array.
    pub fn first_child(&self, node: NodeIndex) -> Result<Option<NodeIndex>, QueryError> {
        Ok((!self.is_empty(node)?).then(|| node.following()))
    }

    /// Follows `node`'s skip link.
    ///
    /// For an object key this is its value; for an object value or an array
    /// element it is the next sibling. `None` ends the chain.
    ///
    /// # Errors
    ///
    /// Fails only for indices outside the table.
    pub fn next(&self, node: NodeIndex) -> Result<Option<NodeIndex>, QueryError> {
        Ok(self.table.record(node)?.skip)
    }

    /// Looks up the value stored under `key`.
    ///
    /// Keys are compared byte for byte after dropping escape markers. When a
    /// key occurs more than once the first occurrence wins.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `object` is an object.
    pub fn get(
        &self,
        object: NodeIndex,
        key: impl AsRef<[u8]>,
    ) -> Result<Option<NodeIndex>, QueryError> {
        let key = key.as_ref();
        for entry in self.entries(object)? {
            if self.string_eq(entry.key, key)? {
                return Ok(Some(entry.value));
            }
        }
        Ok(None)
    }

    /// The `index`-th element of an array, walking `index` skip links.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `array` is an array.
    pub fn index(&self, array: NodeIndex, index: usize) -> Result<Option<NodeIndex>, QueryError> {
        Ok(self.elements(array)?.nth(index))
    }

    /// Number of pairs in an object or elements in an array.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is an object or array.
    pub fn len(&self, node: NodeIndex) -> Result<usize, QueryError> {
        match self.kind(node)? {
            NodeKind::Object => Ok(self.entries(node)?.count()),
            NodeKind::Array => Ok(self.elements(node)?.count()),
            found => Err(QueryError::WrongKind {
                expected: "object or array",
                found,
            }),
        }
    }

    /// Iterates an object's key/value pairs in source order.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `object` is an object.
    pub fn entries(&self, object: NodeIndex) -> Result<Entries<'_>, QueryError> {
        let offset = self.expect_kind(object, NodeKind::Object)?;
        let empty = self.buffer.as_bytes().get(offset + 1) == Some(&b'}');
        Ok(Entries {
            doc: self,
            next_key: (!empty).then(|| object.following()),
        })
    }

    /// Iterates an array's elements in source order.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `array` is an array.
    pub fn elements(&self, array: NodeIndex) -> Result<Elements<'_>, QueryError> {
        let offset = self.expect_kind(array, NodeKind::Array)?;
        let empty = self.buffer.as_bytes().get(offset + 1) == Some(&b']');
        Ok(Elements {
            doc: self,
            next: (!empty).then(|| array.following()),
        })
    }

    /// Writes an object's pairs into `out` and returns how many were written.
    ///
    /// # Errors
    ///
    /// [`QueryError::BufferTooSmall`] if `out` cannot hold every pair; nothing
    /// is written in that case.
    pub fn copy_entries(&self, object: NodeIndex, out: &mut [Entry]) -> Result<usize, QueryError> {
        let needed = self.entries(object)?.count();
        if needed > out.len() {
            return Err(QueryError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        for (slot, entry) in out.iter_mut().zip(self.entries(object)?) {
            *slot = entry;
        }
        Ok(needed)
    }

    /// Writes an array's elements into `out` and returns how many were
    /// written.
    ///
    /// # Errors
    ///
    /// [`QueryError::BufferTooSmall`] if `out` cannot hold every element;
    /// nothing is written in that case.
    pub fn copy_elements(
        &self,
        array: NodeIndex,
        out: &mut [NodeIndex],
    ) -> Result<usize, QueryError> {
        let needed = self.elements(array)?.count();
        if needed > out.len() {
            return Err(QueryError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        for (slot, element) in out.iter_mut().zip(self.elements(array)?) {
            *slot = element;
        }
        Ok(needed)
    }

    fn string_body(&self, node: NodeIndex) -> Result<(usize, &[u8]), QueryError> {
        let offset = self.expect_kind(node, NodeKind::String)?;
        Ok((offset, &self.buffer.as_bytes()[offset + 1..]))
    }

    /// The string's text as stored, escapes included and quotes excluded.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is a string.
    pub fn raw_str(&self, node: NodeIndex) -> Result<&BStr, QueryError> {
        let (offset, body) = self.string_body(node)?;
        let len = text::raw_len(body).ok_or(QueryError::UnterminatedString { offset })?;
        Ok(body[..len].as_bstr())
    }

    /// Iterates the string's bytes with escape markers removed.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is a string.
    pub fn unescaped(&self, node: NodeIndex) -> Result<Unescaped<'_>, QueryError> {
        let (_, body) = self.string_body(node)?;
        Ok(Unescaped::new(body))
    }

    /// Number of bytes [`Document::copy_string`] writes.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is a string.
    pub fn string_len(&self, node: NodeIndex) -> Result<usize, QueryError> {
        let (offset, body) = self.string_body(node)?;
        let mut bytes = Unescaped::new(body);
        let len = bytes.by_ref().count();
        if bytes.is_terminated() {
            Ok(len)
        } else {
            Err(QueryError::UnterminatedString { offset })
        }
    }

    /// Copies the string's bytes, escape markers removed, into `out`.
    ///
    /// # Errors
    ///
    /// [`QueryError::BufferTooSmall`] if `out` is shorter than
    /// [`Document::string_len`].
    pub fn copy_string(&self, node: NodeIndex, out: &mut [u8]) -> Result<usize, QueryError> {
        let needed = self.string_len(node)?;
        if needed > out.len() {
            return Err(QueryError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        for (slot, byte) in out.iter_mut().zip(self.unescaped(node)?) {
            *slot = byte;
        }
        Ok(needed)
    }

    /// The string's bytes, escape markers removed, in a new buffer.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is a string.
    pub fn string(&self, node: NodeIndex) -> Result<BString, QueryError> {
        let mut out = Vec::with_capacity(self.string_len(node)?);
        out.extend(self.unescaped(node)?);
        Ok(BString::from(out))
    }

    /// Compares the string, escape markers removed, against `expected`.
    ///
    /// Stops at the first differing byte.
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is a string.
    pub fn string_eq(
        &self,
        node: NodeIndex,
        expected: impl AsRef<[u8]>,
    ) -> Result<bool, QueryError> {
        let mut actual = self.unescaped(node)?;
        let mut expected = expected.as_ref().iter();
        loop {
            match (actual.next(), expected.next()) {
                (Some(a), Some(&b)) if a == b => {}
                (None, None) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }

    fn lexeme(&self, node: NodeIndex) -> Result<&[u8], QueryError> {
        let offset = self.expect_kind(node, NodeKind::Number)?;
        let rest = &self.buffer.as_bytes()[offset..];
        Ok(&rest[..number::lexeme_len(rest)])
    }

    /// The number as standard JSON-like text (`+2e-3` for input `2E-3`).
    ///
    /// # Errors
    ///
    /// [`QueryError::WrongKind`] unless `node` is a number.
    pub fn number_text(&self, node: NodeIndex) -> Result<String, QueryError> {
        Ok(number::reconstruct(self.lexeme(node)?))
    }

    /// The number as an `i64`.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidNumber`] if it has a fraction or exponent, or does
    /// not fit.
    pub fn as_i64(&self, node: NodeIndex) -> Result<i64, QueryError> {
        number::parse_i64(self.lexeme(node)?)
    }

    /// The number as an `f64`.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidNumber`] if the text is not a number, e.g. a lone
    /// `-`.
    pub fn as_f64(&self, node: NodeIndex) -> Result<f64, QueryError> {
        number::parse_f64(self.lexeme(node)?)
    }

    /// The number as an integer when its text is one, otherwise a float.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidNumber`] if the text is not a number.
    pub fn number(&self, node: NodeIndex) -> Result<Number, QueryError> {
        number::parse(self.lexeme(node)?)
    }
}

fn unknown_tag(tag: u8, offset: usize) -> QueryError {
    QueryError::UnknownTag {
        found: char::from(tag),
        offset,
    }
}

fn wrong_kind(expected: &'static str, tag: u8, offset: usize) -> QueryError {
    match NodeKind::from_tag(tag) {
        Some(found) => QueryError::WrongKind { expected, found },
        None => unknown_tag(tag, offset),
    }
}

/// Iterator over an object's pairs. Created by [`Document::entries`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    doc: &'a Document,
    next_key: Option<NodeIndex>,
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        let key = self.next_key.take()?;
        let value = self.doc.table.record(key).ok()?.skip?;
        self.next_key = self.doc.table.record(value).ok()?.skip;
        Some(Entry { key, value })
    }
}

impl FusedIterator for Entries<'_> {}

/// Iterator over an array's elements. Created by [`Document::elements`].
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    doc: &'a Document,
    next: Option<NodeIndex>,
}

impl Iterator for Elements<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let node = self.next.take()?;
        self.next = self.doc.table.record(node).ok().and_then(|r| r.skip);
        Some(node)
    }
}

impl FusedIterator for Elements<'_> {}
