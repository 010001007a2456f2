//! A borrowed handle for chaining lookups.
//!
//! [`Node`] pairs a [`Document`] reference with a [`NodeIndex`] so navigation
//! reads left to right:
//!
//! ```rust
//! use jsonslab::Document;
//!
//! let doc = Document::parse(br#"{"b": {"c": [10, 20, 30]}}"#)?;
//! let c = doc.root_node().get("b")?.ok_or("no b")?.get("c")?.ok_or("no c")?;
//! assert_eq!(c.at(1)?.ok_or("no element")?.as_i64()?, 20);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use bstr::BString;

use crate::{
    document::Document,
    error::QueryError,
    number::Number,
    query::{Entry, NodeKind},
    table::NodeIndex,
};

/// A node of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'doc> {
    doc: &'doc Document,
    index: NodeIndex,
}

impl<'doc> Node<'doc> {
    pub(crate) fn new(doc: &'doc Document, index: NodeIndex) -> Self {
        Self { doc, index }
    }

    /// The record this handle points at.
    #[must_use]
    pub fn index(self) -> NodeIndex {
        self.index
    }

    /// The document this node belongs to.
    #[must_use]
    pub fn document(self) -> &'doc Document {
        self.doc
    }

    fn wrap(self, index: Option<NodeIndex>) -> Option<Node<'doc>> {
        index.map(|index| Node::new(self.doc, index))
    }

    /// See [`Document::get`].
    ///
    /// # Errors
    ///
    /// Fails unless this node is an object.
    pub fn get(self, key: impl AsRef<[u8]>) -> Result<Option<Node<'doc>>, QueryError> {
        Ok(self.wrap(self.doc.get(self.index, key)?))
    }

    /// See [`Document::index`].
    ///
    /// # Errors
    ///
    /// Fails unless this node is an array.
    pub fn at(self, index: usize) -> Result<Option<Node<'doc>>, QueryError> {
        Ok(self.wrap(self.doc.index(self.index, index)?))
    }

    /// # Errors
    ///
    /// Fails only for a stale index.
    pub fn kind(self) -> Result<NodeKind, QueryError> {
        self.doc.kind(self.index)
    }

    /// # Errors
    ///
    /// Fails unless this node is `true` or `false`.
    pub fn as_bool(self) -> Result<bool, QueryError> {
        self.doc.as_bool(self.index)
    }

    /// # Errors
    ///
    /// Fails unless this node is an integer that fits an `i64`.
    pub fn as_i64(self) -> Result<i64, QueryError> {
        self.doc.as_i64(self.index)
    }

    /// # Errors
    ///
    /// Fails unless this node is a number.
    pub fn as_f64(self) -> Result<f64, QueryError> {
        self.doc.as_f64(self.index)
    }

    /// # Errors
    ///
    /// Fails unless this node is a number.
    pub fn number(self) -> Result<Number, QueryError> {
        self.doc.number(self.index)
    }

    /// # Errors
    ///
    /// Fails unless this node is a string.
    pub fn string(self) -> Result<BString, QueryError> {
        self.doc.string(self.index)
    }

    /// Key/value handles of an object, in source order.
    ///
    /// # Errors
    ///
    /// Fails unless this node is an object.
    pub fn entries(
        self,
    ) -> Result<impl Iterator<Item = (Node<'doc>, Node<'doc>)> + 'doc, QueryError> {
        let doc = self.doc;
        Ok(doc
            .entries(self.index)?
            .map(move |Entry { key, value }| (Node::new(doc, key), Node::new(doc, value))))
    }

    /// Element handles of an array, in source order.
    ///
    /// # Errors
    ///
    /// Fails unless this node is an array.
    pub fn elements(self) -> Result<impl Iterator<Item = Node<'doc>> + 'doc, QueryError> {
        let doc = self.doc;
        Ok(doc
            .elements(self.index)?
            .map(move |index| Node::new(doc, index)))
    }

    /// # Errors
    ///
    /// Fails unless this node is an object or array.
    pub fn len(self) -> Result<usize, QueryError> {
        self.doc.len(self.index)
    }

    /// # Errors
    ///
    /// Fails unless this node is an object or array.
    pub fn is_empty(self) -> Result<bool, QueryError> {
        self.doc.is_empty(self.index)
    }
}
