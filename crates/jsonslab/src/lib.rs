//! A two-phase JSON parser producing a flat, index-based document.
//!
//! Parsing never builds a tree. Phase 1 streams the input once into a
//! compacted copy with whitespace, commas and colons removed and every number
//! given an explicit sign. Phase 2 walks that copy and fills a table of
//! `[offset, skip]` records, one per value and one per object key. The pair is
//! the whole document: two allocations, no larger than the input plus one byte
//! and the table, and storable as is (see [`persist`]).
//!
//! ```rust
//! use jsonslab::{Document, NodeKind};
//!
//! let doc = Document::parse(br#"{"a": [1, true], "b": null}"#)?;
//! assert_eq!(doc.compacted(), r#"{"a"[+1true]"b"null}"#);
//!
//! let a = doc.get(doc.root(), "a")?.ok_or("missing a")?;
//! assert_eq!(doc.len(a)?, 2);
//! let first = doc.index(a, 0)?.ok_or("empty")?;
//! assert_eq!(doc.kind(first)?, NodeKind::Number);
//! assert_eq!(doc.as_i64(first)?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! String escapes are not decoded. Reading a string drops each escaping
//! backslash and keeps the byte after it, so `\n` reads as `n` and `\u00e9`
//! as `u00e9`.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod document;
mod error;
mod node;
mod number;
mod options;
mod parser;
pub mod persist;
mod query;
mod source;
mod table;
mod text;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use error::{LayoutError, ParseError, ParseErrorKind, Phase, QueryError, Region};
pub use node::Node;
pub use number::Number;
pub use options::ParseOptions;
pub use query::{Elements, Entries, Entry, NodeKind};
#[cfg(feature = "std")]
pub use source::ReaderSource;
pub use source::{ByteSource, SliceSource};
pub use table::{NodeIndex, Record};
pub use text::Unescaped;
