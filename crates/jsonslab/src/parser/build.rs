//! Phase 2: index the compacted buffer into the document table.
//!
//! The compacted text has no whitespace, no separators and a one-byte type tag
//! at the start of every value, so this pass is purely positional.

use crate::{
    error::ParseErrorKind,
    table::{DocumentTable, NodeIndex},
};

use super::{is_exponent, is_long_constant};

pub(super) struct TableBuilder<'a> {
    json: &'a [u8],
    pos: usize,
    table: &'a mut DocumentTable,
}

impl<'a> TableBuilder<'a> {
    pub(super) fn new(json: &'a [u8], table: &'a mut DocumentTable) -> Self {
        Self {
            json,
            pos: 0,
            table,
        }
    }

    /// Read position in the compacted buffer; used as the error offset.
    pub(super) fn position(&self) -> usize {
        self.pos
    }

    pub(super) fn run(&mut self) -> Result<(), ParseErrorKind> {
        self.table.push_record(self.offset())?;
        self.value()?;
        if self.table.len() != self.table.capacity() {
            return Err(ParseErrorKind::TableSizeMismatch {
                expected: self.table.capacity(),
                actual: self.table.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn offset(&self) -> u32 {
        // The buffer length was checked against u32 before Phase 1.
        self.pos as u32
    }

    #[inline]
    fn peek(&self) -> Result<u8, ParseErrorKind> {
        self.json
            .get(self.pos)
            .copied()
            .ok_or(ParseErrorKind::UnexpectedEndOfInput)
    }

    #[inline]
    fn advance(&mut self, by: usize) -> Result<(), ParseErrorKind> {
        if self.pos + by > self.json.len() {
            return Err(ParseErrorKind::UnexpectedEndOfInput);
        }
        self.pos += by;
        Ok(())
    }

    /// Pushes a record for the node at the current position and parses it.
    fn child(&mut self) -> Result<NodeIndex, ParseErrorKind> {
        let node = self.table.push_record(self.offset())?;
        self.value()?;
        Ok(node)
    }

    /// Points `node` at the next record, or ends the chain before `close`.
    fn link(&mut self, node: NodeIndex, close: u8) -> Result<(), ParseErrorKind> {
        let skip = if self.peek()? == close {
            0
        } else {
            self.table.cursor()
        };
        self.table.set_skip(node, skip);
        Ok(())
    }

    fn value(&mut self) -> Result<(), ParseErrorKind> {
        match self.peek()? {
            b'{' => self.object(),
            b'[' => self.array(),
            b'"' => self.string(),
            b't' | b'f' | b'n' => self.constant(),
            b'+' | b'-' => self.number(),
            other => Err(ParseErrorKind::MalformedStructuralByte {
                found: char::from(other),
                expected: "a type tag",
            }),
        }
    }

    fn object(&mut self) -> Result<(), ParseErrorKind> {
        self.advance(1)?; // {
        loop {
            match self.peek()? {
                b'}' => return self.advance(1),
                b'"' => {
                    let key = self.table.push_record(self.offset())?;
                    self.string()?;
                    // a key's skip always names its value
                    self.table.set_skip(key, self.table.cursor());
                    let value = self.child()?;
                    self.link(value, b'}')?;
                }
                other => {
                    return Err(ParseErrorKind::MalformedStructuralByte {
                        found: char::from(other),
                        expected: "an object key or '}'",
                    });
                }
            }
        }
    }

    fn array(&mut self) -> Result<(), ParseErrorKind> {
        self.advance(1)?; // [
        loop {
            if self.peek()? == b']' {
                return self.advance(1);
            }
            let element = self.child()?;
            self.link(element, b']')?;
        }
    }

    fn string(&mut self) -> Result<(), ParseErrorKind> {
        self.advance(1)?; // "
        loop {
            let byte = self.peek()?;
            self.advance(1)?;
            match byte {
                b'"' => return Ok(()),
                b'\\' => self.advance(1)?,
                _ => {}
            }
        }
    }

    fn constant(&mut self) -> Result<(), ParseErrorKind> {
        let fourth = self
            .json
            .get(self.pos + 3)
            .copied()
            .ok_or(ParseErrorKind::UnexpectedEndOfInput)?;
        self.advance(if is_long_constant(fourth) { 5 } else { 4 })
    }

    fn number(&mut self) -> Result<(), ParseErrorKind> {
        self.advance(1)?; // sign
        while let Some(&byte) = self.json.get(self.pos) {
            if !(byte.is_ascii_digit() || byte == b'.' || is_exponent(byte)) {
                break;
            }
            self.pos += 1;
        }
        Ok(())
    }
}
