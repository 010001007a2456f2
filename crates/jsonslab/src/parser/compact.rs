//! Phase 1: stream the byte source into the compacted buffer.
//!
//! The pass recognizes just enough structure to drop whitespace, commas and
//! colons, normalize numbers and count table records. It is not a validator;
//! malformed input is only rejected where a structural byte is required.

use crate::{
    buffer::CompactBuffer,
    error::ParseErrorKind,
    options::ParseOptions,
    source::ByteSource,
};

use super::{is_exponent, is_long_constant};

pub(super) struct Compactor<'a, S> {
    source: S,
    out: &'a mut CompactBuffer,
    options: &'a ParseOptions,
    consumed: usize,
    depth: usize,
}

impl<'a, S: ByteSource> Compactor<'a, S> {
    pub(super) fn new(source: S, out: &'a mut CompactBuffer, options: &'a ParseOptions) -> Self {
        Self {
            source,
            out,
            options,
            consumed: 0,
            depth: 0,
        }
    }

    /// Input bytes consumed so far; used as the error offset.
    pub(super) fn consumed(&self) -> usize {
        self.consumed
    }

    #[cfg(feature = "std")]
    pub(super) fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub(super) fn run(&mut self) -> Result<(), ParseErrorKind> {
        self.out.count_record();
        self.skip_whitespace();
        self.value()?;
        if self.options.reject_trailing_content {
            self.skip_whitespace();
            if let Some(byte) = self.source.peek() {
                return Err(malformed(byte, "end of input"));
            }
        }
        Ok(())
    }

    #[inline]
    fn peek(&mut self) -> Result<u8, ParseErrorKind> {
        self.source
            .peek()
            .ok_or(ParseErrorKind::UnexpectedEndOfInput)
    }

    #[inline]
    fn read(&mut self) -> Result<u8, ParseErrorKind> {
        let byte = self
            .source
            .read()
            .ok_or(ParseErrorKind::UnexpectedEndOfInput)?;
        self.consumed += 1;
        Ok(byte)
    }

    #[inline]
    fn copy(&mut self) -> Result<u8, ParseErrorKind> {
        let byte = self.read()?;
        self.out.push(byte)?;
        Ok(byte)
    }

    fn expect(&mut self, expected: u8, what: &'static str) -> Result<(), ParseErrorKind> {
        let byte = self.read()?;
        if byte == expected {
            Ok(())
        } else {
            Err(malformed(byte, what))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.source.peek() {
            if !self.options.is_whitespace(byte) {
                break;
            }
            self.source.read();
            self.consumed += 1;
        }
    }

    fn value(&mut self) -> Result<(), ParseErrorKind> {
        match self.peek()? {
            b'{' => self.nested(Self::object),
            b'[' => self.nested(Self::array),
            b'"' => self.string(),
            b't' | b'f' | b'n' => self.constant(),
            b'-' | b'+' | b'.' | b'0'..=b'9' => self.number(),
            other => Err(malformed(other, "a value")),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<(), ParseErrorKind>,
    ) -> Result<(), ParseErrorKind> {
        if self.depth >= self.options.max_depth {
            tracing::trace!(limit = self.options.max_depth, "nesting limit reached");
            return Err(ParseErrorKind::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn object(&mut self) -> Result<(), ParseErrorKind> {
        self.copy()?; // {
        loop {
            self.skip_whitespace();
            match self.peek()? {
                b'}' => {
                    self.copy()?;
                    return Ok(());
                }
                b'"' => {
                    self.string()?;
                    self.skip_whitespace();
                    self.expect(b':', "':' after an object key")?;
                    self.skip_whitespace();
                    self.value()?;
                    self.skip_whitespace();
                    // key record, value record
                    self.out.count_record();
                    self.out.count_record();
                    if self.peek()? == b',' {
                        self.read()?;
                    }
                }
                other => return Err(malformed(other, "an object key or '}'")),
            }
        }
    }

    fn array(&mut self) -> Result<(), ParseErrorKind> {
        self.copy()?; // [
        self.skip_whitespace();
        if self.peek()? == b']' {
            self.copy()?;
            return Ok(());
        }
        loop {
            self.skip_whitespace();
            self.value()?;
            self.skip_whitespace();
            self.out.count_record();
            match self.peek()? {
                b',' => {
                    self.read()?;
                }
                b']' => {
                    self.copy()?;
                    return Ok(());
                }
                other => return Err(malformed(other, "',' or ']'")),
            }
        }
    }

    /// Copies a string verbatim, escapes included.
    fn string(&mut self) -> Result<(), ParseErrorKind> {
        self.copy()?; // "
        loop {
            match self.copy()? {
                b'"' => return Ok(()),
                b'\\' => {
                    self.copy()?;
                }
                _ => {}
            }
        }
    }

    /// `true` and `null` are four bytes, `false` five; letters are not checked.
    fn constant(&mut self) -> Result<(), ParseErrorKind> {
        let mut last = 0;
        for _ in 0..4 {
            last = self.copy()?;
        }
        if is_long_constant(last) {
            self.copy()?;
        }
        Ok(())
    }

    /// Writes an explicit sign and folds the exponent sign into the marker:
    /// `e` for a negative exponent, `E` for a positive one.
    fn number(&mut self) -> Result<(), ParseErrorKind> {
        match self.peek()? {
            b'-' | b'+' => {
                self.copy()?;
            }
            _ => self.out.push(b'+')?,
        }
        let mut seen_exponent = false;
        while let Some(byte) = self.source.peek() {
            match byte {
                b'0'..=b'9' | b'.' => {
                    self.copy()?;
                }
                _ if is_exponent(byte) && !seen_exponent => {
                    seen_exponent = true;
                    self.read()?;
                    match self.source.peek() {
                        Some(b'-') => {
                            self.read()?;
                            self.out.push(b'e')?;
                        }
                        Some(b'+') => {
                            self.read()?;
                            self.out.push(b'E')?;
                        }
                        _ => self.out.push(b'E')?,
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }
}

fn malformed(found: u8, expected: &'static str) -> ParseErrorKind {
    ParseErrorKind::MalformedStructuralByte {
        found: char::from(found),
        expected,
    }
}
