//! Reading string nodes out of the compacted buffer.
//!
//! Escapes are not decoded: a backslash only marks the next byte as literal.
//! `\"` reads as `"`, `\\` as `\`, `\n` as `n` and `\u00e9` as `u00e9`. This
//! keeps every extracted string a sub-sequence of the input text.

use core::iter::FusedIterator;

/// Iterator over the bytes of a string node with escape markers removed.
///
/// Created by [`Document::unescaped`](crate::Document::unescaped).
#[derive(Debug, Clone)]
pub struct Unescaped<'a> {
    rest: &'a [u8],
    terminated: bool,
}

impl<'a> Unescaped<'a> {
    /// `body` starts right after the opening quote.
    pub(crate) fn new(body: &'a [u8]) -> Self {
        Self {
            rest: body,
            terminated: false,
        }
    }

    /// Whether the closing quote has been reached.
    ///
    /// Only meaningful once the iterator returned `None`; `false` then means
    /// the buffer ended inside the string.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl Iterator for Unescaped<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        let rest = self.rest;
        match rest {
            [b'"', ..] => {
                self.terminated = true;
                self.rest = &[];
                None
            }
            [b'\\', escaped, tail @ ..] | [escaped, tail @ ..] => {
                self.rest = tail;
                Some(*escaped)
            }
            [] => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.rest.len()))
    }
}

impl FusedIterator for Unescaped<'_> {}

/// Length of the raw (still escaped) string body starting after the opening
/// quote, or `None` if no closing quote follows.
pub(crate) fn raw_len(body: &[u8]) -> Option<usize> {
    let mut i = 0;
    while let Some(&byte) = body.get(i) {
        match byte {
            b'"' => return Some(i),
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    None
}
