//! Turning compacted number lexemes back into values.
//!
//! Phase 1 writes every number with an explicit sign and folds the exponent
//! sign into the marker (`e` negative, `E` positive). Materializing reverses
//! that into ordinary text and hands it to the standard library parsers. This
//! is the only query that allocates.

use alloc::string::String;

use crate::{error::QueryError, parser::is_exponent};

/// A materialized number.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// The lexeme had no fraction or exponent and fits an `i64`.
    Integer(i64),
    /// Everything else.
    Float(f64),
}

impl Number {
    /// The value as an `f64`, rounding large integers.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

/// Length of the compacted lexeme starting at the sign.
pub(crate) fn lexeme_len(compacted: &[u8]) -> usize {
    compacted
        .iter()
        .skip(1)
        .position(|&b| !(b.is_ascii_digit() || b == b'.' || is_exponent(b)))
        .map_or(compacted.len(), |n| n + 1)
}

/// Rewrites a compacted lexeme (`+2e3`) as standard text (`+2e-3`).
///
/// A marker with no exponent digits after it (input `1e`) is dropped, so the
/// mantissa alone is parsed.
pub(crate) fn reconstruct(lexeme: &[u8]) -> String {
    let lexeme = match lexeme {
        [mantissa @ .., marker] if is_exponent(*marker) => mantissa,
        _ => lexeme,
    };
    let mut text = String::with_capacity(lexeme.len() + 1);
    for &byte in lexeme {
        match byte {
            b'e' => text.push_str("e-"),
            b'E' => text.push_str("e+"),
            _ => text.push(char::from(byte)),
        }
    }
    text
}

fn is_integer_lexeme(lexeme: &[u8]) -> bool {
    !lexeme.iter().any(|&b| b == b'.' || is_exponent(b))
}

pub(crate) fn parse_i64(lexeme: &[u8]) -> Result<i64, QueryError> {
    let text = reconstruct(lexeme);
    text.parse()
        .map_err(|_| QueryError::InvalidNumber { text })
}

pub(crate) fn parse_f64(lexeme: &[u8]) -> Result<f64, QueryError> {
    let text = reconstruct(lexeme);
    text.parse()
        .map_err(|_| QueryError::InvalidNumber { text })
}

pub(crate) fn parse(lexeme: &[u8]) -> Result<Number, QueryError> {
    let text = reconstruct(lexeme);
    if is_integer_lexeme(lexeme) {
        if let Ok(n) = text.parse() {
            return Ok(Number::Integer(n));
        }
    }
    text.parse()
        .map(Number::Float)
        .map_err(|_| QueryError::InvalidNumber { text })
}
