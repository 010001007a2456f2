/// Configuration for a single parse.
///
/// These options only affect Phase 1 (compaction); the table builder works on
/// already normalized bytes and has nothing to configure.
///
/// # Examples
///
/// ```rust
/// use jsonslab::{Document, ParseOptions};
///
/// let options = ParseOptions {
///     reject_trailing_content: true,
///     ..Default::default()
/// };
/// assert!(Document::parse_with_options(b"[1] [2]", &options).is_err());
/// assert!(Document::parse(b"[1] [2]").is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Only accept the four whitespace bytes defined by JSON (space, tab,
    /// line feed, carriage return) between tokens.
    ///
    /// By default every byte at or below `0x20` is skipped as whitespace.
    ///
    /// # Default
    ///
    /// `false`
    pub strict_whitespace: bool,

    /// Fail when anything other than whitespace follows the root value.
    ///
    /// By default the byte source is not read past the end of the root value.
    ///
    /// # Default
    ///
    /// `false`
    pub reject_trailing_content: bool,

    /// Maximum nesting of objects and arrays.
    ///
    /// Both phases recurse once per nesting level; deeper input fails with
    /// [`ParseErrorKind::DepthLimitExceeded`](crate::ParseErrorKind::DepthLimitExceeded).
    ///
    /// # Default
    ///
    /// `1024`
    pub max_depth: usize,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on parse errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl ParseOptions {
    /// Default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    #[inline]
    pub(crate) fn is_whitespace(&self, byte: u8) -> bool {
        if self.strict_whitespace {
            matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
        } else {
            byte <= b' '
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_whitespace: false,
            reject_trailing_content: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}
