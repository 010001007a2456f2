//! Byte sources feeding Phase 1.
//!
//! The compaction pass only ever needs a one-byte look-ahead and a way to
//! consume that byte, so any sequential producer (memory, file, socket) can
//! back a parse. Nothing is rewound and nothing is read twice.

/// A forward-only stream of bytes with one byte of look-ahead.
///
/// Both methods return `None` once the stream is exhausted. The parser treats
/// an unexpected `None` inside a structure as a fatal error.
pub trait ByteSource {
    /// Returns the next byte without consuming it.
    fn peek(&mut self) -> Option<u8>;

    /// Consumes and returns the next byte.
    fn read(&mut self) -> Option<u8>;

    /// Reports an I/O failure that ended the stream early, if any.
    ///
    /// Sources that cannot fail keep the default.
    #[cfg(feature = "std")]
    fn take_error(&mut self) -> Option<std::io::Error> {
        None
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn peek(&mut self) -> Option<u8> {
        (**self).peek()
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }

    #[cfg(feature = "std")]
    fn take_error(&mut self) -> Option<std::io::Error> {
        (**self).take_error()
    }
}

/// A byte source over an in-memory slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a source positioned at the start of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn peek(&mut self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }
}

#[cfg(feature = "std")]
pub use reader::ReaderSource;

#[cfg(feature = "std")]
mod reader {
    use std::io::{self, BufRead};

    use super::ByteSource;

    /// A byte source over any buffered reader.
    ///
    /// Peeking uses the reader's own buffer, so no extra state is kept. A read
    /// error ends the stream; it is kept so the parser can report it instead
    /// of a plain end of input.
    #[derive(Debug)]
    pub struct ReaderSource<R> {
        reader: R,
        error: Option<io::Error>,
    }

    impl<R: BufRead> ReaderSource<R> {
        /// Wraps a buffered reader.
        pub fn new(reader: R) -> Self {
            Self {
                reader,
                error: None,
            }
        }

        /// Returns the wrapped reader, positioned after the last consumed byte.
        pub fn into_inner(self) -> R {
            self.reader
        }

        fn fill(&mut self) -> Option<u8> {
            if self.error.is_some() {
                return None;
            }
            loop {
                match self.reader.fill_buf() {
                    Ok(buf) => return buf.first().copied(),
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                    Err(err) => {
                        self.error = Some(err);
                        return None;
                    }
                }
            }
        }
    }

    impl<R: BufRead> ByteSource for ReaderSource<R> {
        #[inline]
        fn peek(&mut self) -> Option<u8> {
            self.fill()
        }

        #[inline]
        fn read(&mut self) -> Option<u8> {
            let byte = self.fill()?;
            self.reader.consume(1);
            Some(byte)
        }

        fn take_error(&mut self) -> Option<io::Error> {
            self.error.take()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_peeks_without_consuming() {
        let mut source = SliceSource::new(b"ab");
        assert_eq!(source.peek(), Some(b'a'));
        assert_eq!(source.peek(), Some(b'a'));
        assert_eq!(source.read(), Some(b'a'));
        assert_eq!(source.peek(), Some(b'b'));
        assert_eq!(source.read(), Some(b'b'));
        assert_eq!(source.peek(), None);
        assert_eq!(source.read(), None);
        assert_eq!(source.position(), 2);
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_source_reads_across_buffer_refills() {
        use std::io::BufReader;

        let data: &[u8] = b"0123456789";
        let mut source = ReaderSource::new(BufReader::with_capacity(3, data));
        let mut out = alloc::vec::Vec::new();
        while let Some(byte) = source.read() {
            assert!(source.peek().is_none_or(|next| next == byte + 1));
            out.push(byte);
        }
        assert_eq!(out, data);
        assert!(source.take_error().is_none());
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_source_keeps_io_error() {
        use std::io::{self, BufReader, Read};

        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
        }

        let mut source = ReaderSource::new(BufReader::new(Failing));
        assert_eq!(source.peek(), None);
        assert_eq!(source.read(), None);
        let err = source.take_error().expect("error kept");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
