//! Input adapters and the decoding cursor.
//!
//! All parser and scanner code reads through [`Cursor`], which assembles raw
//! bytes into code points for the configured [`Encoding`], tracks the number
//! of code units handed out, and provides exactly one code point of
//! lookahead. Byte slices feed the cursor through their plain
//! `iter().copied()` iterator (memory-mapped regions are byte slices too);
//! [`ReadBytes`] adapts an `io::Read` stream.

use crate::encoding::{Encoding, decode_scalar};
use crate::error::ParseError;

/// Decoding cursor over a byte iterator.
///
/// `consumed` counts code units (bytes for UTF-8, 16-bit units for UTF-16,
/// 32-bit units for UTF-32) of the characters handed out by [`Cursor::bump`].
/// A peeked but not yet bumped character is not counted, so an error raised
/// while looking at a pending character reports the zero-based unit offset
/// of that character.
#[derive(Debug)]
pub(crate) struct Cursor<I> {
    bytes: I,
    encoding: Encoding,
    lookahead: Option<(char, usize)>,
    reached_end: bool,
    consumed: usize,
}

impl<I> Cursor<I>
where
    I: Iterator<Item = u8>,
{
    pub(crate) fn new(bytes: I, encoding: Encoding) -> Self {
        Self {
            bytes,
            encoding,
            lookahead: None,
            reached_end: false,
            consumed: 0,
        }
    }

    /// The next code point, without consuming it.
    pub(crate) fn peek(&mut self) -> Result<Option<char>, ParseError> {
        if let Some((c, _)) = self.lookahead {
            return Ok(Some(c));
        }
        if self.reached_end {
            return Ok(None);
        }
        match decode_scalar(self.encoding, &mut self.bytes) {
            None => {
                self.reached_end = true;
                Ok(None)
            }
            Some(Ok((c, units))) => {
                self.lookahead = Some((c, units));
                Ok(Some(c))
            }
            Some(Err(failure)) => Err(ParseError::new(
                failure.kind,
                failure.description,
                self.consumed,
            )),
        }
    }

    /// Consumes and returns the next code point.
    pub(crate) fn bump(&mut self) -> Result<Option<char>, ParseError> {
        let c = self.peek()?;
        if let Some((_, units)) = self.lookahead.take() {
            self.consumed += units;
        }
        Ok(c)
    }

    /// Whether the input is exhausted.
    pub(crate) fn at_end(&mut self) -> Result<bool, ParseError> {
        Ok(self.peek()?.is_none())
    }

    /// Code units consumed so far.
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Byte iterator over an `io::Read` stream.
///
/// Reads are buffered internally. An I/O error ends the iteration; the error
/// is retained and can be inspected with [`ReadBytes::io_error`] after the
/// parse returns.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct ReadBytes<R> {
    reader: R,
    buf: alloc::vec::Vec<u8>,
    pos: usize,
    len: usize,
    error: Option<std::io::Error>,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ReadBytes<R> {
    /// Wraps `reader` with an 8 KiB internal buffer.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: alloc::vec![0; 8 * 1024],
            pos: 0,
            len: 0,
            error: None,
        }
    }

    /// The I/O error that ended the stream, if any.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        self.error.as_ref()
    }

    /// Unwraps the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn refill(&mut self) -> usize {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => return n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.error = Some(e);
                    return 0;
                }
            }
        }
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Iterator for ReadBytes<R> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.pos == self.len {
            if self.error.is_some() {
                return None;
            }
            self.len = self.refill();
            self.pos = 0;
            if self.len == 0 {
                return None;
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Some(b)
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::encoding::Encoding;
    use crate::error::ErrorKind;

    #[test]
    fn counts_units_per_encoding() {
        let mut cursor = Cursor::new("aÜ".bytes(), Encoding::Utf8);
        assert_eq!(cursor.peek().unwrap(), Some('a'));
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(cursor.bump().unwrap(), Some('a'));
        assert_eq!(cursor.consumed(), 1);
        // U+00DC occupies two UTF-8 units
        assert_eq!(cursor.bump().unwrap(), Some('Ü'));
        assert_eq!(cursor.consumed(), 3);
        assert!(cursor.at_end().unwrap());

        // The same text in UTF-16LE counts 16-bit units.
        let bytes = [0x61, 0x00, 0xDC, 0x00];
        let mut cursor = Cursor::new(bytes.iter().copied(), Encoding::Utf16Le);
        assert_eq!(cursor.bump().unwrap(), Some('a'));
        assert_eq!(cursor.bump().unwrap(), Some('Ü'));
        assert_eq!(cursor.consumed(), 2);
    }

    #[test]
    fn surrogate_pair_counts_two_units() {
        let bytes = [0x34, 0xD8, 0x1E, 0xDD];
        let mut cursor = Cursor::new(bytes.iter().copied(), Encoding::Utf16Le);
        assert_eq!(
            cursor.bump().unwrap(),
            Some(char::from_u32(0x1D11E).unwrap())
        );
        assert_eq!(cursor.consumed(), 2);
    }

    #[test]
    fn decode_error_reports_offset_of_offending_unit() {
        let bytes = [b'a', b'b', 0xC0, b'c'];
        let mut cursor = Cursor::new(bytes.iter().copied(), Encoding::Utf8);
        cursor.bump().unwrap();
        cursor.bump().unwrap();
        let err = cursor.peek().unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllformedUnicodeSequence);
        assert_eq!(err.consumed, 2);
    }

    #[cfg(feature = "std")]
    #[test]
    fn read_bytes_streams_a_reader() {
        use alloc::vec::Vec;

        let data = b"hello world".to_vec();
        let reader = super::ReadBytes::new(std::io::Cursor::new(data.clone()));
        let collected: Vec<u8> = reader.collect();
        assert_eq!(collected, data);
    }
}
