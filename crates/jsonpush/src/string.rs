//! JSON string scanning.
//!
//! The scanner owns one growable scratch buffer. Value strings are flushed
//! to the sink in chunks once the buffer reaches [`STRING_CHUNK_LEN`], so
//! string contents larger than any reasonable buffer stream through without
//! accumulating. Key strings must arrive whole and are capped at
//! [`KEY_MAX_LEN`].

use alloc::format;
use alloc::string::String;
use core::mem;

use crate::encoding::is_noncharacter;
use crate::error::{ErrorKind, ParseError};
use crate::escape::decode_escape;
use crate::input::Cursor;
use crate::options::{NoncharacterHandling, NullHandling, ParserOptions};

/// Buffer length at which a value-string chunk is flushed to the sink.
pub(crate) const STRING_CHUNK_LEN: usize = 4 * 1024;

/// Hard cap on the decoded length of a key string.
pub(crate) const KEY_MAX_LEN: usize = 32 * 1024;

enum Step {
    Push(char),
    Skip,
    Closed,
}

#[derive(Debug)]
pub(crate) struct StringScanner {
    buf: String,
}

impl StringScanner {
    pub(crate) fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Scans a value string (opening quote already consumed), emitting
    /// decoded chunks through `emit`. All chunks but the last carry
    /// `has_more = true`; the final chunk may be empty.
    pub(crate) fn scan_value<I, F>(
        &mut self,
        cursor: &mut Cursor<I>,
        options: &ParserOptions,
        mut emit: F,
    ) -> Result<(), ParseError>
    where
        I: Iterator<Item = u8>,
        F: FnMut(&str, bool),
    {
        self.buf.clear();
        loop {
            match next_step(cursor, options)? {
                Step::Closed => {
                    emit(&self.buf, false);
                    self.buf.clear();
                    return Ok(());
                }
                Step::Skip => {}
                Step::Push(c) => {
                    self.buf.push(c);
                    if self.buf.len() >= STRING_CHUNK_LEN {
                        emit(&self.buf, true);
                        self.buf.clear();
                    }
                }
            }
        }
    }

    /// Scans a key string (opening quote already consumed) and returns it
    /// whole. Keys never chunk; exceeding [`KEY_MAX_LEN`] is a runtime
    /// error.
    pub(crate) fn scan_key<I>(
        &mut self,
        cursor: &mut Cursor<I>,
        options: &ParserOptions,
    ) -> Result<String, ParseError>
    where
        I: Iterator<Item = u8>,
    {
        self.buf.clear();
        loop {
            match next_step(cursor, options)? {
                Step::Closed => return Ok(mem::take(&mut self.buf)),
                Step::Skip => {}
                Step::Push(c) => {
                    if self.buf.len() + c.len_utf8() > KEY_MAX_LEN {
                        return Err(ParseError::new(
                            ErrorKind::InternalRuntime,
                            format!("key string exceeds the {KEY_MAX_LEN} byte buffer cap"),
                            cursor.consumed(),
                        ));
                    }
                    self.buf.push(c);
                }
            }
        }
    }
}

/// Reads one string element: a raw character, an escape sequence, or the
/// closing quote.
fn next_step<I>(cursor: &mut Cursor<I>, options: &ParserOptions) -> Result<Step, ParseError>
where
    I: Iterator<Item = u8>,
{
    let Some(c) = cursor.peek()? else {
        return Err(ParseError::new(
            ErrorKind::UnexpectedEnd,
            "unterminated string",
            cursor.consumed(),
        ));
    };
    match c {
        '"' => {
            cursor.bump()?;
            Ok(Step::Closed)
        }
        '\\' => {
            cursor.bump()?;
            let decoded = decode_escape(cursor)?;
            filter(decoded, options, cursor.consumed())
        }
        // A raw NUL is governed by the null policy alone.
        '\0' => {
            cursor.bump()?;
            filter('\0', options, cursor.consumed())
        }
        c if (c as u32) < 0x20 => {
            if options.extensions.allow_control_characters {
                cursor.bump()?;
                filter(c, options, cursor.consumed())
            } else {
                Err(ParseError::new(
                    ErrorKind::ControlCharNotAllowed,
                    format!("control character U+{:04X} in string", c as u32),
                    cursor.consumed(),
                ))
            }
        }
        c => {
            cursor.bump()?;
            filter(c, options, cursor.consumed())
        }
    }
}

/// Applies the NUL and noncharacter policies to a decoded code point.
fn filter(c: char, options: &ParserOptions, consumed: usize) -> Result<Step, ParseError> {
    if c == '\0' {
        return match options.null_handling {
            NullHandling::SignalError => Err(ParseError::new(
                ErrorKind::UnicodeNullNotAllowed,
                "U+0000 in string",
                consumed,
            )),
            NullHandling::Retain => Ok(Step::Push(c)),
            NullHandling::Substitute => Ok(Step::Push(char::REPLACEMENT_CHARACTER)),
            NullHandling::Skip => Ok(Step::Skip),
        };
    }
    if is_noncharacter(c as u32) {
        return match options.noncharacter_handling {
            NoncharacterHandling::SignalError => Err(ParseError::new(
                ErrorKind::UnicodeNoncharacter,
                format!("noncharacter U+{:04X} in string", c as u32),
                consumed,
            )),
            NoncharacterHandling::Retain => Ok(Step::Push(c)),
            NoncharacterHandling::Substitute => Ok(Step::Push(char::REPLACEMENT_CHARACTER)),
            NoncharacterHandling::Skip => Ok(Step::Skip),
        };
    }
    Ok(Step::Push(c))
}
