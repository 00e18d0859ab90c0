//! The push-style JSON parser and its document driver.
//!
//! [`parse`] drives the RFC 4627 grammar over a code-unit iterator and
//! pushes semantic events into the caller's sink. The parser owns its
//! scanners and scratch buffers; the sink owns whatever it builds. The
//! first diagnosed error ends the event stream for the current document,
//! reaches the sink through its error channel, and makes `parse` return
//! `false`.
//!
//! # Examples
//!
//! ```rust
//! use jsonpush::{RecordingSink, parse_str};
//!
//! let mut sink = RecordingSink::default();
//! assert!(parse_str(r#"{"key": [null, true, 3.14]}"#, &mut sink));
//! assert_eq!(sink.canonical(), r#"{"key":[null,true,3.14]}"#);
//! ```

use alloc::format;

use crate::encoding::{BomDetection, Encoding, detect_bom, detect_encoding};
use crate::error::{ErrorKind, ParseError};
use crate::input::Cursor;
use crate::logger::Logger;
use crate::number::NumberScanner;
use crate::options::ParserOptions;
use crate::sink::SemanticActions;
use crate::string::StringScanner;

/// Parses JSON text from an iterator of bytes in the given source encoding.
///
/// Configuration is read from the sink before the grammar is entered.
/// Returns `true` on success; on failure the error was delivered through
/// the sink's error channel.
pub fn parse<I, S>(input: I, encoding: Encoding, sink: &mut S) -> bool
where
    I: IntoIterator<Item = u8>,
    S: SemanticActions,
{
    let options = sink.options();
    let mut parser = Parser {
        cursor: Cursor::new(input.into_iter(), encoding),
        logger: Logger::new(options.log_level),
        strings: StringScanner::new(),
        numbers: NumberScanner::new(),
        options,
        sink,
    };
    parser.run()
}

/// Parses a UTF-8 string slice. Convenience wrapper over [`parse`].
pub fn parse_str<S>(text: &str, sink: &mut S) -> bool
where
    S: SemanticActions,
{
    parse(text.bytes(), Encoding::Utf8, sink)
}

/// Parses a byte slice, identifying the source encoding first.
///
/// A byte-order mark, when present, selects the encoding and is skipped;
/// otherwise the zero-byte heuristic of [`detect_encoding`] applies.
pub fn parse_with_detection<S>(input: &[u8], sink: &mut S) -> bool
where
    S: SemanticActions,
{
    match detect_bom(input) {
        BomDetection::Bom { encoding, length } => {
            parse(input[length..].iter().copied(), encoding, sink)
        }
        BomDetection::Absent | BomDetection::UnexpectedEof => {
            parse(input.iter().copied(), detect_encoding(input), sink)
        }
    }
}

/// Disposition of the input after a successful document.
enum Trailing {
    /// Clean end of input.
    End,
    /// An out-of-bound U+0000 follows; worth a warning, not an error.
    UnicodeNull,
    /// Non-whitespace input remains. Carries the first pending character
    /// when it decoded cleanly.
    More(Option<char>),
}

struct Parser<'s, I, S> {
    cursor: Cursor<I>,
    sink: &'s mut S,
    options: ParserOptions,
    logger: Logger,
    strings: StringScanner,
    numbers: NumberScanner,
}

impl<I, S> Parser<'_, I, S>
where
    I: Iterator<Item = u8>,
    S: SemanticActions,
{
    fn run(&mut self) -> bool {
        let result = self.parse_documents();
        self.sink.finished();
        match result {
            Ok(()) => {
                self.logger.info(format_args!("parse completed"));
                true
            }
            Err(err) => {
                self.logger.error(format_args!("parse failed: {err}"));
                false
            }
        }
    }

    /// The driver loop: one iteration per document.
    fn parse_documents(&mut self) -> Result<(), ParseError> {
        let mut count = 0usize;
        loop {
            count += 1;
            self.logger
                .debug(format_args!("start parsing document {count}"));
            self.sink.parse_begin();
            match self.parse_document() {
                Ok(()) => {
                    self.sink.parse_end();
                    self.logger
                        .debug(format_args!("finished parsing document {count}"));
                }
                Err(err) => {
                    self.sink.error(&err);
                    self.sink.parse_end();
                    return Err(err);
                }
            }
            match self.after_document() {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(err) => {
                    self.sink.error(&err);
                    return Err(err);
                }
            }
        }
    }

    /// Parses one JSON text. The top-level value must be an object or an
    /// array.
    fn parse_document(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace()?;
        match self.cursor.peek()? {
            None => Err(self.error(ErrorKind::EmptyText, "no document in input")),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(c) => Err(self.error(
                ErrorKind::ExpectedArrayOrObject,
                format!("document starts with '{c}'"),
            )),
        }
    }

    /// Decides whether another document follows, mirroring the original
    /// multi-document loop: trailing JSON whitespace is skipped; an
    /// out-of-bound U+0000 or end of input terminates cleanly.
    fn after_document(&mut self) -> Result<bool, ParseError> {
        let multiple = self.options.parse_multiple_documents;
        let ignore = self.options.ignore_spurious_trailing_bytes;

        if !multiple && ignore {
            return Ok(false);
        }

        let trailing = match self.skip_whitespace() {
            // Ill-formed trailing bytes are spurious input, not a document
            // error.
            Err(_) => Trailing::More(None),
            Ok(()) => match self.cursor.peek() {
                Err(_) => Trailing::More(None),
                Ok(None) => Trailing::End,
                Ok(Some('\0')) => Trailing::UnicodeNull,
                Ok(Some(c)) => Trailing::More(Some(c)),
            },
        };

        match trailing {
            Trailing::End => Ok(false),
            Trailing::UnicodeNull => {
                self.logger.warning(format_args!(
                    "detected out-of-bound Unicode NUL (U+0000) after valid JSON"
                ));
                Ok(false)
            }
            Trailing::More(next) => {
                if multiple {
                    if ignore && !matches!(next, Some('{' | '[')) {
                        self.logger.debug(format_args!(
                            "detected out-of-bound characters after valid JSON"
                        ));
                        return Ok(false);
                    }
                    Ok(true)
                } else {
                    Err(self.error(
                        ErrorKind::ExtraCharactersAtEnd,
                        "non-whitespace input after document",
                    ))
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<(), ParseError> {
        if self.sink.is_canceled() {
            return Err(self.error(ErrorKind::Canceled, "canceled by sink"));
        }
        match self.cursor.peek()? {
            None => Err(self.unexpected_end("expected a value")),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => self.parse_string_value(),
            Some(c @ ('t' | 'f' | 'n')) => {
                self.cursor.bump()?;
                self.parse_literal(c)
            }
            Some('-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(self.error(ErrorKind::ExpectedValue, format!("found '{c}'"))),
        }
    }

    fn parse_array(&mut self) -> Result<(), ParseError> {
        self.cursor.bump()?; // '['
        self.sink.begin_array();
        self.skip_whitespace()?;
        if matches!(self.cursor.peek()?, Some(']')) {
            self.cursor.bump()?;
            self.sink.end_array();
            return Ok(());
        }
        let mut index = 0usize;
        loop {
            self.sink.begin_value_at_index(index);
            self.parse_value()?;
            self.sink.end_value_at_index(index);
            index += 1;
            self.skip_whitespace()?;
            match self.cursor.peek()? {
                Some(',') => {
                    self.cursor.bump()?;
                    self.skip_whitespace()?;
                }
                Some(']') => {
                    self.cursor.bump()?;
                    self.sink.end_array();
                    return Ok(());
                }
                None => return Err(self.unexpected_end("unterminated array")),
                Some(c) => {
                    return Err(self.error(
                        ErrorKind::ExpectedTokenArrayEnd,
                        format!("expected ',' or ']', found '{c}'"),
                    ));
                }
            }
        }
    }

    fn parse_object(&mut self) -> Result<(), ParseError> {
        self.cursor.bump()?; // '{'
        self.sink.begin_object();
        self.skip_whitespace()?;
        if matches!(self.cursor.peek()?, Some('}')) {
            self.cursor.bump()?;
            return self.close_object();
        }
        let mut nth = 0usize;
        loop {
            match self.cursor.peek()? {
                Some('"') => {}
                None => return Err(self.unexpected_end("unterminated object")),
                Some(c) => {
                    return Err(self.error(
                        ErrorKind::ExpectedString,
                        format!("object keys must be strings, found '{c}'"),
                    ));
                }
            }
            self.cursor.bump()?; // '"'
            let key = {
                let Parser {
                    strings,
                    cursor,
                    options,
                    ..
                } = self;
                strings.scan_key(cursor, options)?
            };
            self.sink.begin_key_value_pair(&key, nth);
            self.skip_whitespace()?;
            match self.cursor.peek()? {
                Some(':') => {
                    self.cursor.bump()?;
                }
                None => return Err(self.unexpected_end("unterminated object member")),
                Some(c) => {
                    return Err(self.error(
                        ErrorKind::ExpectedTokenKeyValueSep,
                        format!("expected ':', found '{c}'"),
                    ));
                }
            }
            self.skip_whitespace()?;
            self.parse_value()?;
            self.sink.end_key_value_pair(&key, nth);
            nth += 1;
            self.skip_whitespace()?;
            match self.cursor.peek()? {
                Some(',') => {
                    self.cursor.bump()?;
                    self.skip_whitespace()?;
                }
                Some('}') => {
                    self.cursor.bump()?;
                    return self.close_object();
                }
                None => return Err(self.unexpected_end("unterminated object")),
                Some(c) => {
                    return Err(self.error(
                        ErrorKind::ExpectedTokenObjectEnd,
                        format!("expected ',' or '}}', found '{c}'"),
                    ));
                }
            }
        }
    }

    fn close_object(&mut self) -> Result<(), ParseError> {
        let accepted = self.sink.end_object();
        if self.options.check_duplicate_keys && !accepted {
            return Err(self.error(ErrorKind::JsonKeyExists, "duplicate key in object"));
        }
        Ok(())
    }

    fn parse_string_value(&mut self) -> Result<(), ParseError> {
        self.cursor.bump()?; // '"'
        let Parser {
            strings,
            cursor,
            sink,
            options,
            ..
        } = self;
        strings.scan_value(cursor, options, |fragment, has_more| {
            sink.value_string(fragment, has_more);
        })
    }

    fn parse_number(&mut self) -> Result<(), ParseError> {
        let Parser {
            numbers,
            cursor,
            sink,
            options,
            ..
        } = self;
        let description = numbers.scan(cursor, &options.extensions)?;
        sink.value_number(&description);
        Ok(())
    }

    /// Matches the remainder of `true`, `false`, or `null`; `first` has
    /// been consumed.
    fn parse_literal(&mut self, first: char) -> Result<(), ParseError> {
        let (rest, value) = match first {
            'n' => ("ull", None),
            't' => ("rue", Some(true)),
            _ => ("alse", Some(false)),
        };
        for expected in rest.chars() {
            match self.cursor.peek()? {
                None => return Err(self.unexpected_end("truncated literal")),
                Some(c) if c == expected => {
                    self.cursor.bump()?;
                }
                Some(c) => {
                    return Err(self.error(
                        ErrorKind::ExpectedValue,
                        format!("invalid literal character '{c}'"),
                    ));
                }
            }
        }
        match value {
            Some(b) => self.sink.value_boolean(b),
            None => self.sink.value_null(),
        }
        Ok(())
    }

    /// Skips JSON whitespace; with the comments extension, C and C++ style
    /// comments count as whitespace.
    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.peek()? {
                Some(' ' | '\t' | '\n' | '\r') => {
                    self.cursor.bump()?;
                }
                Some('/') if self.options.extensions.allow_comments => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        self.cursor.bump()?; // '/'
        match self.cursor.peek()? {
            Some('/') => {
                self.cursor.bump()?;
                loop {
                    match self.cursor.bump()? {
                        None | Some('\n') => return Ok(()),
                        Some(_) => {}
                    }
                }
            }
            Some('*') => {
                self.cursor.bump()?;
                let mut star = false;
                loop {
                    match self.cursor.bump()? {
                        None => return Err(self.unexpected_end("unterminated comment")),
                        Some('*') => star = true,
                        Some('/') if star => return Ok(()),
                        Some(_) => star = false,
                    }
                }
            }
            _ => Err(self.error(ErrorKind::Syntax, "expected '//' or '/*' comment")),
        }
    }

    fn error(&self, kind: ErrorKind, description: impl Into<alloc::string::String>) -> ParseError {
        ParseError::new(kind, description, self.cursor.consumed())
    }

    fn unexpected_end(&self, context: &str) -> ParseError {
        ParseError::new(
            ErrorKind::UnexpectedEnd,
            format!("input ended: {context}"),
            self.cursor.consumed(),
        )
    }
}
