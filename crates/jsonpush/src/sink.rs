//! The semantic-actions contract between the parser and its consumer.
//!
//! The parser is a pure event producer: it never builds a document. A sink
//! implements [`SemanticActions`] and decides what to construct — a DOM
//! tree, a validator, a transformer. Every method has a default no-op body,
//! so a sink only overrides the events it cares about. Dispatch is static:
//! the parser is generic over the sink type.

use crate::error::ParseError;
use crate::number::NumberDescription;
use crate::options::ParserOptions;

/// Consumer of parse events.
///
/// Buffers passed to the sink (`key`, string fragments, number text) borrow
/// the parser's scratch storage and are valid only for the duration of the
/// call; copy what must persist.
///
/// # Event order
///
/// For each document: `parse_begin`, the value events, `parse_end`. After
/// the last document of a parse, `finished` is delivered exactly once.
/// Within an array, element `i` is bracketed by `begin_value_at_index(i)` /
/// `end_value_at_index(i)` with indices 0, 1, 2, …; within an object,
/// member `n` is bracketed by `begin_key_value_pair(key, n)` /
/// `end_key_value_pair(key, n)`. A value string arrives as one or more
/// `value_string` calls; every call but the last has `has_more = true`.
/// Keys are never chunked.
///
/// # Examples
///
/// ```rust
/// use jsonpush::{Encoding, SemanticActions, parse};
///
/// #[derive(Default)]
/// struct KeyLister {
///     keys: Vec<String>,
/// }
///
/// impl SemanticActions for KeyLister {
///     fn begin_key_value_pair(&mut self, key: &str, _nth: usize) {
///         self.keys.push(key.to_owned());
///     }
/// }
///
/// let mut sink = KeyLister::default();
/// assert!(parse(br#"{"a":1,"b":2}"#.iter().copied(), Encoding::Utf8, &mut sink));
/// assert_eq!(sink.keys, ["a", "b"]);
/// ```
pub trait SemanticActions {
    /// Configuration the parser reads once before entering the grammar.
    fn options(&self) -> ParserOptions {
        ParserOptions::default()
    }

    /// A document is about to be parsed.
    fn parse_begin(&mut self) {}

    /// The current document is complete (or has failed; the error event
    /// precedes this one).
    fn parse_end(&mut self) {}

    /// All documents have been processed.
    fn finished(&mut self) {}

    /// A `[` was consumed.
    fn begin_array(&mut self) {}

    /// The matching `]` was consumed.
    fn end_array(&mut self) {}

    /// A `{` was consumed.
    fn begin_object(&mut self) {}

    /// The matching `}` was consumed. Return `false` to signal a duplicate
    /// key; with `check_duplicate_keys` set, the parser then fails with
    /// `JsonKeyExists`.
    fn end_object(&mut self) -> bool {
        true
    }

    /// An array element at zero-based `index` begins.
    fn begin_value_at_index(&mut self, index: usize) {
        let _ = index;
    }

    /// The array element at `index` is complete.
    fn end_value_at_index(&mut self, index: usize) {
        let _ = index;
    }

    /// An object member with `key` at zero-based ordinal `nth` begins. The
    /// key is delivered whole, never chunked.
    fn begin_key_value_pair(&mut self, key: &str, nth: usize) {
        let _ = (key, nth);
    }

    /// The member with `key` at ordinal `nth` is complete.
    fn end_key_value_pair(&mut self, key: &str, nth: usize) {
        let _ = (key, nth);
    }

    /// A decoded string fragment. `has_more` is `true` while further
    /// fragments of the same logical string follow; concatenate in order.
    fn value_string(&mut self, fragment: &str, has_more: bool) {
        let _ = (fragment, has_more);
    }

    /// A number, described without loss of source digits.
    fn value_number(&mut self, number: &NumberDescription<'_>) {
        let _ = number;
    }

    /// A `true` or `false` literal.
    fn value_boolean(&mut self, value: bool) {
        let _ = value;
    }

    /// A `null` literal.
    fn value_null(&mut self) {}

    /// The parser diagnosed an error. No further value events follow for
    /// the current document.
    fn error(&mut self, error: &ParseError) {
        let _ = error;
    }

    /// Polled at value boundaries; return `true` to stop the parse with
    /// `Canceled`.
    fn is_canceled(&self) -> bool {
        false
    }
}

/// A sink that validates only.
///
/// Consumes every event, builds nothing, and retains the first reported
/// error for inspection.
#[derive(Debug, Default)]
pub struct NullSink {
    options: ParserOptions,
    error: Option<ParseError>,
}

impl NullSink {
    /// Creates a validating sink with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            error: None,
        }
    }

    /// The first error reported by the parser, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }
}

impl SemanticActions for NullSink {
    fn options(&self) -> ParserOptions {
        self.options
    }

    fn error(&mut self, error: &ParseError) {
        if self.error.is_none() {
            self.error = Some(error.clone());
        }
    }
}
