//! A sink that records statistics and a canonical re-serialization.

use alloc::string::String;
use core::fmt::Write as _;

use crate::error::ParseError;
use crate::number::NumberDescription;
use crate::options::ParserOptions;
use crate::sink::SemanticActions;

/// Counts events, tracks nesting depth, and re-serializes the event stream
/// into a canonical compact form.
///
/// The canonical form strips whitespace, echoes numbers exactly as they
/// appeared in the source, and normalizes string escapes (the two-character
/// escapes for quote, backslash, backspace, form feed, line feed, carriage
/// return and tab; `\u00xx` for the remaining control characters). Multiple
/// documents are separated by a single newline. The round-trip tests rely
/// on this form.
///
/// # Examples
///
/// ```rust
/// use jsonpush::{RecordingSink, parse_str};
///
/// let mut sink = RecordingSink::default();
/// assert!(parse_str(" [ 1 , true , \"x\" ] ", &mut sink));
/// assert_eq!(sink.canonical(), "[1,true,\"x\"]");
/// assert_eq!(sink.arrays(), 1);
/// assert_eq!(sink.numbers(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    options: ParserOptions,
    arrays: usize,
    objects: usize,
    strings: usize,
    numbers: usize,
    booleans: usize,
    nulls: usize,
    keys: usize,
    documents: usize,
    depth: usize,
    max_depth: usize,
    canonical: String,
    in_string: bool,
    error: Option<ParseError>,
}

impl RecordingSink {
    /// Creates a recording sink with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Completed arrays plus arrays currently open.
    #[must_use]
    pub fn arrays(&self) -> usize {
        self.arrays
    }

    /// Objects seen.
    #[must_use]
    pub fn objects(&self) -> usize {
        self.objects
    }

    /// Logical string values seen (chunked strings count once).
    #[must_use]
    pub fn strings(&self) -> usize {
        self.strings
    }

    /// Numbers seen.
    #[must_use]
    pub fn numbers(&self) -> usize {
        self.numbers
    }

    /// Boolean literals seen.
    #[must_use]
    pub fn booleans(&self) -> usize {
        self.booleans
    }

    /// Null literals seen.
    #[must_use]
    pub fn nulls(&self) -> usize {
        self.nulls
    }

    /// Object members seen.
    #[must_use]
    pub fn keys(&self) -> usize {
        self.keys
    }

    /// Documents started.
    #[must_use]
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Deepest container nesting observed.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The canonical re-serialization of everything parsed so far.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The first error reported by the parser, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.canonical.push_str("\\\""),
                '\\' => self.canonical.push_str("\\\\"),
                '\x08' => self.canonical.push_str("\\b"),
                '\x0C' => self.canonical.push_str("\\f"),
                '\n' => self.canonical.push_str("\\n"),
                '\r' => self.canonical.push_str("\\r"),
                '\t' => self.canonical.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.canonical, "\\u{:04x}", c as u32);
                }
                c => self.canonical.push(c),
            }
        }
    }

    fn open_container(&mut self, delimiter: char) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.canonical.push(delimiter);
    }
}

impl SemanticActions for RecordingSink {
    fn options(&self) -> ParserOptions {
        self.options
    }

    fn parse_begin(&mut self) {
        self.documents += 1;
        if !self.canonical.is_empty() {
            self.canonical.push('\n');
        }
    }

    fn begin_array(&mut self) {
        self.arrays += 1;
        self.open_container('[');
    }

    fn end_array(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.canonical.push(']');
    }

    fn begin_object(&mut self) {
        self.objects += 1;
        self.open_container('{');
    }

    fn end_object(&mut self) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.canonical.push('}');
        true
    }

    fn begin_value_at_index(&mut self, index: usize) {
        if index > 0 {
            self.canonical.push(',');
        }
    }

    fn begin_key_value_pair(&mut self, key: &str, nth: usize) {
        self.keys += 1;
        if nth > 0 {
            self.canonical.push(',');
        }
        self.canonical.push('"');
        self.write_escaped(key);
        self.canonical.push_str("\":");
    }

    fn value_string(&mut self, fragment: &str, has_more: bool) {
        if !self.in_string {
            self.canonical.push('"');
            self.in_string = true;
        }
        self.write_escaped(fragment);
        if !has_more {
            self.canonical.push('"');
            self.in_string = false;
            self.strings += 1;
        }
    }

    fn value_number(&mut self, number: &NumberDescription<'_>) {
        self.numbers += 1;
        self.canonical.push_str(number.text());
    }

    fn value_boolean(&mut self, value: bool) {
        self.booleans += 1;
        self.canonical.push_str(if value { "true" } else { "false" });
    }

    fn value_null(&mut self) {
        self.nulls += 1;
        self.canonical.push_str("null");
    }

    fn error(&mut self, error: &ParseError) {
        if self.error.is_none() {
            self.error = Some(error.clone());
        }
    }
}
