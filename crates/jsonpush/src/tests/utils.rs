//! Shared sinks and helpers for the test suite.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::ParseError;
use crate::number::NumberDescription;
use crate::options::ParserOptions;
use crate::parser::parse_str;
use crate::sink::{NullSink, SemanticActions};

/// Records every event as a readable line, for exact event-order
/// assertions.
#[derive(Debug, Default)]
pub(crate) struct TraceSink {
    pub options: ParserOptions,
    pub events: Vec<String>,
    /// When set, report cancellation once this many complete values have
    /// been delivered.
    pub cancel_after_values: Option<usize>,
    pub values_seen: usize,
}

impl TraceSink {
    pub(crate) fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

impl SemanticActions for TraceSink {
    fn options(&self) -> ParserOptions {
        self.options
    }

    fn parse_begin(&mut self) {
        self.events.push("parse_begin".to_string());
    }

    fn parse_end(&mut self) {
        self.events.push("parse_end".to_string());
    }

    fn finished(&mut self) {
        self.events.push("finished".to_string());
    }

    fn begin_array(&mut self) {
        self.events.push("begin_array".to_string());
    }

    fn end_array(&mut self) {
        self.events.push("end_array".to_string());
    }

    fn begin_object(&mut self) {
        self.events.push("begin_object".to_string());
    }

    fn end_object(&mut self) -> bool {
        self.events.push("end_object".to_string());
        true
    }

    fn begin_value_at_index(&mut self, index: usize) {
        self.events.push(format!("begin_value {index}"));
    }

    fn end_value_at_index(&mut self, index: usize) {
        self.events.push(format!("end_value {index}"));
    }

    fn begin_key_value_pair(&mut self, key: &str, nth: usize) {
        self.events.push(format!("begin_pair {key} {nth}"));
    }

    fn end_key_value_pair(&mut self, key: &str, nth: usize) {
        self.events.push(format!("end_pair {key} {nth}"));
    }

    fn value_string(&mut self, fragment: &str, has_more: bool) {
        let suffix = if has_more { "more" } else { "final" };
        self.events.push(format!("string '{fragment}' {suffix}"));
        if !has_more {
            self.values_seen += 1;
        }
    }

    fn value_number(&mut self, number: &NumberDescription<'_>) {
        self.events.push(format!(
            "number {} {:?} digits={}",
            number.text(),
            number.kind(),
            number.digits()
        ));
        self.values_seen += 1;
    }

    fn value_boolean(&mut self, value: bool) {
        self.events.push(format!("boolean {value}"));
        self.values_seen += 1;
    }

    fn value_null(&mut self) {
        self.events.push("null".to_string());
        self.values_seen += 1;
    }

    fn error(&mut self, error: &ParseError) {
        self.events.push(format!("error {}", error.code()));
    }

    fn is_canceled(&self) -> bool {
        matches!(self.cancel_after_values, Some(n) if self.values_seen >= n)
    }
}

/// Validates and reports duplicate keys through the `end_object` verdict.
#[derive(Debug, Default)]
pub(crate) struct KeyCheckSink {
    pub options: ParserOptions,
    pub frames: Vec<(BTreeSet<String>, bool)>,
    pub error: Option<ParseError>,
}

impl SemanticActions for KeyCheckSink {
    fn options(&self) -> ParserOptions {
        self.options
    }

    fn begin_object(&mut self) {
        self.frames.push((BTreeSet::new(), false));
    }

    fn begin_key_value_pair(&mut self, key: &str, _nth: usize) {
        if let Some((seen, duplicate)) = self.frames.last_mut() {
            if !seen.insert(key.to_string()) {
                *duplicate = true;
            }
        }
    }

    fn end_object(&mut self) -> bool {
        self.frames.pop().is_none_or(|(_, duplicate)| !duplicate)
    }

    fn error(&mut self, error: &ParseError) {
        if self.error.is_none() {
            self.error = Some(error.clone());
        }
    }
}

/// Parses `text` with a [`TraceSink`] and asserts success.
pub(crate) fn trace(text: &str) -> Vec<String> {
    let mut sink = TraceSink::default();
    assert!(parse_str(text, &mut sink), "parse failed: {:?}", sink.events);
    sink.events
}

/// Parses `text` with a validating sink and returns the reported error.
pub(crate) fn expect_error(text: &str) -> ParseError {
    expect_error_with(ParserOptions::default(), text)
}

pub(crate) fn expect_error_with(options: ParserOptions, text: &str) -> ParseError {
    let mut sink = NullSink::new(options);
    assert!(!parse_str(text, &mut sink), "parse unexpectedly succeeded");
    sink.error().cloned().expect("no error recorded in sink")
}
