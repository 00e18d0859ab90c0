#![allow(clippy::struct_excessive_bools)]

//! Parser configuration carried by the semantic-actions sink.

use crate::logger::LogLevel;

/// What to do when a Unicode noncharacter appears inside a string.
///
/// Noncharacters are the code points `U+FDD0..=U+FDEF` and every code point
/// whose low 16 bits are `FFFE` or `FFFF`. They are valid scalar values but
/// reserved for internal use and not meant for interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoncharacterHandling {
    /// Fail the parse with `UnicodeNoncharacter`.
    #[default]
    SignalError,
    /// Pass the noncharacter through to the sink unchanged.
    Retain,
    /// Replace the noncharacter with U+FFFD.
    Substitute,
    /// Drop the noncharacter from the decoded string.
    Skip,
}

/// What to do when U+0000 appears inside a string.
///
/// Orthogonal to [`NoncharacterHandling`] and to the control-character
/// extension: a NUL is governed by this policy alone, whether it arrived as
/// a raw character or as a `\u0000` escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHandling {
    /// Fail the parse with `UnicodeNullNotAllowed`.
    #[default]
    SignalError,
    /// Pass the NUL through to the sink unchanged.
    Retain,
    /// Replace the NUL with U+FFFD.
    Substitute,
    /// Drop the NUL from the decoded string.
    Skip,
}

/// Non-conformance extensions. All default to off, which yields a strict
/// RFC 4627 parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extensions {
    /// Treat C and C++ style comments as whitespace.
    pub allow_comments: bool,
    /// Accept raw control characters (U+0001..=U+001F) inside strings.
    /// U+0000 remains governed by [`NullHandling`].
    pub allow_control_characters: bool,
    /// Accept a leading `+` on numbers.
    pub allow_leading_plus_in_numbers: bool,
    /// Accept leading zeros in the integer part of numbers, e.g. `007`.
    pub allow_leading_zeros_in_integers: bool,
}

/// Configuration read from the sink before the parser enters the grammar.
///
/// # Examples
///
/// ```rust
/// use jsonpush::{NullHandling, ParserOptions};
///
/// let options = ParserOptions {
///     parse_multiple_documents: true,
///     null_handling: NullHandling::Substitute,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    /// Policy for Unicode noncharacters in strings.
    pub noncharacter_handling: NoncharacterHandling,

    /// Policy for U+0000 in strings.
    pub null_handling: NullHandling,

    /// Keep parsing whitespace-separated documents until end of input.
    ///
    /// Supports concatenated documents and line-delimited streams. Each
    /// document is bracketed by `parse_begin` / `parse_end` on the sink.
    pub parse_multiple_documents: bool,

    /// Tolerate non-whitespace input after a complete document instead of
    /// reporting `ExtraCharactersAtEnd`.
    ///
    /// In multiple-document mode this stops the loop cleanly when the
    /// remaining input does not start another document.
    pub ignore_spurious_trailing_bytes: bool,

    /// Honor the sink's duplicate-key verdict.
    ///
    /// When set and `end_object` returns `false`, the parse fails with
    /// `JsonKeyExists`.
    pub check_duplicate_keys: bool,

    /// Non-conformance extensions.
    pub extensions: Extensions,

    /// Maximum severity of log events emitted during the parse.
    pub log_level: LogLevel,
}
