//! A push-style streaming JSON parser.
//!
//! The parser consumes code units in a configurable source encoding (UTF-8,
//! UTF-16, or UTF-32 in either endianness) and pushes a linear stream of
//! semantic events — containers, keys, chunked strings, classified numbers,
//! literals — into a caller-supplied [`SemanticActions`] sink. The sink
//! decides what to build; the parser never materializes a document.
//!
//! # Examples
//!
//! ```rust
//! use jsonpush::{RecordingSink, parse_str};
//!
//! let mut sink = RecordingSink::default();
//! assert!(parse_str(r#"{"a": [1, true, null]}"#, &mut sink));
//! assert_eq!(sink.canonical(), r#"{"a":[1,true,null]}"#);
//! assert_eq!(sink.max_depth(), 2);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod encoding;
mod error;
mod escape;
mod input;
mod logger;
mod number;
mod options;
mod parser;
mod recording;
mod sink;
mod string;

#[cfg(test)]
mod tests;

pub use encoding::{BomDetection, Encoding, detect_bom, detect_encoding, is_noncharacter};
pub use error::{ErrorKind, ParseError};
#[cfg(feature = "std")]
pub use input::ReadBytes;
pub use logger::LogLevel;
pub use number::{NumberDescription, NumberKind};
pub use options::{Extensions, NoncharacterHandling, NullHandling, ParserOptions};
pub use parser::{parse, parse_str, parse_with_detection};
pub use recording::RecordingSink;
pub use sink::{NullSink, SemanticActions};
