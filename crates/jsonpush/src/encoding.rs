//! Source encoding identification and code-point decoding.
//!
//! The parser consumes Unicode text in one of five encoding schemes: UTF-8,
//! UTF-16 and UTF-32 in both endiannesses. This module identifies the scheme
//! of a byte stream (by BOM or by a zero-byte heuristic) and decodes one
//! scalar value at a time, rejecting ill-formed sequences at the first
//! offending code unit.

use alloc::format;
use alloc::string::String;

use bstr::BStr;

use crate::error::ErrorKind;

/// A source encoding scheme.
///
/// The encoding is fixed for the lifetime of a parse; dispatch happens once
/// at parser construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// UTF-8.
    Utf8,
    /// UTF-16, little-endian.
    Utf16Le,
    /// UTF-16, big-endian.
    Utf16Be,
    /// UTF-32, little-endian.
    Utf32Le,
    /// UTF-32, big-endian.
    Utf32Be,
}

impl Encoding {
    /// Width of one code unit in bytes.
    #[must_use]
    pub const fn unit_width(self) -> usize {
        match self {
            Encoding::Utf8 => 1,
            Encoding::Utf16Le | Encoding::Utf16Be => 2,
            Encoding::Utf32Le | Encoding::Utf32Be => 4,
        }
    }

    /// The conventional name of the scheme, e.g. `"UTF-16LE"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Be => "UTF-32BE",
        }
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of [`detect_bom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomDetection {
    /// A byte-order mark was found; `length` bytes belong to it.
    Bom {
        /// The encoding identified by the mark.
        encoding: Encoding,
        /// Number of leading bytes occupied by the mark.
        length: usize,
    },
    /// The input does not start with a byte-order mark.
    Absent,
    /// The input ended while it was still a proper prefix of a mark.
    UnexpectedEof,
}

/// Looks for a byte-order mark at the start of `input`.
///
/// The four-byte UTF-32 marks are tested before the two-byte UTF-16 marks
/// they contain as prefixes: `FF FE 00 00` is UTF-32LE even though it begins
/// with a valid UTF-16LE mark. A bare `FF FE` at end of input is reported as
/// UTF-16LE (a mark followed by an empty document).
///
/// # Examples
///
/// ```rust
/// use jsonpush::{BomDetection, Encoding, detect_bom};
///
/// assert_eq!(
///     detect_bom(&[0xEF, 0xBB, 0xBF, b'{', b'}']),
///     BomDetection::Bom { encoding: Encoding::Utf8, length: 3 }
/// );
/// assert_eq!(detect_bom(b"{}"), BomDetection::Absent);
/// ```
#[must_use]
pub fn detect_bom(input: &[u8]) -> BomDetection {
    let bom = |encoding, length| BomDetection::Bom { encoding, length };
    match *input {
        [] => BomDetection::UnexpectedEof,
        [0x00, 0x00, 0xFE, 0xFF, ..] => bom(Encoding::Utf32Be, 4),
        [0xFF, 0xFE, 0x00, 0x00, ..] => bom(Encoding::Utf32Le, 4),
        [0xEF, 0xBB, 0xBF, ..] => bom(Encoding::Utf8, 3),
        [0xFE, 0xFF, ..] => bom(Encoding::Utf16Be, 2),
        // `FF FE 00` could still complete to the UTF-32LE mark.
        [0xFF, 0xFE, 0x00] => BomDetection::UnexpectedEof,
        [0xFF, 0xFE, ..] => bom(Encoding::Utf16Le, 2),
        [0x00] | [0x00, 0x00] | [0x00, 0x00, 0xFE] => BomDetection::UnexpectedEof,
        [0xFF] | [0xFE] | [0xEF] | [0xEF, 0xBB] => BomDetection::UnexpectedEof,
        _ => BomDetection::Absent,
    }
}

/// Infers the encoding of BOM-less input from the zero-byte pattern of its
/// first four bytes, assuming the first character is ASCII (in JSON it is).
///
/// Falls back to UTF-8 whenever the pattern is ambiguous or the input is
/// shorter than the pattern requires.
#[must_use]
pub fn detect_encoding(input: &[u8]) -> Encoding {
    match *input {
        [0, 0, 0, b, ..] if b != 0 => Encoding::Utf32Be,
        [b, 0, 0, 0, ..] if b != 0 => Encoding::Utf32Le,
        [0, b, ..] if b != 0 => Encoding::Utf16Be,
        [b, 0, ..] if b != 0 => Encoding::Utf16Le,
        _ => Encoding::Utf8,
    }
}

/// Whether `code_point` is a Unicode noncharacter.
///
/// Noncharacters are `U+FDD0..=U+FDEF` and every code point whose low 16
/// bits are `FFFE` or `FFFF`. They are valid scalar values but reserved as
/// never-interchanged.
#[must_use]
pub const fn is_noncharacter(code_point: u32) -> bool {
    (code_point >= 0xFDD0 && code_point <= 0xFDEF) || (code_point & 0xFFFF) >= 0xFFFE
}

/// A decode failure, to be completed into a `ParseError` with the cursor's
/// consumed-unit count.
#[derive(Debug)]
pub(crate) struct DecodeFailure {
    pub kind: ErrorKind,
    pub description: String,
}

/// Decodes one scalar value from `bytes`.
///
/// Returns `None` at a clean end of input (no pending bytes), otherwise the
/// decoded `char` together with the number of code units it occupied in the
/// source, or the failure describing the ill-formed sequence.
pub(crate) fn decode_scalar<I>(
    encoding: Encoding,
    bytes: &mut I,
) -> Option<Result<(char, usize), DecodeFailure>>
where
    I: Iterator<Item = u8>,
{
    match encoding {
        Encoding::Utf8 => decode_utf8(bytes),
        Encoding::Utf16Le => decode_utf16(bytes, false),
        Encoding::Utf16Be => decode_utf16(bytes, true),
        Encoding::Utf32Le => decode_utf32(bytes, false),
        Encoding::Utf32Be => decode_utf32(bytes, true),
    }
}

fn ill_formed(description: String) -> DecodeFailure {
    DecodeFailure {
        kind: ErrorKind::IllformedUnicodeSequence,
        description,
    }
}

fn scalar(code_point: u32, units: usize) -> Result<(char, usize), DecodeFailure> {
    // Callers have already range- and surrogate-checked `code_point`.
    match char::from_u32(code_point) {
        Some(c) => Ok((c, units)),
        None => Err(DecodeFailure {
            kind: ErrorKind::InternalLogic,
            description: format!("validated code point U+{code_point:04X} did not convert"),
        }),
    }
}

fn decode_utf8<I>(bytes: &mut I) -> Option<Result<(char, usize), DecodeFailure>>
where
    I: Iterator<Item = u8>,
{
    let lead = bytes.next()?;
    if lead < 0x80 {
        return Some(scalar(u32::from(lead), 1));
    }

    // Lead bytes C0, C1, and F5..FF never occur in well-formed UTF-8; C2..DF,
    // E0..EF, F0..F4 open two-, three-, and four-byte sequences.
    let (len, min) = match lead {
        0xC2..=0xDF => (2usize, 0x80u32),
        0xE0..=0xEF => (3, 0x800),
        0xF0..=0xF4 => (4, 0x1_0000),
        _ => {
            return Some(Err(ill_formed(format!(
                "ill-formed UTF-8 sequence {:?}",
                BStr::new(&[lead])
            ))));
        }
    };

    let mut seq = [lead, 0, 0, 0];
    let mut code_point = u32::from(lead & (0x7F >> len));
    for i in 1..len {
        let Some(trail) = bytes.next() else {
            return Some(Err(ill_formed(format!(
                "truncated UTF-8 sequence {:?}",
                BStr::new(&seq[..i])
            ))));
        };
        seq[i] = trail;
        if trail & 0xC0 != 0x80 {
            return Some(Err(ill_formed(format!(
                "ill-formed UTF-8 sequence {:?}",
                BStr::new(&seq[..=i])
            ))));
        }
        code_point = code_point << 6 | u32::from(trail & 0x3F);
    }

    // `min` rejects over-long encodings; the rest rejects surrogates and
    // values beyond the scalar range.
    if code_point < min || code_point > 0x10_FFFF || (0xD800..=0xDFFF).contains(&code_point) {
        return Some(Err(ill_formed(format!(
            "ill-formed UTF-8 sequence {:?}",
            BStr::new(&seq[..len])
        ))));
    }

    Some(scalar(code_point, len))
}

fn read_u16<I>(bytes: &mut I, big_endian: bool) -> Option<Result<u16, DecodeFailure>>
where
    I: Iterator<Item = u8>,
{
    let b0 = bytes.next()?;
    let Some(b1) = bytes.next() else {
        return Some(Err(ill_formed(format!(
            "truncated UTF-16 code unit, lone byte 0x{b0:02X}"
        ))));
    };
    let unit = if big_endian {
        u16::from(b0) << 8 | u16::from(b1)
    } else {
        u16::from(b1) << 8 | u16::from(b0)
    };
    Some(Ok(unit))
}

fn decode_utf16<I>(bytes: &mut I, big_endian: bool) -> Option<Result<(char, usize), DecodeFailure>>
where
    I: Iterator<Item = u8>,
{
    let first = match read_u16(bytes, big_endian)? {
        Ok(unit) => unit,
        Err(failure) => return Some(Err(failure)),
    };
    match first {
        0xD800..=0xDBFF => {
            let second = match read_u16(bytes, big_endian) {
                Some(Ok(unit)) => unit,
                Some(Err(failure)) => return Some(Err(failure)),
                None => {
                    return Some(Err(ill_formed(format!(
                        "unpaired high surrogate 0x{first:04X} at end of input"
                    ))));
                }
            };
            if !(0xDC00..=0xDFFF).contains(&second) {
                return Some(Err(ill_formed(format!(
                    "high surrogate 0x{first:04X} followed by 0x{second:04X}"
                ))));
            }
            let code_point =
                0x1_0000 + ((u32::from(first) - 0xD800) << 10 | (u32::from(second) - 0xDC00));
            Some(scalar(code_point, 2))
        }
        0xDC00..=0xDFFF => Some(Err(ill_formed(format!(
            "unpaired low surrogate 0x{first:04X}"
        )))),
        unit => Some(scalar(u32::from(unit), 1)),
    }
}

fn decode_utf32<I>(bytes: &mut I, big_endian: bool) -> Option<Result<(char, usize), DecodeFailure>>
where
    I: Iterator<Item = u8>,
{
    let b0 = bytes.next()?;
    let mut rest = [0u8; 3];
    for (i, slot) in rest.iter_mut().enumerate() {
        let Some(b) = bytes.next() else {
            return Some(Err(ill_formed(format!(
                "truncated UTF-32 code unit after {} bytes",
                i + 1
            ))));
        };
        *slot = b;
    }
    let code_point = if big_endian {
        u32::from_be_bytes([b0, rest[0], rest[1], rest[2]])
    } else {
        u32::from_le_bytes([b0, rest[0], rest[1], rest[2]])
    };
    if code_point > 0x10_FFFF || (0xD800..=0xDFFF).contains(&code_point) {
        return Some(Err(ill_formed(format!(
            "UTF-32 value 0x{code_point:08X} is not a Unicode scalar"
        ))));
    }
    Some(scalar(code_point, 1))
}
