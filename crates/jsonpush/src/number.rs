//! JSON number recognition and classification.
//!
//! The scanner copies the exact source digit run into an owned scratch
//! buffer and hands the sink a [`NumberDescription`] borrowing that buffer.
//! The sink chooses the target numeric type from the classification and the
//! significant digit count without rescanning the text.

use alloc::format;
use alloc::string::String;

use crate::error::{ErrorKind, ParseError};
use crate::input::Cursor;
use crate::options::Extensions;

/// Largest accepted number literal, in bytes.
pub(crate) const NUMBER_MAX_LEN: usize = 512;

/// Classification of a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// No fraction, no exponent, no minus sign.
    UnsignedInteger,
    /// No fraction, no exponent, minus sign.
    Integer,
    /// Fraction but no exponent, no minus sign.
    UnsignedDecimal,
    /// Fraction but no exponent, minus sign.
    Decimal,
    /// Any exponent.
    Scientific,
}

impl NumberKind {
    /// Whether the source carried a minus sign.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            NumberKind::Integer | NumberKind::Decimal | NumberKind::Scientific
        )
    }

    /// Whether the number has neither fraction nor exponent.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, NumberKind::Integer | NumberKind::UnsignedInteger)
    }

    /// Whether the number has a fraction but no exponent.
    #[must_use]
    pub const fn is_decimal(self) -> bool {
        matches!(self, NumberKind::Decimal | NumberKind::UnsignedDecimal)
    }

    /// Whether the number has an exponent.
    #[must_use]
    pub const fn is_scientific(self) -> bool {
        matches!(self, NumberKind::Scientific)
    }
}

/// A recognized number, valid until the scanner's next call.
///
/// `text` is the exact source digit sequence (sign, integer part, optional
/// fraction, optional exponent) and is always pure ASCII. Sinks that need
/// the text beyond the current event must copy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberDescription<'a> {
    text: &'a str,
    kind: NumberKind,
    digits: u16,
}

impl NumberDescription<'_> {
    /// The source text of the number.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text
    }

    /// The classification.
    #[must_use]
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Significant digits in the integer and fraction parts combined.
    ///
    /// Leading zeros are not significant: `0.00123` has three digits,
    /// `100` has three, `0` has none. Exponent digits are never counted.
    #[must_use]
    pub fn digits(&self) -> u16 {
        self.digits
    }
}

/// Scanner state: one reusable ASCII scratch buffer.
#[derive(Debug)]
pub(crate) struct NumberScanner {
    buf: String,
}

impl NumberScanner {
    pub(crate) fn new() -> Self {
        Self {
            buf: String::with_capacity(32),
        }
    }

    /// Scans one number starting at the cursor's current position.
    ///
    /// Consumes up to, but not including, the first character that cannot
    /// belong to the number; the parser decides whether that character is a
    /// legal separator.
    pub(crate) fn scan<'a, I>(
        &'a mut self,
        cursor: &mut Cursor<I>,
        extensions: &Extensions,
    ) -> Result<NumberDescription<'a>, ParseError>
    where
        I: Iterator<Item = u8>,
    {
        self.buf.clear();
        let mut signed = false;
        let mut saw_point = false;
        let mut saw_exponent = false;
        let mut significant = false;
        let mut digits: u16 = 0;

        match cursor.peek()? {
            Some('-') => {
                signed = true;
                self.take(cursor, '-')?;
            }
            Some('+') => {
                if !extensions.allow_leading_plus_in_numbers {
                    return Err(bad_number(cursor, "leading '+' not allowed"));
                }
                self.take(cursor, '+')?;
            }
            _ => {}
        }

        match cursor.peek()? {
            Some('0') => {
                self.take(cursor, '0')?;
                if matches!(cursor.peek()?, Some(c) if c.is_ascii_digit()) {
                    if !extensions.allow_leading_zeros_in_integers {
                        return Err(bad_number(cursor, "leading zeros in integer part"));
                    }
                    digits = digits.saturating_add(self.digit_run(cursor, &mut significant)?);
                }
            }
            Some(c) if c.is_ascii_digit() => {
                digits = digits.saturating_add(self.digit_run(cursor, &mut significant)?);
            }
            Some('.') => return Err(bad_number(cursor, "missing integer part")),
            _ => return Err(bad_number(cursor, "missing digits")),
        }

        if matches!(cursor.peek()?, Some('.')) {
            saw_point = true;
            self.take(cursor, '.')?;
            if !matches!(cursor.peek()?, Some(c) if c.is_ascii_digit()) {
                return Err(bad_number(cursor, "missing digits after decimal point"));
            }
            digits = digits.saturating_add(self.digit_run(cursor, &mut significant)?);
        }

        if let Some(e) = cursor.peek()? {
            if e == 'e' || e == 'E' {
                saw_exponent = true;
                self.take(cursor, e)?;
                match cursor.peek()? {
                    Some(sign @ ('+' | '-')) => self.take(cursor, sign)?,
                    _ => {}
                }
                if !matches!(cursor.peek()?, Some(c) if c.is_ascii_digit()) {
                    return Err(bad_number(cursor, "missing exponent digits"));
                }
                // Exponent digits never count as significant.
                while let Some(c) = cursor.peek()? {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    self.take(cursor, c)?;
                }
            }
        }

        let kind = if saw_exponent {
            NumberKind::Scientific
        } else if saw_point {
            if signed {
                NumberKind::Decimal
            } else {
                NumberKind::UnsignedDecimal
            }
        } else if signed {
            NumberKind::Integer
        } else {
            NumberKind::UnsignedInteger
        };

        debug_assert!(self.buf.is_ascii());
        Ok(NumberDescription {
            text: &self.buf,
            kind,
            digits,
        })
    }

    /// Consumes the peeked character `c` and appends it to the scratch
    /// buffer, enforcing the buffer cap.
    fn take<I>(&mut self, cursor: &mut Cursor<I>, c: char) -> Result<(), ParseError>
    where
        I: Iterator<Item = u8>,
    {
        if self.buf.len() >= NUMBER_MAX_LEN {
            return Err(ParseError::new(
                ErrorKind::BadNumber,
                format!("number literal longer than {NUMBER_MAX_LEN} bytes"),
                cursor.consumed(),
            ));
        }
        cursor.bump()?;
        self.buf.push(c);
        Ok(())
    }

    fn digit_run<I>(
        &mut self,
        cursor: &mut Cursor<I>,
        significant: &mut bool,
    ) -> Result<u16, ParseError>
    where
        I: Iterator<Item = u8>,
    {
        let mut count: u16 = 0;
        while let Some(c) = cursor.peek()? {
            if !c.is_ascii_digit() {
                break;
            }
            self.take(cursor, c)?;
            if c != '0' {
                *significant = true;
            }
            if *significant {
                count = count.saturating_add(1);
            }
        }
        Ok(count)
    }
}

fn bad_number<I>(cursor: &Cursor<I>, description: &str) -> ParseError
where
    I: Iterator<Item = u8>,
{
    ParseError::new(ErrorKind::BadNumber, description, cursor.consumed())
}
