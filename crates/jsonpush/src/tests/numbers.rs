//! Number scanner classification, digit counting, and failure modes.

use rstest::rstest;

use crate::encoding::Encoding;
use crate::error::ErrorKind;
use crate::input::Cursor;
use crate::number::{NumberKind, NumberScanner};
use crate::options::Extensions;

fn scan(text: &str, extensions: &Extensions) -> Result<(alloc::string::String, NumberKind, u16), ErrorKind> {
    let mut cursor = Cursor::new(text.bytes(), Encoding::Utf8);
    let mut scanner = NumberScanner::new();
    match scanner.scan(&mut cursor, extensions) {
        Ok(description) => Ok((
            description.text().into(),
            description.kind(),
            description.digits(),
        )),
        Err(err) => Err(err.kind),
    }
}

fn scan_default(text: &str) -> Result<(alloc::string::String, NumberKind, u16), ErrorKind> {
    scan(text, &Extensions::default())
}

#[rstest]
#[case("0", NumberKind::UnsignedInteger, 0)]
#[case("-0", NumberKind::Integer, 0)]
#[case("1", NumberKind::UnsignedInteger, 1)]
#[case("-12", NumberKind::Integer, 2)]
#[case("100", NumberKind::UnsignedInteger, 3)]
#[case("3.14", NumberKind::UnsignedDecimal, 3)]
#[case("-3.140", NumberKind::Decimal, 4)]
#[case("0.001", NumberKind::UnsignedDecimal, 1)]
#[case("0.00123", NumberKind::UnsignedDecimal, 3)]
#[case("-1.5e10", NumberKind::Scientific, 2)]
#[case("1E-2", NumberKind::Scientific, 1)]
#[case("2e+308", NumberKind::Scientific, 1)]
#[case("0e0", NumberKind::Scientific, 0)]
fn classification_and_digits(
    #[case] text: &str,
    #[case] kind: NumberKind,
    #[case] digits: u16,
) {
    assert_eq!(scan_default(text), Ok((text.into(), kind, digits)));
}

#[test]
fn text_is_the_exact_source_run() {
    // The scanner stops at the first non-number character.
    let (text, _, _) = scan_default("42,7").unwrap();
    assert_eq!(text, "42");
}

#[test]
fn growth_past_the_initial_capacity() {
    // 46 significant digits, longer than the 32-byte initial buffer
    let digits = "1234567890123456789012345678901234567890123456";
    let (text, kind, count) = scan_default(digits).unwrap();
    assert_eq!(text, digits);
    assert_eq!(kind, NumberKind::UnsignedInteger);
    assert_eq!(count, 46);
}

#[rstest]
#[case("-")]
#[case(".")]
#[case(".5")]
#[case("0.")]
#[case("1.")]
#[case("1.e5")]
#[case("1e")]
#[case("1e+")]
#[case("1e-")]
#[case("00")]
#[case("007")]
#[case("+1")]
fn grammar_violations(#[case] text: &str) {
    assert_eq!(scan_default(text), Err(ErrorKind::BadNumber), "{text}");
}

#[test]
fn leading_plus_extension() {
    let extensions = Extensions {
        allow_leading_plus_in_numbers: true,
        ..Extensions::default()
    };
    let (text, kind, digits) = scan("+15", &extensions).unwrap();
    assert_eq!(text, "+15");
    // Only a minus sign makes a number signed.
    assert_eq!(kind, NumberKind::UnsignedInteger);
    assert_eq!(digits, 2);
}

#[test]
fn leading_zeros_extension() {
    let extensions = Extensions {
        allow_leading_zeros_in_integers: true,
        ..Extensions::default()
    };
    let (text, kind, digits) = scan("007", &extensions).unwrap();
    assert_eq!(text, "007");
    assert_eq!(kind, NumberKind::UnsignedInteger);
    assert_eq!(digits, 1);
}

#[test]
fn kind_predicates() {
    assert!(NumberKind::Integer.is_signed());
    assert!(NumberKind::Integer.is_integer());
    assert!(!NumberKind::UnsignedInteger.is_signed());
    assert!(NumberKind::UnsignedDecimal.is_decimal());
    assert!(NumberKind::Decimal.is_signed());
    assert!(NumberKind::Scientific.is_scientific());
    assert!(NumberKind::Scientific.is_signed());
    assert!(!NumberKind::Scientific.is_integer());
}

#[test]
fn oversized_literal_is_rejected() {
    let mut text = alloc::string::String::from("1");
    text.push_str(&"0".repeat(600));
    assert_eq!(scan_default(&text), Err(ErrorKind::BadNumber));
}
