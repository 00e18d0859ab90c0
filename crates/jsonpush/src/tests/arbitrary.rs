//! An `Arbitrary` JSON value for the property tests.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use quickcheck::{Arbitrary, Gen};

use crate::encoding::is_noncharacter;

/// A plain JSON value tree used only to generate test documents.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// Strings the default parser options accept: no NUL, no noncharacters.
fn clean_string(g: &mut Gen) -> String {
    String::arbitrary(g)
        .chars()
        .filter(|c| *c != '\0' && !is_noncharacter(*c as u32))
        .collect()
}

fn finite_number(g: &mut Gen) -> f64 {
    let n = f64::arbitrary(g);
    if n.is_finite() { n } else { 0.0 }
}

fn arbitrary_value(g: &mut Gen, depth: usize) -> Value {
    let variants = if depth == 0 { 4 } else { 6 };
    match usize::arbitrary(g) % variants {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => Value::Number(finite_number(g)),
        3 => Value::String(clean_string(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| arbitrary_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            Value::Object(
                (0..len)
                    .map(|_| (clean_string(g), arbitrary_value(g, depth - 1)))
                    .collect(),
            )
        }
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_value(g, 3)
    }
}

/// Converts to a `serde_json` value so the reference serializer can produce
/// the document text.
pub(crate) fn to_serde(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_serde).collect()),
        Value::Object(members) => serde_json::Value::Object(
            members
                .iter()
                .map(|(key, value)| (key.clone(), to_serde(value)))
                .collect(),
        ),
    }
}

/// Event tallies a document of this shape must produce.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Counts {
    pub arrays: usize,
    pub objects: usize,
    pub strings: usize,
    pub numbers: usize,
    pub booleans: usize,
    pub nulls: usize,
    pub keys: usize,
}

pub(crate) fn accumulate(value: &Value, counts: &mut Counts) {
    match value {
        Value::Null => counts.nulls += 1,
        Value::Boolean(_) => counts.booleans += 1,
        Value::Number(_) => counts.numbers += 1,
        Value::String(_) => counts.strings += 1,
        Value::Array(items) => {
            counts.arrays += 1;
            for item in items {
                accumulate(item, counts);
            }
        }
        Value::Object(members) => {
            counts.objects += 1;
            counts.keys += members.len();
            for value in members.values() {
                accumulate(value, counts);
            }
        }
    }
}
