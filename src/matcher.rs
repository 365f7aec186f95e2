//! The fixed set of matchers.
//!
//! A [`Matcher`] carries its own arguments and knows how to evaluate itself;
//! the data-free [`MatcherKind`] is what gets recorded and owns the failure
//! message formatting.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::{
    compare::{
        array_subset_match, get_nested_value, identical, object_subset_match,
        shallow_struct_equal,
    },
    errors::UsageError,
    value::{Class, ErrorValue, Value},
};

/// Default precision for `to_be_close_to`.
pub const DEFAULT_CLOSE_DIGITS: i32 = 2;

/// Name tag of a matcher, stored in every result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatcherKind {
    ToBe,
    ToBeCloseTo,
    ToBeDefined,
    ToBeFalsy,
    ToBeGreaterThan,
    ToBeGreaterThanOrEqual,
    ToBeInstanceOf,
    ToBeLessThan,
    ToBeLessThanOrEqual,
    ToBeNaN,
    ToBeNull,
    ToBeTruthy,
    ToBeUndefined,
    ToContain,
    ToContainEqual,
    ToEqual,
    ToHaveLength,
    ToHaveProperty,
    ToMatch,
    ToMatchArray,
    ToMatchDate,
    ToMatchObject,
    ToThrow,
}

impl MatcherKind {
    pub fn name(self) -> &'static str {
        match self {
            MatcherKind::ToBe => "toBe",
            MatcherKind::ToBeCloseTo => "toBeCloseTo",
            MatcherKind::ToBeDefined => "toBeDefined",
            MatcherKind::ToBeFalsy => "toBeFalsy",
            MatcherKind::ToBeGreaterThan => "toBeGreaterThan",
            MatcherKind::ToBeGreaterThanOrEqual => "toBeGreaterThanOrEqual",
            MatcherKind::ToBeInstanceOf => "toBeInstanceOf",
            MatcherKind::ToBeLessThan => "toBeLessThan",
            MatcherKind::ToBeLessThanOrEqual => "toBeLessThanOrEqual",
            MatcherKind::ToBeNaN => "toBeNaN",
            MatcherKind::ToBeNull => "toBeNull",
            MatcherKind::ToBeTruthy => "toBeTruthy",
            MatcherKind::ToBeUndefined => "toBeUndefined",
            MatcherKind::ToContain => "toContain",
            MatcherKind::ToContainEqual => "toContainEqual",
            MatcherKind::ToEqual => "toEqual",
            MatcherKind::ToHaveLength => "toHaveLength",
            MatcherKind::ToHaveProperty => "toHaveProperty",
            MatcherKind::ToMatch => "toMatch",
            MatcherKind::ToMatchArray => "toMatchArray",
            MatcherKind::ToMatchDate => "toMatchDate",
            MatcherKind::ToMatchObject => "toMatchObject",
            MatcherKind::ToThrow => "toThrow",
        }
    }

    /// Renders the failure message from the recorded arguments.
    pub fn failure_message(self, args: &[Value]) -> String {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        match self {
            MatcherKind::ToBe => format!("{} not the same as {}", arg(0), arg(1)),
            MatcherKind::ToBeCloseTo => format!("{} is not close to {}", arg(0), arg(1)),
            MatcherKind::ToBeDefined => "Variable has not been defined".to_string(),
            MatcherKind::ToBeFalsy => format!("{} is not falsy", arg(0)),
            MatcherKind::ToBeGreaterThan => format!("{} is not greater than {}", arg(0), arg(1)),
            MatcherKind::ToBeGreaterThanOrEqual => {
                format!("{} is not greater than or equal to {}", arg(0), arg(1))
            }
            MatcherKind::ToBeInstanceOf => {
                format!("{} is not an instance of {}", arg(0), arg(1))
            }
            MatcherKind::ToBeLessThan => format!("{} is not less than {}", arg(0), arg(1)),
            MatcherKind::ToBeLessThanOrEqual => {
                format!("{} is not less than or equal to {}", arg(0), arg(1))
            }
            MatcherKind::ToBeNaN => format!("{} is not NaN", arg(0)),
            MatcherKind::ToBeNull => format!("{} is not null", arg(0)),
            MatcherKind::ToBeTruthy => format!("{} is not truthy", arg(0)),
            MatcherKind::ToBeUndefined => format!("{} is not undefined", arg(0)),
            MatcherKind::ToContain if args.len() == 2 => {
                format!("Array does not contain {}", arg(1))
            }
            MatcherKind::ToContainEqual if args.len() == 2 => {
                format!("Array does not contain item equal to {}", arg(1))
            }
            MatcherKind::ToContain | MatcherKind::ToContainEqual => {
                "Matched value is not an array".to_string()
            }
            MatcherKind::ToEqual => "Objects are not equal".to_string(),
            MatcherKind::ToHaveLength => {
                format!("{} does not have a length of {}", arg(0), arg(1))
            }
            MatcherKind::ToHaveProperty if args.len() == 3 => {
                format!("{}[{}] does not equal {}", arg(0), arg(1), arg(2))
            }
            MatcherKind::ToHaveProperty => {
                format!("{} does not have property {}", arg(0), arg(1))
            }
            MatcherKind::ToMatch => format!("{} does not match {}", arg(0), arg(1)),
            MatcherKind::ToMatchArray if args.len() == 2 => {
                format!("{} does not match {}", arg(0), arg(1))
            }
            MatcherKind::ToMatchArray => "Matched value is not an array".to_string(),
            MatcherKind::ToMatchDate if args.len() == 2 => {
                format!("{} does not match {}", arg(0), arg(1))
            }
            MatcherKind::ToMatchDate => "Received value is not a date".to_string(),
            MatcherKind::ToMatchObject => "Objects do not match".to_string(),
            MatcherKind::ToThrow if args.is_empty() => "No error was thrown".to_string(),
            MatcherKind::ToThrow => format!("Thrown error does not match {}", arg(0)),
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

/// Pattern argument of `to_match`. Text is compiled as a regex.
#[derive(Debug, Clone)]
pub enum TextPattern {
    Text(String),
    Regex(Regex),
}

impl TextPattern {
    pub fn compile(self) -> Result<Regex, UsageError> {
        match self {
            TextPattern::Regex(regex) => Ok(regex),
            TextPattern::Text(pattern) => {
                Regex::new(&pattern).map_err(|source| UsageError::InvalidPattern { pattern, source })
            }
        }
    }
}

impl From<&str> for TextPattern {
    fn from(s: &str) -> Self {
        TextPattern::Text(s.to_string())
    }
}

impl From<String> for TextPattern {
    fn from(s: String) -> Self {
        TextPattern::Text(s)
    }
}

impl From<Regex> for TextPattern {
    fn from(r: Regex) -> Self {
        TextPattern::Regex(r)
    }
}

impl From<&Regex> for TextPattern {
    fn from(r: &Regex) -> Self {
        TextPattern::Regex(r.clone())
    }
}

/// What a captured error must look like for `to_throw_with`.
#[derive(Debug, Clone)]
pub enum ThrowMatch {
    /// Any captured error.
    Any,
    /// The error message contains this text.
    Substring(String),
    /// The error message matches this regex.
    Pattern(Regex),
    /// The error message equals this message exactly.
    Message(String),
}

impl ThrowMatch {
    fn matches(&self, thrown: &Value) -> bool {
        let message = thrown_message(thrown);
        match self {
            ThrowMatch::Any => true,
            ThrowMatch::Substring(text) => message.contains(text.as_str()),
            ThrowMatch::Pattern(regex) => regex.is_match(&message),
            ThrowMatch::Message(expected) => &message == expected,
        }
    }

    fn describe(&self) -> Option<Value> {
        match self {
            ThrowMatch::Any => None,
            ThrowMatch::Substring(text) | ThrowMatch::Message(text) => Some(Value::string(text)),
            ThrowMatch::Pattern(regex) => Some(Value::string(format!("/{}/", regex.as_str()))),
        }
    }
}

impl From<&str> for ThrowMatch {
    fn from(s: &str) -> Self {
        ThrowMatch::Substring(s.to_string())
    }
}

impl From<String> for ThrowMatch {
    fn from(s: String) -> Self {
        ThrowMatch::Substring(s)
    }
}

impl From<Regex> for ThrowMatch {
    fn from(r: Regex) -> Self {
        ThrowMatch::Pattern(r)
    }
}

impl From<ErrorValue> for ThrowMatch {
    fn from(e: ErrorValue) -> Self {
        ThrowMatch::Message(e.message)
    }
}

/// The message of a thrown value: an error's message, a thrown string as is,
/// anything else as displayed.
pub fn thrown_message(thrown: &Value) -> String {
    match thrown {
        Value::Error(err) => err.message.clone(),
        other => other
            .property("message")
            .unwrap_or_else(|| other.clone())
            .to_string(),
    }
}

// ============================================================================
// MATCHERS
// ============================================================================

/// A matcher together with its expected arguments.
#[derive(Debug, Clone)]
pub enum Matcher {
    ToBe(Value),
    ToBeCloseTo { expected: Value, digits: i32 },
    ToBeDefined,
    ToBeFalsy,
    ToBeGreaterThan(Value),
    ToBeGreaterThanOrEqual(Value),
    ToBeInstanceOf(Class),
    ToBeLessThan(Value),
    ToBeLessThanOrEqual(Value),
    ToBeNaN,
    ToBeNull,
    ToBeTruthy,
    ToBeUndefined,
    ToContain(Value),
    ToContainEqual(Value),
    ToEqual(Value),
    ToHaveLength(usize),
    ToHaveProperty { path: String, value: Option<Value> },
    ToMatch(Regex),
    ToMatchArray(Value),
    ToMatchDate(Value),
    ToMatchObject(Value),
    ToThrow(ThrowMatch),
}

/// Raw (not yet negated) outcome of a matcher plus its message arguments.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub passed: bool,
    pub args: Vec<Value>,
}

impl Verdict {
    fn new(passed: bool, args: Vec<Value>) -> Self {
        Self { passed, args }
    }
}

impl Matcher {
    pub fn kind(&self) -> MatcherKind {
        match self {
            Matcher::ToBe(_) => MatcherKind::ToBe,
            Matcher::ToBeCloseTo { .. } => MatcherKind::ToBeCloseTo,
            Matcher::ToBeDefined => MatcherKind::ToBeDefined,
            Matcher::ToBeFalsy => MatcherKind::ToBeFalsy,
            Matcher::ToBeGreaterThan(_) => MatcherKind::ToBeGreaterThan,
            Matcher::ToBeGreaterThanOrEqual(_) => MatcherKind::ToBeGreaterThanOrEqual,
            Matcher::ToBeInstanceOf(_) => MatcherKind::ToBeInstanceOf,
            Matcher::ToBeLessThan(_) => MatcherKind::ToBeLessThan,
            Matcher::ToBeLessThanOrEqual(_) => MatcherKind::ToBeLessThanOrEqual,
            Matcher::ToBeNaN => MatcherKind::ToBeNaN,
            Matcher::ToBeNull => MatcherKind::ToBeNull,
            Matcher::ToBeTruthy => MatcherKind::ToBeTruthy,
            Matcher::ToBeUndefined => MatcherKind::ToBeUndefined,
            Matcher::ToContain(_) => MatcherKind::ToContain,
            Matcher::ToContainEqual(_) => MatcherKind::ToContainEqual,
            Matcher::ToEqual(_) => MatcherKind::ToEqual,
            Matcher::ToHaveLength(_) => MatcherKind::ToHaveLength,
            Matcher::ToHaveProperty { .. } => MatcherKind::ToHaveProperty,
            Matcher::ToMatch(_) => MatcherKind::ToMatch,
            Matcher::ToMatchArray(_) => MatcherKind::ToMatchArray,
            Matcher::ToMatchDate(_) => MatcherKind::ToMatchDate,
            Matcher::ToMatchObject(_) => MatcherKind::ToMatchObject,
            Matcher::ToThrow(_) => MatcherKind::ToThrow,
        }
    }

    /// Evaluates the predicate against the received value and the error
    /// captured when the received value was invoked, if any.
    pub fn evaluate(&self, received: &Value, thrown: Option<&Value>) -> Verdict {
        let pair = |expected: &Value| vec![received.clone(), expected.clone()];
        match self {
            Matcher::ToBe(expected) => Verdict::new(identical(received, expected), pair(expected)),
            Matcher::ToBeCloseTo { expected, digits } => {
                let precision = 10f64.powi(digits.saturating_neg()) / 2.0;
                let passed = match (received.as_number(), expected.as_number()) {
                    (Some(r), Some(e)) => (r - e).abs() < precision,
                    _ => false,
                };
                Verdict::new(passed, pair(expected))
            }
            Matcher::ToBeDefined => Verdict::new(!received.is_undefined(), vec![received.clone()]),
            Matcher::ToBeFalsy => Verdict::new(!received.is_truthy(), vec![received.clone()]),
            Matcher::ToBeTruthy => Verdict::new(received.is_truthy(), vec![received.clone()]),
            Matcher::ToBeGreaterThan(expected) => Verdict::new(
                received.compare(expected).is_some_and(|o| o.is_gt()),
                pair(expected),
            ),
            Matcher::ToBeGreaterThanOrEqual(expected) => Verdict::new(
                received.compare(expected).is_some_and(|o| o.is_ge()),
                pair(expected),
            ),
            Matcher::ToBeLessThan(expected) => Verdict::new(
                received.compare(expected).is_some_and(|o| o.is_lt()),
                pair(expected),
            ),
            Matcher::ToBeLessThanOrEqual(expected) => Verdict::new(
                received.compare(expected).is_some_and(|o| o.is_le()),
                pair(expected),
            ),
            Matcher::ToBeInstanceOf(class) => Verdict::new(
                class.is_instance(received),
                vec![received.clone(), Value::string(class.name())],
            ),
            Matcher::ToBeNaN => Verdict::new(
                received.as_number().is_some_and(f64::is_nan),
                vec![received.clone()],
            ),
            Matcher::ToBeNull => Verdict::new(received.is_null(), vec![received.clone()]),
            Matcher::ToBeUndefined => Verdict::new(received.is_undefined(), vec![received.clone()]),
            Matcher::ToContain(expected) => match received.as_array() {
                Some(items) => Verdict::new(
                    items.iter().any(|item| identical(item, expected)),
                    pair(expected),
                ),
                None => Verdict::new(false, vec![Value::Undefined]),
            },
            Matcher::ToContainEqual(expected) => match received.as_array() {
                Some(items) => Verdict::new(
                    items.iter().any(|item| shallow_struct_equal(item, expected)),
                    pair(expected),
                ),
                None => Verdict::new(false, vec![Value::Undefined]),
            },
            Matcher::ToEqual(expected) => {
                Verdict::new(shallow_struct_equal(received, expected), pair(expected))
            }
            Matcher::ToHaveLength(length) => Verdict::new(
                has_length(received, *length),
                vec![received.clone(), Value::from(*length)],
            ),
            Matcher::ToHaveProperty { path, value } => {
                let found = get_nested_value(received, path);
                match (value, found) {
                    (Some(want), Some(got)) => Verdict::new(
                        identical(&got, want),
                        vec![received.clone(), Value::string(path), want.clone()],
                    ),
                    (_, found) => Verdict::new(
                        value.is_none() && found.is_some(),
                        vec![received.clone(), Value::string(path)],
                    ),
                }
            }
            Matcher::ToMatch(regex) => Verdict::new(
                regex.is_match(&received.to_string()),
                vec![received.clone(), Value::string(format!("/{}/", regex.as_str()))],
            ),
            Matcher::ToMatchArray(expected) => match received {
                Value::Array(_) => {
                    Verdict::new(array_subset_match(received, expected), pair(expected))
                }
                _ => Verdict::new(false, vec![Value::Undefined]),
            },
            Matcher::ToMatchDate(expected) => match (received.as_date(), expected.as_date()) {
                (Some(got), Some(want)) => Verdict::new(got.date() == want.date(), pair(expected)),
                (Some(_), None) => Verdict::new(false, pair(expected)),
                (None, _) => Verdict::new(false, vec![Value::Undefined]),
            },
            Matcher::ToMatchObject(expected) => {
                Verdict::new(object_subset_match(received, expected), Vec::new())
            }
            Matcher::ToThrow(expected) => Verdict::new(
                thrown.is_some_and(|err| expected.matches(err)),
                expected.describe().into_iter().collect(),
            ),
        }
    }
}

/// Own `length` check: arrays, strings (in chars), and objects that carry a
/// `length` key.
fn has_length(received: &Value, length: usize) -> bool {
    match received {
        Value::Array(items) => items.len() == length,
        Value::String(s) => s.chars().count() == length,
        Value::Object(_) | Value::Instance(_) => received
            .property("length")
            .is_some_and(|l| identical(&l, &Value::from(length))),
        _ => false,
    }
}
