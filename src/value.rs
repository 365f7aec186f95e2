//! Dynamic value model for the assertion engine.
//!
//! Tests assert about [`Value`]s. Primitives (`undefined`, `null`, booleans,
//! numbers and strings) compare by value; every other kind lives behind an
//! `Rc` and compares by reference, so two separately built objects with the
//! same fields are *not* the same value.

use std::{cmp::Ordering, fmt, rc::Rc};

use chrono::{NaiveDate, NaiveDateTime};
use im::OrdMap;
use regex::Regex;
use serde::{Serialize, Serializer};

pub mod class;
mod macros;

pub use class::{Class, ClassDef};

/// Field storage for plain objects and class instances.
pub type ObjectMap = OrdMap<String, Value>;

/// Signature of an invokable value. `Err` carries the thrown value.
pub type FunctionBody = dyn Fn() -> Result<Value, Value>;

/// A value under test.
///
/// # Examples
///
/// ```rust
/// use mxunit::value::Value;
/// let n = Value::from(3);
/// assert_eq!(n.type_of(), "number");
/// let s = Value::from("hello");
/// assert_eq!(s.type_of(), "string");
/// assert!(Value::default().is_undefined());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(Rc<ObjectMap>),
    Date(Rc<NaiveDateTime>),
    Error(Rc<ErrorValue>),
    Regex(Rc<Regex>),
    Function(Rc<Function>),
    Instance(Rc<Instance>),
}

/// An error object, usually the thrown value captured from a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self::named("Error", message)
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// An invokable value.
pub struct Function {
    name: Option<String>,
    body: Box<FunctionBody>,
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invokes the body. Panics inside the body are not caught here.
    pub fn call(&self) -> Result<Value, Value> {
        (self.body)()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish()
    }
}

/// Conversion of a closure's return type into a call result.
pub trait IntoCallResult {
    fn into_call_result(self) -> Result<Value, Value>;
}

impl IntoCallResult for () {
    fn into_call_result(self) -> Result<Value, Value> {
        Ok(Value::Undefined)
    }
}

impl IntoCallResult for Value {
    fn into_call_result(self) -> Result<Value, Value> {
        Ok(self)
    }
}

impl<T, E> IntoCallResult for Result<T, E>
where
    T: Into<Value>,
    E: Into<Value>,
{
    fn into_call_result(self) -> Result<Value, Value> {
        self.map(Into::into).map_err(Into::into)
    }
}

/// An object created from a user-defined [`ClassDef`].
#[derive(Debug, Clone)]
pub struct Instance {
    pub class: Rc<ClassDef>,
    pub fields: ObjectMap,
}

impl Value {
    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Array(Rc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(Rc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    pub fn date(datetime: NaiveDateTime) -> Self {
        Value::Date(Rc::new(datetime))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(Rc::new(ErrorValue::new(message)))
    }

    pub fn regex(regex: Regex) -> Self {
        Value::Regex(Rc::new(regex))
    }

    /// Wraps a closure as an invokable value.
    ///
    /// ```rust
    /// use mxunit::value::Value;
    /// let f = Value::function(|| -> Result<(), &str> { Err("boom") });
    /// assert_eq!(f.type_of(), "function");
    /// ```
    pub fn function<F, R>(body: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: IntoCallResult,
    {
        Value::Function(Rc::new(Function {
            name: None,
            body: Box::new(move || body().into_call_result()),
        }))
    }

    pub fn named_function<F, R>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: IntoCallResult,
    {
        Value::Function(Rc::new(Function {
            name: Some(name.into()),
            body: Box::new(move || body().into_call_result()),
        }))
    }

    pub fn instance<K, V>(class: &Rc<ClassDef>, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Instance(Rc::new(Instance {
            class: Rc::clone(class),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }))
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    /// The `typeof` category of the value. `null` reports as `"object"`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::Date(_)
            | Value::Error(_)
            | Value::Regex(_)
            | Value::Instance(_) => "object",
        }
    }

    /// Human-readable kind, used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Number(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Array(_) => "Array".to_string(),
            Value::Object(_) => "Object".to_string(),
            Value::Date(_) => "Date".to_string(),
            Value::Error(e) => e.name.clone(),
            Value::Regex(_) => "RegExp".to_string(),
            Value::Function(_) => "Function".to_string(),
            Value::Instance(i) => i.class.name().to_string(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for reference kinds (everything except primitives and `null`).
    pub fn is_reference(&self) -> bool {
        !matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// Boolean coercion: `undefined`, `null`, `false`, `±0`, `NaN` and `""`
    /// are falsy, everything else (including empty arrays and objects) is
    /// truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Own enumerable keys, or `None` when the value is not an object.
    ///
    /// Arrays expose their indices; dates, errors and regexes have no
    /// enumerable keys. Functions are not objects here.
    pub fn own_keys(&self) -> Option<Vec<String>> {
        match self {
            Value::Array(items) => Some((0..items.len()).map(|i| i.to_string()).collect()),
            Value::Object(map) => Some(map.keys().cloned().collect()),
            Value::Instance(inst) => Some(inst.fields.keys().cloned().collect()),
            Value::Date(_) | Value::Error(_) | Value::Regex(_) => Some(Vec::new()),
            _ => None,
        }
    }

    /// Looks up `key` the way a property access on a keyed container would.
    /// Returns `None` when the key is absent or the value has no keys at all.
    pub fn property(&self, key: &str) -> Option<Value> {
        match self {
            Value::Array(items) => {
                if key == "length" {
                    return Some(Value::Number(items.len() as f64));
                }
                key.parse::<usize>()
                    .ok()
                    .filter(|i| i.to_string() == key)
                    .and_then(|i| items.get(i).cloned())
            }
            Value::Object(map) => map.get(key).cloned(),
            Value::Instance(inst) => inst.fields.get(key).cloned(),
            Value::Error(err) => match key {
                "name" => Some(Value::string(&err.name)),
                "message" => Some(Value::string(&err.message)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Ordering for the relational matchers. Numbers, strings and dates
    /// compare within their own kind; anything else is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
        if n.is_nan() {
            write!(f, "NaN")
        } else if n.is_infinite() {
            write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
        } else if n == 0.0 {
            write!(f, "0")
        } else {
            write!(f, "{}", n)
        }
    }

    /// Formats a value nested inside a container; strings are quoted there.
    fn fmt_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }

    fn fmt_fields(f: &mut fmt::Formatter<'_>, fields: &ObjectMap) -> fmt::Result {
        if fields.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{")?;
        for (i, (k, v)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: ", k)?;
            Value::fmt_nested(f, v)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => Value::fmt_number(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    Value::fmt_nested(f, item)?;
                }
                write!(f, "]")
            }
            Value::Object(map) => Value::fmt_fields(f, map),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S%.3f")),
            Value::Error(e) => write!(f, "{}", e),
            Value::Regex(r) => write!(f, "/{}/", r.as_str()),
            Value::Function(func) => match func.name() {
                Some(name) => write!(f, "[Function {}]", name),
                None => write!(f, "[Function]"),
            },
            Value::Instance(inst) => {
                write!(f, "{} ", inst.class.name())?;
                Value::fmt_fields(f, &inst.fields)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items.iter()),
            Value::Object(map) => serializer.collect_map(map.iter()),
            Value::Instance(inst) => serializer.collect_map(inst.fields.iter()),
            Value::Date(_) | Value::Error(_) | Value::Regex(_) | Value::Function(_) => {
                serializer.collect_str(self)
            }
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::string(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Value::Object(Rc::new(map))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::date(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::date(NaiveDateTime::from(d))
    }
}

impl From<Regex> for Value {
    fn from(r: Regex) -> Self {
        Value::regex(r)
    }
}

impl From<ErrorValue> for Value {
    fn from(e: ErrorValue) -> Self {
        Value::Error(Rc::new(e))
    }
}
