//! Structural comparison predicates used by the matchers.
//!
//! All functions are pure. [`shallow_struct_equal`] is deliberately one level
//! deep: nested objects compare by identity, which is what `to_equal` and
//! `to_contain_equal` are defined on.

use std::rc::Rc;

use crate::value::Value;

/// Same-value identity: equal primitives or the same reference.
/// `NaN` equals itself; `+0` and `-0` are distinct.
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => same_number(*x, *y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
        (Value::Date(x), Value::Date(y)) => Rc::ptr_eq(x, y),
        (Value::Error(x), Value::Error(y)) => Rc::ptr_eq(x, y),
        (Value::Regex(x), Value::Regex(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Instance(x), Value::Instance(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn same_number(x: f64, y: f64) -> bool {
    if x.is_nan() && y.is_nan() {
        return true;
    }
    x == y && x.is_sign_negative() == y.is_sign_negative()
}

/// One-level structural equality.
///
/// Values of different `typeof` are never equal. Non-objects fall back to
/// [`identical`]. Objects must have the same set of own keys, and each key's
/// values must be [`identical`].
pub fn shallow_struct_equal(a: &Value, b: &Value) -> bool {
    if a.type_of() != b.type_of() {
        return false;
    }
    let (Some(keys_a), Some(keys_b)) = (a.own_keys(), b.own_keys()) else {
        return identical(a, b);
    };
    if keys_a.len() != keys_b.len() {
        return false;
    }
    keys_a
        .iter()
        .all(|key| match (a.property(key), b.property(key)) {
            (Some(x), Some(y)) => identical(&x, &y),
            _ => false,
        })
}

/// Checks every index of `expected` against `received`.
///
/// Nested arrays in `expected` recurse; other elements use
/// [`shallow_struct_equal`]. Missing received elements read as `undefined`.
/// Trailing received elements are ignored.
pub fn array_subset_match(received: &Value, expected: &Value) -> bool {
    let (Value::Array(received), Value::Array(expected)) = (received, expected) else {
        return false;
    };
    expected.iter().enumerate().all(|(i, want)| {
        let got = received.get(i).cloned().unwrap_or_default();
        match want {
            Value::Array(_) => array_subset_match(&got, want),
            _ => shallow_struct_equal(&got, want),
        }
    })
}

/// Checks every own key of `expected` against `received`.
///
/// Array values use [`array_subset_match`], object values recurse, anything
/// else must be [`identical`]. Extra keys in `received` are ignored.
pub fn object_subset_match(received: &Value, expected: &Value) -> bool {
    let Some(keys) = expected.own_keys() else {
        return identical(received, expected);
    };
    if received.own_keys().is_none() {
        return false;
    }
    keys.iter().all(|key| {
        let got = received.property(key).unwrap_or_default();
        let want = expected.property(key).unwrap_or_default();
        match &want {
            Value::Array(_) => array_subset_match(&got, &want),
            w if w.own_keys().is_some() => object_subset_match(&got, &want),
            _ => identical(&got, &want),
        }
    })
}

/// Walks a dotted path through keyed containers.
///
/// Returns `None` as soon as a segment is missing or an intermediate value
/// has no keys.
pub fn get_nested_value(source: &Value, path: &str) -> Option<Value> {
    path.split('.')
        .try_fold(source.clone(), |current, key| current.property(key))
}
