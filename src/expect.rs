//! Expectations: one received value, one result slot.
//!
//! An [`Expectation`] is created by `expect()` and bound to the test that was
//! running at that moment. Every matcher call on it (or on a `.not()` derived
//! from it) records one result under the same index.

use std::{
    any::Any,
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
    sync::Once,
};

use crate::{
    errors::fail_fast,
    matcher::{Matcher, TextPattern, ThrowMatch, DEFAULT_CLOSE_DIGITS},
    suite::TestContext,
    test::ExpectationResult,
    value::{Class, ErrorValue, Function, Value},
};

/// Captured result of invoking a function value.
#[derive(Debug, Clone)]
pub enum Outcome {
    Returned(Value),
    Threw(Value),
}

impl Outcome {
    /// Invokes `function` once. An `Err` return or a panic inside the body
    /// is captured as a thrown value; panics become `Panic` errors and are
    /// not printed by the panic hook.
    pub fn capture(function: &Function) -> Outcome {
        install_quiet_hook();
        let captured = {
            let _quiet = QuietPanics::enter();
            panic::catch_unwind(AssertUnwindSafe(|| function.call()))
        };
        match captured {
            Ok(Ok(value)) => Outcome::Returned(value),
            Ok(Err(thrown)) => Outcome::Threw(thrown),
            Err(payload) => Outcome::Threw(Value::from(ErrorValue::named(
                "Panic",
                panic_message(&*payload),
            ))),
        }
    }

    pub fn thrown(&self) -> Option<&Value> {
        match self {
            Outcome::Threw(err) => Some(err),
            Outcome::Returned(_) => None,
        }
    }
}

// ============================================================================
// PANIC HOOK: silence panics that are captured as thrown values
// ============================================================================

static QUIET_HOOK_INIT: Once = Once::new();

thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Wraps the installed panic hook once per process. The wrapper skips the
/// previous hook while the panicking thread is inside [`Outcome::capture`].
fn install_quiet_hook() {
    QUIET_HOOK_INIT.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if capturing() {
                tracing::debug!(panic = %info, "panic captured as thrown value");
            } else {
                previous(info);
            }
        }));
    });
}

/// Marks the current thread as capturing for its lifetime.
struct QuietPanics;

impl QuietPanics {
    fn enter() -> Self {
        CAPTURE_DEPTH.with(|d| d.set(d.get() + 1));
        QuietPanics
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

fn capturing() -> bool {
    CAPTURE_DEPTH.with(Cell::get) > 0
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Received value shared between an expectation and its negations.
#[derive(Debug)]
struct Subject {
    value: Value,
    outcome: Option<Outcome>,
    error_checked: Cell<bool>,
}

impl Drop for Subject {
    fn drop(&mut self) {
        if let Some(err) = self.outcome.as_ref().and_then(Outcome::thrown) {
            if !self.error_checked.get() {
                tracing::debug!(error = %err, "captured error discarded without toThrow");
            }
        }
    }
}

/// The value returned by `expect()`.
#[derive(Clone)]
pub struct Expectation {
    test: TestContext,
    index: usize,
    negated: bool,
    subject: Rc<Subject>,
}

impl Expectation {
    pub(crate) fn new(test: TestContext, index: usize, value: Value) -> Self {
        let outcome = match &value {
            Value::Function(function) => Some(Outcome::capture(function)),
            _ => None,
        };
        Self {
            test,
            index,
            negated: false,
            subject: Rc::new(Subject {
                value,
                outcome,
                error_checked: Cell::new(false),
            }),
        }
    }

    /// Same received value and index, negation flipped.
    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Expectation {
        Expectation {
            negated: !self.negated,
            ..self.clone()
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn received(&self) -> &Value {
        &self.subject.value
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.subject.outcome.as_ref()
    }

    pub fn captured_error(&self) -> Option<&Value> {
        self.outcome().and_then(Outcome::thrown)
    }

    /// Evaluates `matcher`, applies negation and records the result.
    /// Returns the recorded success.
    pub fn check(&self, matcher: Matcher) -> bool {
        let verdict = matcher.evaluate(&self.subject.value, self.captured_error());
        if matches!(matcher, Matcher::ToThrow(_)) {
            self.subject.error_checked.set(true);
        }
        let success = verdict.passed != self.negated;
        self.test.record(ExpectationResult {
            index: self.index,
            matcher: matcher.kind(),
            success,
            negated: self.negated,
            args: verdict.args,
        });
        success
    }

    // ------------------------------------------------------------------------
    // Matchers
    // ------------------------------------------------------------------------

    pub fn to_be(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToBe(expected.into()))
    }

    pub fn to_be_close_to(&self, expected: impl Into<Value>) -> bool {
        self.to_be_close_to_digits(expected, DEFAULT_CLOSE_DIGITS)
    }

    pub fn to_be_close_to_digits(&self, expected: impl Into<Value>, digits: i32) -> bool {
        self.check(Matcher::ToBeCloseTo {
            expected: expected.into(),
            digits,
        })
    }

    pub fn to_be_defined(&self) -> bool {
        self.check(Matcher::ToBeDefined)
    }

    pub fn to_be_falsy(&self) -> bool {
        self.check(Matcher::ToBeFalsy)
    }

    pub fn to_be_truthy(&self) -> bool {
        self.check(Matcher::ToBeTruthy)
    }

    pub fn to_be_greater_than(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToBeGreaterThan(expected.into()))
    }

    pub fn to_be_greater_than_or_equal(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToBeGreaterThanOrEqual(expected.into()))
    }

    pub fn to_be_less_than(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToBeLessThan(expected.into()))
    }

    pub fn to_be_less_than_or_equal(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToBeLessThanOrEqual(expected.into()))
    }

    pub fn to_be_instance_of(&self, class: impl Into<Class>) -> bool {
        self.check(Matcher::ToBeInstanceOf(class.into()))
    }

    pub fn to_be_nan(&self) -> bool {
        self.check(Matcher::ToBeNaN)
    }

    pub fn to_be_null(&self) -> bool {
        self.check(Matcher::ToBeNull)
    }

    pub fn to_be_undefined(&self) -> bool {
        self.check(Matcher::ToBeUndefined)
    }

    pub fn to_contain(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToContain(expected.into()))
    }

    pub fn to_contain_equal(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToContainEqual(expected.into()))
    }

    /// One-level structural equality; nested objects compare by reference.
    pub fn to_equal(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToEqual(expected.into()))
    }

    pub fn to_have_length(&self, length: usize) -> bool {
        self.check(Matcher::ToHaveLength(length))
    }

    /// Passes when the dotted `path` resolves, whatever the value.
    pub fn to_have_property(&self, path: &str) -> bool {
        self.check(Matcher::ToHaveProperty {
            path: path.to_string(),
            value: None,
        })
    }

    pub fn to_have_property_value(&self, path: &str, value: impl Into<Value>) -> bool {
        self.check(Matcher::ToHaveProperty {
            path: path.to_string(),
            value: Some(value.into()),
        })
    }

    /// # Panics
    ///
    /// Panics with [`UsageError::InvalidPattern`](crate::UsageError) when a
    /// text pattern is not a valid regex.
    pub fn to_match(&self, pattern: impl Into<TextPattern>) -> bool {
        match pattern.into().compile() {
            Ok(regex) => self.check(Matcher::ToMatch(regex)),
            Err(err) => fail_fast(err),
        }
    }

    pub fn to_match_array(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToMatchArray(expected.into()))
    }

    pub fn to_match_date(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToMatchDate(expected.into()))
    }

    pub fn to_match_object(&self, expected: impl Into<Value>) -> bool {
        self.check(Matcher::ToMatchObject(expected.into()))
    }

    pub fn to_throw(&self) -> bool {
        self.check(Matcher::ToThrow(ThrowMatch::Any))
    }

    /// Text matches as a substring of the message, a regex matches the
    /// message, an [`ErrorValue`] must have exactly the same message.
    pub fn to_throw_with(&self, expected: impl Into<ThrowMatch>) -> bool {
        self.check(Matcher::ToThrow(expected.into()))
    }
}

impl std::fmt::Debug for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("index", &self.index)
            .field("negated", &self.negated)
            .field("received", &self.subject.value)
            .field("outcome", &self.subject.outcome)
            .finish()
    }
}
