//! Ambient API.
//!
//! Free functions in the classic `describe`/`test`/`expect` shape. Each thread
//! keeps a stack of active suites: `describe` pushes before running its body
//! and pops afterwards, and `test`/`expect` route to the innermost suite.
//!
//! ```rust
//! use mxunit::{describe, expect, set_reporter, test, report::MemoryReporter};
//!
//! set_reporter(MemoryReporter::new());
//! let report = describe("strings", || {
//!     test("concat", || {
//!         expect(format!("{}{}", "a", "b")).to_be("ab");
//!     });
//! });
//! assert_eq!(report.success_count(), 1);
//! ```

use std::{cell::RefCell, time::Duration};

use crate::{
    errors::{fail_fast, UsageError},
    expect::Expectation,
    report::{ConsoleReporter, Reporter, SuiteReport},
    runner::run_suite,
    suite::SuiteContext,
    value::{IntoCallResult, Value},
};

thread_local! {
    static ACTIVE: RefCell<Vec<SuiteContext>> = const { RefCell::new(Vec::new()) };
    static REPORTER: RefCell<Box<dyn Reporter>> = RefCell::new(Box::new(ConsoleReporter::default()));
}

/// Keeps a suite on the active stack for the duration of its body.
struct ActiveGuard;

impl ActiveGuard {
    fn push(suite: &SuiteContext) -> Self {
        ACTIVE.with(|stack| stack.borrow_mut().push(suite.clone()));
        ActiveGuard
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn active_suite() -> Option<SuiteContext> {
    ACTIVE.with(|stack| stack.borrow().last().cloned())
}

fn render(report: &SuiteReport) {
    REPORTER.with(|reporter| reporter.borrow_mut().render(report));
}

/// Replaces this thread's reporter, returning the previous one.
pub fn set_reporter(reporter: impl Reporter + 'static) -> Box<dyn Reporter> {
    REPORTER.with(|slot| slot.replace(Box::new(reporter)))
}

// ============================================================================
// SUITES
// ============================================================================

/// Runs `body` as a suite and renders the result through this thread's
/// reporter.
pub fn describe(title: &str, body: impl FnOnce()) -> SuiteReport {
    let report = run_suite(title, |suite| {
        let _active = ActiveGuard::push(suite);
        body();
    });
    render(&report);
    report
}

pub fn describe_skip(title: &str, _body: impl FnOnce()) {
    tracing::debug!(suite = title, "suite skipped");
}

pub fn describe_clear(title: &str, body: impl FnOnce()) -> SuiteReport {
    REPORTER.with(|reporter| reporter.borrow_mut().clear());
    describe(title, body)
}

/// Blocks for `delay`, then behaves like [`describe_clear`].
pub fn describe_delayed(delay: Duration, title: &str, body: impl FnOnce()) -> SuiteReport {
    tracing::debug!(suite = title, ?delay, "suite delayed");
    std::thread::sleep(delay);
    describe_clear(title, body)
}

// ============================================================================
// TESTS
// ============================================================================

/// # Panics
///
/// Panics with [`UsageError::TestOutsideSuite`] when no suite is active, and
/// with [`UsageError::NestedTest`] inside another test body.
pub fn test(title: &str, body: impl FnOnce()) {
    if let Err(err) = try_test(title, body) {
        fail_fast(err)
    }
}

pub fn try_test(title: &str, body: impl FnOnce()) -> Result<(), UsageError> {
    let suite = suite_for(title)?;
    suite.try_test(title, |_| body())
}

pub fn test_skip(title: &str, _body: impl FnOnce()) {
    tracing::debug!(test = title, "test skipped");
}

pub fn test_todo(title: &str) {
    match suite_for(title) {
        Ok(suite) => suite.todo(title),
        Err(err) => fail_fast(err),
    }
}

/// Parameterized test over `rows`.
pub fn test_each<R>(rows: impl IntoIterator<Item = R>) -> EachRows<R> {
    EachRows {
        rows: rows.into_iter().collect(),
    }
}

pub struct EachRows<R> {
    rows: Vec<R>,
}

impl<R> EachRows<R> {
    /// Registers one test whose body runs once per row.
    pub fn test(self, title: &str, mut body: impl FnMut(R)) {
        let rows = self.rows;
        test(title, || {
            for row in rows {
                body(row);
            }
        });
    }
}

fn suite_for(title: &str) -> Result<SuiteContext, UsageError> {
    active_suite().ok_or_else(|| UsageError::TestOutsideSuite {
        title: title.to_string(),
    })
}

// ============================================================================
// EXPECTATIONS
// ============================================================================

/// Expectation on `value` in the running test.
///
/// # Panics
///
/// Panics with a [`UsageError`] outside a running test.
pub fn expect(value: impl Into<Value>) -> Expectation {
    try_expect(value).unwrap_or_else(|err| fail_fast(err))
}

pub fn try_expect(value: impl Into<Value>) -> Result<Expectation, UsageError> {
    let suite = active_suite().ok_or(UsageError::ExpectOutsideSuite)?;
    let test = suite.current_test().ok_or(UsageError::ExpectOutsideTest)?;
    test.try_expect(value)
}

/// Expectation on a function value; its outcome is captured immediately.
pub fn expect_fn<F, R>(body: F) -> Expectation
where
    F: Fn() -> R + 'static,
    R: IntoCallResult,
{
    expect(Value::function(body))
}
