//! Suite orchestration.
//!
//! [`TestSuite`] is the state machine behind one `describe` block. It is
//! shared through [`SuiteContext`] (handed to the describe body) and
//! [`TestContext`] (handed to each test body); expectations created from a
//! `TestContext` report back into the same suite.

use std::{cell::RefCell, mem, rc::Rc};

use crate::{
    errors::{fail_fast, UsageError},
    expect::Expectation,
    report::SuiteReport,
    test::{ExpectationResult, TestRecord, TestRecorder},
    value::{IntoCallResult, Value},
};

/// State of one describe block.
#[derive(Debug)]
pub struct TestSuite {
    title: String,
    tests: Vec<TestRecord>,
    todos: Vec<String>,
    current: Option<TestRecorder>,
    running: bool,
    closed: bool,
}

impl TestSuite {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tests: Vec::new(),
            todos: Vec::new(),
            current: None,
            running: false,
            closed: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Closes the previous test and opens a new one. Returns the new test's
    /// position in the suite.
    pub fn add_test(&mut self, title: &str) -> Result<usize, UsageError> {
        if self.closed {
            return Err(UsageError::SuiteClosed {
                title: self.title.clone(),
            });
        }
        if self.running {
            let running = self
                .current
                .as_ref()
                .map(|t| t.title().to_string())
                .unwrap_or_default();
            return Err(UsageError::NestedTest {
                title: title.to_string(),
                running,
            });
        }
        self.close_current();
        tracing::debug!(suite = %self.title, test = title, "test opened");
        self.current = Some(TestRecorder::new(title));
        Ok(self.tests.len())
    }

    pub fn add_todo(&mut self, title: &str) -> Result<(), UsageError> {
        if self.closed {
            return Err(UsageError::SuiteClosed {
                title: self.title.clone(),
            });
        }
        self.todos.push(title.to_string());
        Ok(())
    }

    /// True while a test body is executing.
    pub fn in_test(&self) -> bool {
        self.running && self.current.is_some()
    }

    /// Position of the running test, if any.
    pub fn running_position(&self) -> Option<usize> {
        self.in_test().then_some(self.tests.len())
    }

    /// Allocates an expectation index in the test at `position`, which must
    /// be the running one.
    pub fn next_expect_index(&mut self, position: usize) -> Result<usize, UsageError> {
        if self.closed {
            return Err(UsageError::ExpectOutsideSuite);
        }
        match self.current.as_mut() {
            Some(test) if self.running && position == self.tests.len() => {
                Ok(test.next_expect_index())
            }
            _ => Err(UsageError::ExpectOutsideTest),
        }
    }

    /// Delivers a result to the test at `position`. Results for a test that
    /// is no longer running are rejected.
    pub fn report(&mut self, position: usize, result: ExpectationResult) -> bool {
        if self.closed || !self.running || position != self.tests.len() {
            return false;
        }
        match self.current.as_mut() {
            Some(test) => {
                test.report(result);
                true
            }
            None => false,
        }
    }

    pub fn test_title(&self, position: usize) -> Option<&str> {
        match self.tests.get(position) {
            Some(record) => Some(record.title()),
            None if position == self.tests.len() => self.current.as_ref().map(|t| t.title()),
            None => None,
        }
    }

    fn close_current(&mut self) {
        if let Some(test) = self.current.take() {
            self.tests.push(test.finalize());
        }
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Finalizes the last test and hands out the suite's results.
    pub fn close(&mut self) -> SuiteReport {
        debug_assert!(!self.closed, "suite closed twice");
        self.close_current();
        self.closed = true;
        tracing::debug!(suite = %self.title, tests = self.tests.len(), "suite closed");
        SuiteReport {
            title: self.title.clone(),
            tests: mem::take(&mut self.tests),
            todos: mem::take(&mut self.todos),
        }
    }
}

// ============================================================================
// CONTEXTS
// ============================================================================

/// Handle given to a describe body.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    inner: Rc<RefCell<TestSuite>>,
}

impl SuiteContext {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TestSuite::new(title))),
        }
    }

    pub fn title(&self) -> String {
        self.inner.borrow().title().to_string()
    }

    /// Registers and immediately runs a test.
    ///
    /// # Panics
    ///
    /// Panics with a [`UsageError`] when called from inside another test body
    /// or after the suite has closed.
    pub fn test(&self, title: &str, body: impl FnOnce(&TestContext)) {
        if let Err(err) = self.try_test(title, body) {
            fail_fast(err)
        }
    }

    pub fn try_test(&self, title: &str, body: impl FnOnce(&TestContext)) -> Result<(), UsageError> {
        let test = self.begin(title)?;
        let _running = RunningGuard(self);
        body(&test);
        Ok(())
    }

    /// Parameterized test: the body runs once per row, all rows sharing one
    /// test.
    pub fn each<R>(&self, rows: impl IntoIterator<Item = R>) -> Each<'_, R> {
        Each {
            suite: self,
            rows: rows.into_iter().collect(),
        }
    }

    /// Skipped test; the body never runs.
    pub fn skip(&self, title: &str, _body: impl FnOnce(&TestContext)) {
        tracing::debug!(suite = %self.title(), test = title, "test skipped");
    }

    /// Registers a todo label.
    pub fn todo(&self, title: &str) {
        let added = self.inner.borrow_mut().add_todo(title);
        if let Err(err) = added {
            fail_fast(err)
        }
    }

    /// The test whose body is currently running.
    pub fn current_test(&self) -> Option<TestContext> {
        let position = self.inner.borrow().running_position()?;
        Some(TestContext {
            suite: self.clone(),
            position,
        })
    }

    pub(crate) fn close(&self) -> SuiteReport {
        self.inner.borrow_mut().close()
    }

    fn begin(&self, title: &str) -> Result<TestContext, UsageError> {
        let mut suite = self.inner.borrow_mut();
        let position = suite.add_test(title)?;
        suite.set_running(true);
        Ok(TestContext {
            suite: self.clone(),
            position,
        })
    }
}

/// Clears the running flag when a test body returns or unwinds.
struct RunningGuard<'a>(&'a SuiteContext);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut suite) = self.0.inner.try_borrow_mut() {
            suite.set_running(false);
        }
    }
}

/// Rows for a parameterized test, see [`SuiteContext::each`].
pub struct Each<'a, R> {
    suite: &'a SuiteContext,
    rows: Vec<R>,
}

impl<R> Each<'_, R> {
    pub fn test(self, title: &str, mut body: impl FnMut(&TestContext, R)) {
        let rows = self.rows;
        self.suite.test(title, |t| {
            for row in rows {
                body(t, row);
            }
        });
    }
}

/// Handle given to a test body.
#[derive(Debug, Clone)]
pub struct TestContext {
    suite: SuiteContext,
    position: usize,
}

impl TestContext {
    /// Creates an expectation bound to this test. Function values are
    /// invoked right away and their outcome captured.
    ///
    /// # Panics
    ///
    /// Panics with [`UsageError::ExpectOutsideTest`] once this test's body
    /// has returned.
    pub fn expect(&self, value: impl Into<Value>) -> Expectation {
        self.try_expect(value).unwrap_or_else(|err| fail_fast(err))
    }

    pub fn try_expect(&self, value: impl Into<Value>) -> Result<Expectation, UsageError> {
        let index = self.suite.inner.borrow_mut().next_expect_index(self.position)?;
        Ok(Expectation::new(self.clone(), index, value.into()))
    }

    /// Shorthand for expecting on a function value.
    pub fn expect_fn<F, R>(&self, body: F) -> Expectation
    where
        F: Fn() -> R + 'static,
        R: IntoCallResult,
    {
        self.expect(Value::function(body))
    }

    pub fn title(&self) -> String {
        self.suite
            .inner
            .borrow()
            .test_title(self.position)
            .unwrap_or_default()
            .to_string()
    }

    pub fn suite(&self) -> &SuiteContext {
        &self.suite
    }

    pub(crate) fn record(&self, result: ExpectationResult) -> bool {
        let index = result.index;
        let accepted = self.suite.inner.borrow_mut().report(self.position, result);
        if !accepted {
            tracing::warn!(
                suite = %self.suite.title(),
                position = self.position,
                index,
                "result for a test that is no longer running was dropped"
            );
        }
        accepted
    }
}
