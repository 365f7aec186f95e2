//! Explicit-context entry point.
//!
//! ```rust
//! use mxunit::{report::MemoryReporter, Runner};
//!
//! let mut runner = Runner::new(MemoryReporter::new());
//! let report = runner.describe("math", |s| {
//!     s.test("adds", |t| {
//!         t.expect(1 + 2).to_be(3);
//!     });
//! });
//! assert!(report.all_passed());
//! assert_eq!(runner.reporter().reports.len(), 1);
//! ```

use std::{thread, time::Duration};

use termcolor::StandardStream;

use crate::{
    report::{ConsoleReporter, Reporter, SuiteReport},
    suite::SuiteContext,
};

/// Runs describe blocks and hands each finished suite to its reporter.
pub struct Runner<R: Reporter = ConsoleReporter<StandardStream>> {
    reporter: R,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(ConsoleReporter::default())
    }
}

impl<R: Reporter> Runner<R> {
    pub fn new(reporter: R) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Runs `body` as a suite, renders the result and returns it.
    pub fn describe(&mut self, title: &str, body: impl FnOnce(&SuiteContext)) -> SuiteReport {
        let report = run_suite(title, body);
        self.reporter.render(&report);
        report
    }

    /// Skipped suite; the body never runs and nothing is rendered.
    pub fn describe_skip(&mut self, title: &str, _body: impl FnOnce(&SuiteContext)) {
        tracing::debug!(suite = title, "suite skipped");
    }

    /// Clears earlier output, then runs the suite.
    pub fn describe_clear(
        &mut self,
        title: &str,
        body: impl FnOnce(&SuiteContext),
    ) -> SuiteReport {
        self.reporter.clear();
        self.describe(title, body)
    }

    /// Blocks for `delay`, then behaves like [`Runner::describe_clear`].
    pub fn describe_delayed(
        &mut self,
        delay: Duration,
        title: &str,
        body: impl FnOnce(&SuiteContext),
    ) -> SuiteReport {
        tracing::debug!(suite = title, ?delay, "suite delayed");
        thread::sleep(delay);
        self.describe_clear(title, body)
    }
}

/// Opens a suite, runs `body` against it and closes it. Rendering is left to
/// the caller.
pub(crate) fn run_suite(title: &str, body: impl FnOnce(&SuiteContext)) -> SuiteReport {
    tracing::debug!(suite = title, "suite opened");
    let suite = SuiteContext::new(title);
    body(&suite);
    suite.close()
}
