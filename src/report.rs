//! Suite results and the renderers that consume them.
//!
//! A closed suite produces one [`SuiteReport`]. Reporters receive it by
//! reference and never change it.

use serde::Serialize;

use crate::test::TestRecord;

pub mod config;
mod console;
mod json;
mod memory;

pub use config::{ColorMode, ReportConfig, Style, StyleColor, Styles};
pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use memory::MemoryReporter;

/// Everything a finished describe block recorded.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub title: String,
    pub tests: Vec<TestRecord>,
    pub todos: Vec<String>,
}

impl SuiteReport {
    pub fn success_count(&self) -> usize {
        self.tests.iter().map(TestRecord::success_count).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.tests.iter().map(TestRecord::failure_count).sum()
    }

    pub fn total_count(&self) -> usize {
        self.tests.iter().map(TestRecord::total_count).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.tests.iter().all(TestRecord::passed)
    }

    /// First test with the given title.
    pub fn test(&self, title: &str) -> Option<&TestRecord> {
        self.tests.iter().find(|t| t.title() == title)
    }
}

/// Consumer of finished suites.
pub trait Reporter {
    fn render(&mut self, report: &SuiteReport);

    /// Wipes previously rendered output, where the sink supports it.
    fn clear(&mut self) {}
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn render(&mut self, report: &SuiteReport) {
        (**self).render(report)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}
