use super::{Reporter, SuiteReport};

/// Keeps every rendered report in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    pub reports: Vec<SuiteReport>,
    /// Number of `clear` calls received.
    pub clears: usize,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SuiteReport> {
        self.reports.last()
    }

    pub fn find(&self, title: &str) -> Option<&SuiteReport> {
        self.reports.iter().find(|r| r.title == title)
    }
}

impl Reporter for MemoryReporter {
    fn render(&mut self, report: &SuiteReport) {
        self.reports.push(report.clone());
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}
