use std::io::{self, Write};

use super::{Reporter, SuiteReport};

/// Writes each report as one line of JSON.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_report(&mut self, report: &SuiteReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn render(&mut self, report: &SuiteReport) {
        if let Err(err) = self.write_report(report) {
            tracing::warn!(suite = %report.title, %err, "failed to write json report");
        }
    }
}
