use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{ColorSpec, StandardStream, WriteColor};

use super::{config::Style, ReportConfig, Reporter, SuiteReport};
use crate::{matcher::MatcherKind, test::ExpectationResult};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Human-readable report on a color-capable writer.
pub struct ConsoleReporter<W: WriteColor> {
    out: W,
    config: ReportConfig,
}

impl ConsoleReporter<StandardStream> {
    /// Reporter on stdout, color resolved from `config`.
    pub fn stdout(config: ReportConfig) -> Self {
        let choice = config.resolve_color();
        Self::new(StandardStream::stdout(choice), config)
    }
}

impl Default for ConsoleReporter<StandardStream> {
    fn default() -> Self {
        Self::stdout(ReportConfig::default())
    }
}

impl<W: WriteColor> ConsoleReporter<W> {
    pub fn new(out: W, config: ReportConfig) -> Self {
        Self { out, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&mut self, style: Style, text: &str) -> io::Result<()> {
        self.out.set_color(&style.spec())?;
        write!(self.out, "{text}")?;
        self.out.reset()
    }

    fn write_report(&mut self, report: &SuiteReport) -> io::Result<()> {
        let styles = self.config.styles.clone();
        self.styled(styles.suite, &report.title)?;
        writeln!(self.out)?;

        for test in &report.tests {
            write!(self.out, "  ")?;
            self.styled(styles.test, test.title())?;
            writeln!(self.out)?;

            let counts = format!(
                "Tests: {} passed, {} total",
                test.success_count(),
                test.total_count()
            );
            write!(self.out, "    ")?;
            let style = if test.passed() { styles.passed } else { styles.failure };
            self.styled(style, &counts)?;
            writeln!(self.out)?;

            for failure in test.failures() {
                self.write_failure(failure)?;
            }
        }

        writeln!(self.out)?;
        let totals = format!(
            "Tests: {} passed, {} total",
            report.success_count(),
            report.total_count()
        );
        let style = if report.all_passed() { styles.passed } else { styles.failure };
        self.styled(style, &totals)?;
        writeln!(self.out)?;

        if !report.todos.is_empty() {
            self.styled(styles.todo, "ToDo:")?;
            writeln!(self.out)?;
            for todo in &report.todos {
                writeln!(self.out, "  - {todo}")?;
            }
        }
        self.out.flush()
    }

    fn write_failure(&mut self, failure: &ExpectationResult) -> io::Result<()> {
        let line = format!(
            "{}[{}]: {}",
            failure.label(),
            failure.index,
            failure.message()
        );
        let style = self.config.styles.failure;
        write!(self.out, "    ")?;
        self.styled(style, &line)?;
        writeln!(self.out)?;

        if self.config.show_diffs && failure.matcher == MatcherKind::ToEqual && !failure.negated {
            if let [received, expected] = failure.args.as_slice() {
                let changeset =
                    Changeset::new(&received.to_string(), &expected.to_string(), " ");
                self.write_diff(&changeset.diffs)?;
            }
        }
        Ok(())
    }

    fn write_diff(&mut self, diffs: &[Difference]) -> io::Result<()> {
        let failure = self.config.styles.failure;
        let passed = self.config.styles.passed;
        write!(self.out, "      ")?;
        for diff in diffs {
            match diff {
                Difference::Same(x) => {
                    self.out.set_color(&ColorSpec::new())?;
                    write!(self.out, " {x}")?;
                }
                Difference::Rem(x) => {
                    self.out.set_color(&failure.spec())?;
                    write!(self.out, " -{x}")?;
                }
                Difference::Add(x) => {
                    self.out.set_color(&passed.spec())?;
                    write!(self.out, " +{x}")?;
                }
            }
        }
        self.out.reset()?;
        writeln!(self.out)
    }
}

impl<W: WriteColor> Reporter for ConsoleReporter<W> {
    fn render(&mut self, report: &SuiteReport) {
        if let Err(err) = self.write_report(report) {
            tracing::warn!(suite = %report.title, %err, "failed to write console report");
        }
    }

    fn clear(&mut self) {
        if !self.out.supports_color() {
            return;
        }
        let cleared = write!(self.out, "{CLEAR_SCREEN}").and_then(|_| self.out.flush());
        if let Err(err) = cleared {
            tracing::warn!(%err, "failed to clear console");
        }
    }
}

#[cfg(test)]
mod tests {
    use termcolor::{Ansi, NoColor};

    use super::*;
    use crate::report::tests::sample_report;

    fn render_plain(config: ReportConfig) -> String {
        let mut reporter = ConsoleReporter::new(NoColor::new(Vec::new()), config);
        reporter.render(&sample_report());
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn lists_tests_failures_and_todos() {
        let out = render_plain(ReportConfig::default());
        assert!(out.starts_with("math\n"));
        assert!(out.contains("  adds\n    Tests: 1 passed, 1 total\n"));
        assert!(out.contains("    Tests: 0 passed, 2 total\n"));
        assert!(out.contains("    not.toBe[1]: 2 not the same as 2\n"));
        assert!(out.contains("    toEqual[2]: Objects are not equal\n"));
        assert!(out.contains("\n\nTests: 1 passed, 3 total\n"));
        assert!(!out.contains("Expectations"));
        assert!(out.ends_with("ToDo:\n  - division\n"));
    }

    #[test]
    fn equal_failures_get_a_word_diff() {
        let out = render_plain(ReportConfig::default());
        assert!(out.contains("      -left +right side\n"));

        let quiet = render_plain(ReportConfig {
            show_diffs: false,
            ..ReportConfig::default()
        });
        assert!(!quiet.contains("+right"));
    }

    #[test]
    fn clear_is_skipped_without_color() {
        let mut plain = ConsoleReporter::new(NoColor::new(Vec::new()), ReportConfig::default());
        plain.clear();
        assert!(plain.into_inner().into_inner().is_empty());

        let mut ansi = ConsoleReporter::new(Ansi::new(Vec::new()), ReportConfig::default());
        ansi.clear();
        assert_eq!(ansi.into_inner().into_inner(), CLEAR_SCREEN.as_bytes());
    }
}
