//! Error types for mxunit.
//!
//! Only usage-contract violations are errors. Failed assertions are recorded
//! as results and never surface here; see [`crate::test::ExpectationResult`].

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// USAGE ERRORS - contract violations by the code under test
// ============================================================================

/// A violation of the describe/test/expect calling contract.
#[derive(Debug, Error, Diagnostic)]
pub enum UsageError {
    #[error("Function <expect> called outside of suite")]
    #[diagnostic(
        code(mxunit::usage::expect_outside_suite),
        help("call `expect` inside a `test` body that runs within `describe`")
    )]
    ExpectOutsideSuite,

    #[error("Function <expect> called outside of test")]
    #[diagnostic(
        code(mxunit::usage::expect_outside_test),
        help("`expect` is only valid while a test body is running")
    )]
    ExpectOutsideTest,

    #[error("Test <{title}> created outside of suite")]
    #[diagnostic(
        code(mxunit::usage::test_outside_suite),
        help("wrap the test in a `describe` block")
    )]
    TestOutsideSuite { title: String },

    #[error("Test <{title}> created inside running test <{running}>")]
    #[diagnostic(
        code(mxunit::usage::nested_test),
        help("tests cannot be nested; declare it next to <{running}> instead")
    )]
    NestedTest { title: String, running: String },

    #[error("Suite <{title}> is already closed")]
    #[diagnostic(code(mxunit::usage::suite_closed))]
    SuiteClosed { title: String },

    #[error("Invalid pattern <{pattern}>")]
    #[diagnostic(code(mxunit::usage::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Aborts the current call stack with a usage error.
///
/// Usage errors are programming mistakes in the test code itself; they are
/// never recorded as results.
#[track_caller]
pub(crate) fn fail_fast(err: UsageError) -> ! {
    tracing::error!(error = %err, "usage contract violated");
    panic!("{err}")
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read report config {}", path.display())]
    #[diagnostic(code(mxunit::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid report config: {0}")]
    #[diagnostic(
        code(mxunit::config::parse),
        help("see `ReportConfig` for the accepted keys")
    )]
    Parse(#[from] serde_yaml::Error),
}
