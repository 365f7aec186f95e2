//! mxunit: an embeddable describe/test/expect harness.
//!
//! Suites are run either through an explicit [`Runner`] (the body receives a
//! [`SuiteContext`], tests receive a [`TestContext`]) or through the ambient
//! free functions in [`global`], which route to the innermost active suite on
//! the current thread. Failed assertions are recorded, never raised; only
//! misuse of the calling contract is an error ([`UsageError`]).

pub use crate::errors::{ConfigError, UsageError};
pub use crate::expect::{Expectation, Outcome};
pub use crate::global::{
    describe, describe_clear, describe_delayed, describe_skip, expect, expect_fn, set_reporter,
    test, test_each, test_skip, test_todo, try_expect, try_test,
};
pub use crate::matcher::{Matcher, MatcherKind, TextPattern, ThrowMatch};
pub use crate::report::{Reporter, SuiteReport};
pub use crate::runner::Runner;
pub use crate::suite::{SuiteContext, TestContext};
pub use crate::test::{ExpectationResult, TestRecord};
pub use crate::value::{Class, ClassDef, ErrorValue, Value};

pub mod compare;
pub mod errors;
pub mod expect;
pub mod global;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod suite;
pub mod value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}

/// Everything a test file usually needs.
pub mod prelude {
    pub use crate::global::*;
    pub use crate::report::{ConsoleReporter, JsonReporter, MemoryReporter, Reporter};
    pub use crate::value::{Class, ClassDef, ErrorValue, Value};
    pub use crate::{arr, obj, Runner, SuiteContext, TestContext};
}
