//! Fixture-driven regression harness for `ocr-diff` reports.
//!
//! Each fixture is a TOML file holding two inline OCR exports and the diffs
//! expected between them. The harness builds the report for every fixture,
//! checks each `[[expect]]` block against its diffs, and classifies failures
//! against `expected_failures.toml`: listed failures are tolerated, anything
//! else is a regression.
//!
//! ## Modules
//!
//! - [`fixture`] - fixture format and expectation matching
//! - [`loader`] - fixture discovery on disk
//! - [`runner`] - report building and expectation checks
//! - [`failures`] - expected failures tracking
//! - [`formatter`] - failure and summary rendering
//! - [`errors`] - error types

pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult, TOTAL_REF};
pub use fixture::{parse_fixture, DiffFixture, ExpectedDiff};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use runner::{
    check_expectation, run_fixture, run_harness, ExpectationOutcome, ExpectationResult,
    FieldMismatch, FixtureRun, HarnessRun,
};
