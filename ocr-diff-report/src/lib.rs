//! Severity scoring and structured reports for OCR export pairs.
//!
//! Builds on `ocr-diff` (tokens and alignment) and `ocr-diff-document`
//! (export trees and line pairing):
//!
//! - [`SeverityScorer`] - Scores one token-level change in `[0, 1]`
//! - [`Explanation`] - Why a change matters, chosen by category
//! - [`Report`] / [`DiffRecord`] - Serializable comparison output
//! - [`ReportBuilder`] - Runs the whole pipeline for one document pair
//! - [`ReportDisplay`] - Human-readable rendering of a report
//!
//! ## Example
//!
//! ```
//! use ocr_diff_report::{build_report_from_json, SeverityBucket};
//!
//! let report = build_report_from_json(
//!     r#"{"lines": [{"text": "Payment is due"}]}"#,
//!     r#"{"lines": [{"text": "Payment is not due"}]}"#,
//!     "example",
//! )
//! .unwrap();
//!
//! assert_eq!(report.totals.diffs, 1);
//! assert_eq!(report.diffs[0].rhs, "not");
//! assert_eq!(report.diffs[0].severity_bucket, SeverityBucket::Critical);
//! ```

mod builder;
mod config;
mod display;
mod error;
mod explanation;
mod report;
mod severity;

pub use builder::{build_report, build_report_from_files, build_report_from_json, ReportBuilder};
pub use config::{
    BucketThresholds, ComponentWeights, ConfigError, ImpactScores, PositionConfig, RuleBumps,
    ScoringConfig,
};
pub use display::ReportDisplay;
pub use error::{DiffError, DiffResult};
pub use explanation::{suggested_action, Explanation, ACCEPT_OR_IGNORE, MANUAL_REVIEW};
pub use report::{DiffLevel, DiffRecord, Report, Summary, Totals, ABSENT_KIND};
pub use severity::{Severity, SeverityBucket, SeverityComponents, SeverityScorer};
