//! Fixture files: two inline OCR exports plus the diffs expected between them.
//!
//! ```toml
//! title = "Inserted negation"
//! lhs = '{"lines": [{"text": "Payment is due"}]}'
//! rhs = '{"lines": [{"text": "Payment is not due"}]}'
//! total_diffs = 1
//!
//! [[expect]]
//! op = "ins"
//! rhs = "not"
//! rhs_kind = "negation"
//! bucket = "critical"
//! ```

use std::fmt::Write;

use ocr_diff::OpKind;
use ocr_diff_report::{DiffRecord, SeverityBucket, ABSENT_KIND};
use serde::{Deserialize, Serialize};

use crate::errors::{SpecError, SpecResult};

/// A parsed fixture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffFixture {
    #[serde(default)]
    pub title: Option<String>,
    /// Pair id handed to the report; defaults to `"fixture"`.
    #[serde(default)]
    pub pair_id: Option<String>,
    /// Left OCR export as JSON text.
    pub lhs: String,
    /// Right OCR export as JSON text.
    pub rhs: String,
    /// Exact number of diffs, when the fixture pins it.
    #[serde(default)]
    pub total_diffs: Option<usize>,
    #[serde(default)]
    pub expect: Vec<ExpectedDiff>,
}

impl DiffFixture {
    pub fn pair_id(&self) -> &str {
        self.pair_id.as_deref().unwrap_or("fixture")
    }
}

/// One expected diff. Every field that is set must hold for some diff in
/// the report; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedDiff {
    #[serde(default)]
    pub op: Option<OpKind>,
    #[serde(default)]
    pub lhs: Option<String>,
    #[serde(default)]
    pub rhs: Option<String>,
    /// Category name, or `"∅"` for the missing side.
    #[serde(default)]
    pub lhs_kind: Option<String>,
    #[serde(default)]
    pub rhs_kind: Option<String>,
    #[serde(default)]
    pub bucket: Option<SeverityBucket>,
    #[serde(default)]
    pub min_severity: Option<f64>,
    #[serde(default)]
    pub max_severity: Option<f64>,
    #[serde(default)]
    pub why_contains: Option<String>,
}

fn kind_name(kind: Option<ocr_diff::Category>) -> &'static str {
    kind.map_or(ABSENT_KIND, |k| k.as_str())
}

impl ExpectedDiff {
    /// Fields of `diff` that contradict this expectation, as
    /// `(field, expected, actual)`.
    pub fn mismatches(&self, diff: &DiffRecord) -> Vec<(&'static str, String, String)> {
        let mut out = Vec::new();
        let mut check = |field: &'static str, expected: Option<String>, actual: String, ok: bool| {
            if let Some(expected) = expected {
                if !ok {
                    out.push((field, expected, actual));
                }
            }
        };

        check(
            "op",
            self.op.map(|op| op.as_str().to_string()),
            diff.op.as_str().to_string(),
            self.op.map_or(true, |op| op == diff.op),
        );
        check(
            "lhs",
            self.lhs.clone(),
            diff.lhs.clone(),
            self.lhs.as_ref().map_or(true, |l| *l == diff.lhs),
        );
        check(
            "rhs",
            self.rhs.clone(),
            diff.rhs.clone(),
            self.rhs.as_ref().map_or(true, |r| *r == diff.rhs),
        );
        check(
            "lhs_kind",
            self.lhs_kind.clone(),
            kind_name(diff.lhs_kind).to_string(),
            self.lhs_kind.as_deref().map_or(true, |k| k == kind_name(diff.lhs_kind)),
        );
        check(
            "rhs_kind",
            self.rhs_kind.clone(),
            kind_name(diff.rhs_kind).to_string(),
            self.rhs_kind.as_deref().map_or(true, |k| k == kind_name(diff.rhs_kind)),
        );
        check(
            "bucket",
            self.bucket.map(|b| b.to_string()),
            diff.severity_bucket.to_string(),
            self.bucket.map_or(true, |b| b == diff.severity_bucket),
        );
        check(
            "min_severity",
            self.min_severity.map(|s| format!(">= {}", s)),
            diff.severity.to_string(),
            self.min_severity.map_or(true, |s| diff.severity >= s),
        );
        check(
            "max_severity",
            self.max_severity.map(|s| format!("<= {}", s)),
            diff.severity.to_string(),
            self.max_severity.map_or(true, |s| diff.severity <= s),
        );
        check(
            "why_contains",
            self.why_contains.clone(),
            diff.why_it_matters.clone(),
            self.why_contains
                .as_ref()
                .map_or(true, |w| diff.why_it_matters.contains(w.as_str())),
        );

        out
    }

    pub fn matches(&self, diff: &DiffRecord) -> bool {
        self.mismatches(diff).is_empty()
    }

    /// Compact `field=value` rendering of the set fields.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let mut field = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                if !out.is_empty() {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}={}", name, value);
            }
        };
        field("op", self.op.map(|o| o.as_str().to_string()));
        field("lhs", self.lhs.as_ref().map(|s| format!("{:?}", s)));
        field("rhs", self.rhs.as_ref().map(|s| format!("{:?}", s)));
        field("lhs_kind", self.lhs_kind.clone());
        field("rhs_kind", self.rhs_kind.clone());
        field("bucket", self.bucket.map(|b| b.to_string()));
        field("min_severity", self.min_severity.map(|s| s.to_string()));
        field("max_severity", self.max_severity.map(|s| s.to_string()));
        field("why_contains", self.why_contains.as_ref().map(|s| format!("{:?}", s)));
        out
    }
}

/// Parse fixture TOML.
pub fn parse_fixture(content: &str) -> SpecResult<DiffFixture> {
    toml::from_str(content).map_err(|e| {
        let line = e
            .span()
            .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1)
            .unwrap_or(0);
        SpecError::Parse {
            line,
            message: e.message().to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocr_diff::Category;
    use ocr_diff_report::DiffLevel;

    fn diff() -> DiffRecord {
        DiffRecord {
            id: "d_00000".to_string(),
            op: OpKind::Insert,
            level: DiffLevel::Token,
            page: None,
            block_label: String::new(),
            line_index: Some(0),
            bbox: None,
            lhs: String::new(),
            rhs: "not".to_string(),
            lhs_kind: None,
            rhs_kind: Some(Category::Negation),
            severity: 0.61,
            severity_bucket: SeverityBucket::Critical,
            why_it_matters: "Negation term added/removed; obligation may invert.".to_string(),
            suggested_action: "Manual review".to_string(),
        }
    }

    #[test]
    fn parses_a_fixture() {
        let fixture = parse_fixture(
            r#"
title = "Inserted negation"
lhs = '{"lines": [{"text": "Payment is due"}]}'
rhs = '{"lines": [{"text": "Payment is not due"}]}'
total_diffs = 1

[[expect]]
op = "ins"
rhs = "not"
lhs_kind = "∅"
bucket = "critical"
"#,
        )
        .unwrap();

        assert_eq!(fixture.title.as_deref(), Some("Inserted negation"));
        assert_eq!(fixture.pair_id(), "fixture");
        assert_eq!(fixture.total_diffs, Some(1));
        assert_eq!(fixture.expect.len(), 1);
        assert_eq!(fixture.expect[0].op, Some(OpKind::Insert));
        assert_eq!(fixture.expect[0].bucket, Some(SeverityBucket::Critical));
        assert!(fixture.expect[0].matches(&diff()));
    }

    #[test]
    fn unset_fields_match_anything() {
        assert!(ExpectedDiff::default().matches(&diff()));
    }

    #[test]
    fn reports_each_contradicting_field() {
        let expected = ExpectedDiff {
            op: Some(OpKind::Substitute),
            rhs_kind: Some("negation".to_string()),
            max_severity: Some(0.2),
            ..Default::default()
        };
        let fields: Vec<_> = expected
            .mismatches(&diff())
            .into_iter()
            .map(|(field, _, _)| field)
            .collect();
        assert_eq!(fields, vec!["op", "max_severity"]);
    }

    #[test]
    fn describes_set_fields() {
        let expected = ExpectedDiff {
            op: Some(OpKind::Delete),
            lhs: Some(",".to_string()),
            bucket: Some(SeverityBucket::Low),
            ..Default::default()
        };
        assert_eq!(expected.describe(), r#"op=del, lhs=",", bucket=low"#);
    }

    #[test]
    fn unknown_expectation_keys_are_rejected() {
        let err = parse_fixture(
            "lhs = '{}'\nrhs = '{}'\n\n[[expect]]\nseverity_bucket = \"low\"\n",
        )
        .unwrap_err();
        match err {
            SpecError::Parse { line, .. } => assert!(line >= 4, "line {}", line),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_documents_are_a_parse_error() {
        let err = parse_fixture("title = \"no inputs\"").unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));
    }
}
