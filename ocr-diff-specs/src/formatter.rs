//! Failure and summary rendering for harness output.

use std::fmt::Write;

use ocr_diff_report::{DiffRecord, Report, ReportDisplay};

use crate::runner::{ExpectationOutcome, ExpectationResult};

fn find<'r>(report: &'r Report, id: &str) -> Option<&'r DiffRecord> {
    report.diffs.iter().find(|d| d.id == id)
}

/// Render one failed check with the diff it came closest to.
pub fn format_failure(fixture_name: &str, result: &ExpectationResult, report: &Report) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "\nFAIL: {} {}", fixture_name, result.reference);
    let _ = writeln!(output);
    let _ = writeln!(output, "  expected: {}", result.description);

    match &result.outcome {
        ExpectationOutcome::Mismatched { closest_id, fields } => {
            match find(report, closest_id) {
                Some(diff) => {
                    let _ = writeln!(
                        output,
                        "  closest diff {}: {} {:?} → {:?}",
                        diff.id,
                        diff.op.as_str(),
                        diff.lhs,
                        diff.rhs
                    );
                }
                None => {
                    let _ = writeln!(output, "  closest diff {}", closest_id);
                }
            }
            for field in fields {
                let _ = writeln!(
                    output,
                    "    \u{2717} {}: expected `{}`, found `{}`",
                    field.field, field.expected, field.actual
                );
            }
        }
        ExpectationOutcome::NoDiffs => {
            let _ = writeln!(output, "  the report has no diffs");
        }
        ExpectationOutcome::CountMismatch { expected, actual } => {
            let _ = writeln!(output, "  expected {} diffs, found {}", expected, actual);
            let _ = writeln!(output);
            for line in ReportDisplay::new(report).compact().to_string().lines() {
                if line.is_empty() {
                    let _ = writeln!(output);
                } else {
                    let _ = writeln!(output, "  {}", line);
                }
            }
        }
        ExpectationOutcome::Passed { .. } => {
            let _ = writeln!(output, "  (passed)");
        }
    }

    if let Some(hint) = generate_hint(result) {
        let _ = writeln!(output);
        let _ = writeln!(output, "  hint: {}", hint);
    }

    output
}

/// One status block per fixture or per run.
pub fn format_summary(
    name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let status = if regressions > 0 { "FAIL" } else { "PASS" };
    format!(
        "\n{}: {}\n  {} passed, {} failed ({} expected, {} regressions)\n",
        status, name, passed, failed, expected_failures, regressions
    )
}

fn generate_hint(result: &ExpectationResult) -> Option<String> {
    match &result.outcome {
        ExpectationOutcome::Mismatched { fields, .. } => {
            for field in fields {
                match field.field {
                    "bucket" | "min_severity" | "max_severity" => {
                        return Some(
                            "severities are rounded to three decimals; buckets follow the configured thresholds"
                                .to_string(),
                        )
                    }
                    "lhs_kind" | "rhs_kind" if field.expected == "∅" || field.actual == "∅" => {
                        return Some(
                            "`∅` marks the missing side of an insertion or deletion".to_string(),
                        )
                    }
                    _ => {}
                }
            }
            None
        }
        ExpectationOutcome::NoDiffs => Some(
            "both documents produced the same tokens; check the text keys of the OCR export"
                .to_string(),
        ),
        _ => None,
    }
}
