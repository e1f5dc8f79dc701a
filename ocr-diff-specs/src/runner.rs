//! Runs fixtures through the report builder and checks their expectations.

use ocr_diff_report::{DiffRecord, Report, ReportBuilder};

use crate::errors::{SpecError, SpecResult};
use crate::failures::{ExpectedFailures, FailureState, HarnessResult, TOTAL_REF};
use crate::fixture::{DiffFixture, ExpectedDiff};
use crate::formatter::format_failure;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpectationOutcome {
    /// Satisfied; `diff_id` names the first matching diff, if the check was
    /// about one.
    Passed { diff_id: Option<String> },
    /// No diff satisfies the expectation. `closest_id` is the diff with the
    /// fewest contradicting fields.
    Mismatched {
        closest_id: String,
        fields: Vec<FieldMismatch>,
    },
    /// The report has no diffs to match against.
    NoDiffs,
    CountMismatch { expected: usize, actual: usize },
}

impl ExpectationOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, ExpectationOutcome::Passed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationResult {
    /// `E{n}` or `total`; the key used in the expected failures file.
    pub reference: String,
    pub description: String,
    pub outcome: ExpectationOutcome,
}

/// A fixture's report together with the outcome of each of its checks.
#[derive(Debug, Clone)]
pub struct FixtureRun {
    pub report: Report,
    pub results: Vec<ExpectationResult>,
}

impl FixtureRun {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.passed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.results.iter().filter(|r| !r.outcome.passed())
    }
}

/// Check one expectation against every diff of a report. Expectations are
/// independent: two of them may be satisfied by the same diff.
pub fn check_expectation(expected: &ExpectedDiff, diffs: &[DiffRecord]) -> ExpectationOutcome {
    let mut closest: Option<(&DiffRecord, Vec<(&'static str, String, String)>)> = None;

    for diff in diffs {
        let mismatches = expected.mismatches(diff);
        if mismatches.is_empty() {
            return ExpectationOutcome::Passed {
                diff_id: Some(diff.id.clone()),
            };
        }
        if closest
            .as_ref()
            .map_or(true, |(_, best)| mismatches.len() < best.len())
        {
            closest = Some((diff, mismatches));
        }
    }

    match closest {
        Some((diff, mismatches)) => ExpectationOutcome::Mismatched {
            closest_id: diff.id.clone(),
            fields: mismatches
                .into_iter()
                .map(|(field, expected, actual)| FieldMismatch {
                    field,
                    expected,
                    actual,
                })
                .collect(),
        },
        None => ExpectationOutcome::NoDiffs,
    }
}

/// Build the fixture's report and check every expectation, then the diff
/// count when the fixture pins one.
pub fn run_fixture(fixture: &DiffFixture, builder: &ReportBuilder) -> SpecResult<FixtureRun> {
    let report = builder
        .build_from_json(&fixture.lhs, &fixture.rhs, fixture.pair_id())
        .map_err(|e| SpecError::Assertion {
            message: format!("fixture documents did not load: {}", e),
        })?;

    let mut results: Vec<_> = fixture
        .expect
        .iter()
        .enumerate()
        .map(|(index, expected)| ExpectationResult {
            reference: ExpectedFailures::format_ref(index),
            description: expected.describe(),
            outcome: check_expectation(expected, &report.diffs),
        })
        .collect();

    if let Some(expected) = fixture.total_diffs {
        let actual = report.diffs.len();
        results.push(ExpectationResult {
            reference: TOTAL_REF.to_string(),
            description: format!("total_diffs={}", expected),
            outcome: if actual == expected {
                ExpectationOutcome::Passed { diff_id: None }
            } else {
                ExpectationOutcome::CountMismatch { expected, actual }
            },
        });
    }

    Ok(FixtureRun { report, results })
}

/// Outcome of a harness run: the tally plus a rendered message per
/// regression.
#[derive(Debug, Clone, Default)]
pub struct HarnessRun {
    pub result: HarnessResult,
    pub regressions: Vec<String>,
}

/// Run every fixture, classifying failures against the expected failures
/// list. A fixture whose documents fail to load counts as a regression.
pub fn run_harness(
    fixtures: &[(String, DiffFixture)],
    builder: &ReportBuilder,
    expected: &ExpectedFailures,
) -> HarnessRun {
    let mut run = HarnessRun::default();

    for (name, fixture) in fixtures {
        let fixture_run = match run_fixture(fixture, builder) {
            Ok(fixture_run) => fixture_run,
            Err(err) => {
                run.result.record_failure(FailureState::Regression);
                run.regressions.push(format!("\nFAIL: {}\n\n  {}\n", name, err));
                continue;
            }
        };

        for result in &fixture_run.results {
            let state = expected.is_expected(name, &result.reference);
            if result.outcome.passed() {
                run.result.record_pass();
                if state != FailureState::Regression {
                    run.result.record_fixed(name, &result.reference);
                }
                continue;
            }
            run.result.record_failure(state);
            if state == FailureState::Regression {
                run.regressions
                    .push(format_failure(name, result, &fixture_run.report));
            }
        }
    }

    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failures::FailureEntry;
    use crate::fixture::parse_fixture;
    use ocr_diff::OpKind;
    use ocr_diff_report::SeverityBucket;

    const NEGATION: &str = r#"
lhs = '{"lines": [{"text": "Payment is due"}]}'
rhs = '{"lines": [{"text": "Payment is not due"}]}'
total_diffs = 1

[[expect]]
op = "ins"
rhs = "not"
bucket = "critical"

[[expect]]
op = "del"
"#;

    fn negation() -> DiffFixture {
        parse_fixture(NEGATION).unwrap()
    }

    #[test]
    fn checks_each_expectation_and_the_count() {
        let run = run_fixture(&negation(), &ReportBuilder::new()).unwrap();
        let refs: Vec<_> = run.results.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["E0", "E1", "total"]);

        assert_eq!(
            run.results[0].outcome,
            ExpectationOutcome::Passed {
                diff_id: Some("d_00000".to_string())
            }
        );
        assert_eq!(
            run.results[1].outcome,
            ExpectationOutcome::Mismatched {
                closest_id: "d_00000".to_string(),
                fields: vec![FieldMismatch {
                    field: "op",
                    expected: "del".to_string(),
                    actual: "ins".to_string(),
                }],
            }
        );
        assert!(run.results[2].outcome.passed());
        assert!(!run.all_passed());
        assert_eq!(run.failed().count(), 1);
    }

    #[test]
    fn count_mismatch_is_reported() {
        let mut fixture = negation();
        fixture.total_diffs = Some(3);
        fixture.expect.clear();
        let run = run_fixture(&fixture, &ReportBuilder::new()).unwrap();
        assert_eq!(
            run.results[0].outcome,
            ExpectationOutcome::CountMismatch {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn no_diffs_to_match() {
        let expected = ExpectedDiff {
            op: Some(OpKind::Substitute),
            ..Default::default()
        };
        assert_eq!(check_expectation(&expected, &[]), ExpectationOutcome::NoDiffs);
    }

    #[test]
    fn closest_diff_has_fewest_mismatches() {
        let fixture = parse_fixture(
            r#"
lhs = '{"lines": [{"text": "5 kg, total 10"}]}'
rhs = '{"lines": [{"text": "5 lb total 12"}]}'
"#,
        )
        .unwrap();
        let run = run_fixture(&fixture, &ReportBuilder::new()).unwrap();
        assert_eq!(run.report.diffs.len(), 3);

        let expected = ExpectedDiff {
            op: Some(OpKind::Substitute),
            lhs: Some("10".to_string()),
            bucket: Some(SeverityBucket::Low),
            ..Default::default()
        };
        match check_expectation(&expected, &run.report.diffs) {
            ExpectationOutcome::Mismatched { closest_id, fields } => {
                assert_eq!(closest_id, "d_00002");
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "bucket");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn unloadable_documents_are_an_error() {
        let fixture = parse_fixture("lhs = '{\"text\": '\nrhs = '{}'\n").unwrap();
        let err = run_fixture(&fixture, &ReportBuilder::new()).unwrap_err();
        assert!(matches!(err, SpecError::Assertion { .. }));
    }

    #[test]
    fn harness_separates_expected_failures_from_regressions() {
        let fixtures = vec![("negation.toml".to_string(), negation())];
        let builder = ReportBuilder::new();

        let run = run_harness(&fixtures, &builder, &ExpectedFailures::default());
        assert_eq!(run.result.total, 3);
        assert_eq!(run.result.regressions, 1);
        assert_eq!(run.regressions.len(), 1);
        assert!(run.regressions[0].contains("FAIL: negation.toml E1"));

        let expected = ExpectedFailures {
            known: vec![],
            pending: vec![
                FailureEntry {
                    fixture: "negation.toml".to_string(),
                    assertion: "E1".to_string(),
                    reason: Some("deletion side not modelled".to_string()),
                    added: None,
                    issue: None,
                },
                FailureEntry {
                    fixture: "negation.toml".to_string(),
                    assertion: "E0".to_string(),
                    reason: None,
                    added: None,
                    issue: None,
                },
            ],
        };
        let run = run_harness(&fixtures, &builder, &expected);
        assert!(run.result.success());
        assert_eq!(run.result.expected_failures, 1);
        assert_eq!(
            run.result.fixed,
            vec![("negation.toml".to_string(), "E0".to_string())]
        );
    }
}
