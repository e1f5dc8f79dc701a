//! Expected failures tracked in a TOML file next to the fixtures.
//!
//! ```toml
//! [[pending]]
//! fixture = "unit-swap.toml"
//! assertion = "E0"
//! reason = "unit tables not yet split by dimension"
//! added = "2026-10-01"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{SpecError, SpecResult};

/// Assertion reference used for a fixture's `total_diffs` check.
pub const TOTAL_REF: &str = "total";

/// Loaded expected failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known limitations.
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Failures awaiting a fix.
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture path relative to the fixtures directory.
    pub fixture: String,
    /// `E{n}` for the n-th `[[expect]]` block, or `total`.
    pub assertion: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
}

impl FailureEntry {
    fn is(&self, fixture: &str, assertion_ref: &str) -> bool {
        self.fixture == fixture && self.assertion == assertion_ref
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    Known,
    Pending,
    /// Not listed anywhere: the failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file means nothing is expected to fail.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            SpecError::Parse { line, message } => SpecError::Parse {
                line,
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> SpecResult<Self> {
        toml::from_str(content).map_err(|e| SpecError::Parse {
            line: e
                .span()
                .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1)
                .unwrap_or(0),
            message: e.message().to_string(),
        })
    }

    pub fn is_expected(&self, fixture: &str, assertion_ref: &str) -> FailureState {
        if self.known.iter().any(|e| e.is(fixture, assertion_ref)) {
            FailureState::Known
        } else if self.pending.iter().any(|e| e.is(fixture, assertion_ref)) {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    /// Reference for the `index`-th expectation of a fixture.
    pub fn format_ref(index: usize) -> String {
        format!("E{}", index)
    }

    /// Fixtures with at least one expected failure, sorted and deduplicated.
    pub fn all_fixtures(&self) -> Vec<&str> {
        let mut fixtures: Vec<_> = self
            .known
            .iter()
            .chain(&self.pending)
            .map(|e| e.fixture.as_str())
            .collect();
        fixtures.sort_unstable();
        fixtures.dedup();
        fixtures
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, fixture: &str, assertion_ref: &str) -> Option<&FailureEntry> {
        self.known
            .iter()
            .chain(&self.pending)
            .find(|e| e.is(fixture, assertion_ref))
    }
}

/// Tally of a harness run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessResult {
    pub total: usize,
    pub passed: usize,
    /// Failures listed as known or pending.
    pub expected_failures: usize,
    pub regressions: usize,
    /// Listed failures that passed; the entry can be removed.
    pub fixed: Vec<(String, String)>,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0 when there are no regressions, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.regressions > 0 {
            1
        } else {
            0
        }
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }

    pub fn record_fixed(&mut self, fixture: &str, assertion_ref: &str) {
        self.fixed
            .push((fixture.to_string(), assertion_ref.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(fixture: &str, assertion: &str) -> FailureEntry {
        FailureEntry {
            fixture: fixture.to_string(),
            assertion: assertion.to_string(),
            reason: None,
            added: None,
            issue: None,
        }
    }

    #[test]
    fn unlisted_failures_are_regressions() {
        let failures = ExpectedFailures::default();
        assert_eq!(failures.count(), 0);
        assert_eq!(
            failures.is_expected("unit-swap.toml", "E0"),
            FailureState::Regression
        );
    }

    #[test]
    fn known_wins_over_pending() {
        let failures = ExpectedFailures {
            known: vec![entry("a.toml", "E1")],
            pending: vec![entry("a.toml", "E1"), entry("a.toml", TOTAL_REF)],
        };
        assert_eq!(failures.is_expected("a.toml", "E1"), FailureState::Known);
        assert_eq!(
            failures.is_expected("a.toml", TOTAL_REF),
            FailureState::Pending
        );
        assert_eq!(
            failures.is_expected("b.toml", "E1"),
            FailureState::Regression
        );
    }

    #[test]
    fn formats_expectation_refs() {
        assert_eq!(ExpectedFailures::format_ref(0), "E0");
        assert_eq!(ExpectedFailures::format_ref(12), "E12");
    }

    #[test]
    fn tallies_a_run() {
        let mut result = HarnessResult::new();
        assert_eq!(result.exit_code(), 0);

        result.record_pass();
        result.record_failure(FailureState::Pending);
        assert!(result.success());

        result.record_failure(FailureState::Regression);
        assert_eq!((result.total, result.passed), (3, 1));
        assert_eq!((result.expected_failures, result.regressions), (1, 1));
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn loads_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[pending]]
fixture = "unit-swap.toml"
assertion = "E0"
reason = "Awaiting unit dimensions"
added = "2026-10-01"

[[known]]
fixture = "comma-removal.toml"
assertion = "total"
"#
        )
        .unwrap();

        let failures = ExpectedFailures::load(file.path()).unwrap();
        assert_eq!(failures.count(), 2);
        assert_eq!(
            failures.get_entry("unit-swap.toml", "E0").and_then(|e| e.added.as_deref()),
            Some("2026-10-01")
        );
        assert_eq!(
            failures.all_fixtures(),
            vec!["comma-removal.toml", "unit-swap.toml"]
        );
    }

    #[test]
    fn missing_file_expects_nothing() {
        let failures = ExpectedFailures::load(Path::new("/nonexistent/expected.toml")).unwrap();
        assert_eq!(failures.count(), 0);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = ExpectedFailures::from_toml_str("[[known]]\nassertion = \"E0\"\n").unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));
    }
}
