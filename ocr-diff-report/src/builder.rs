//! Report assembly: lines, line pairs, token alignment, scoring.

use std::path::Path;

use tracing::{debug, instrument, trace};

use ocr_diff::{align_tokens, AlignmentOp};
use ocr_diff_document::{align_lines, Document, LineRecord};

use crate::config::ScoringConfig;
use crate::error::DiffResult;
use crate::explanation::{suggested_action, Explanation};
use crate::report::{DiffLevel, DiffRecord, Report};
use crate::severity::SeverityScorer;

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Builds [`Report`]s with a fixed scoring configuration.
///
/// A builder holds no per-comparison state, so one instance can serve any
/// number of document pairs, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    scorer: SeverityScorer,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            scorer: SeverityScorer::new(config),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    /// Compare two parsed documents.
    pub fn build(&self, lhs: &Document, rhs: &Document, pair_id: &str) -> Report {
        self.build_from_lines(&lhs.lines(), &rhs.lines(), pair_id)
    }

    /// Compare two already extracted line sequences.
    #[instrument(skip_all, fields(pair_id = %pair_id))]
    pub fn build_from_lines(
        &self,
        lhs_lines: &[LineRecord],
        rhs_lines: &[LineRecord],
        pair_id: &str,
    ) -> Report {
        let pairs = align_lines(lhs_lines, rhs_lines);
        debug!(
            lhs_lines = lhs_lines.len(),
            rhs_lines = rhs_lines.len(),
            pairs = pairs.len(),
            "aligned document lines"
        );

        let mut report = Report::new(pair_id);
        for pair in &pairs {
            let (lhs_tokens, rhs_tokens) = pair.tokenize();
            let alignment = align_tokens(&lhs_tokens, &rhs_tokens);
            for op in alignment.changes() {
                let record = self.record(report.diffs.len(), op, &pair.lhs, &pair.rhs);
                trace!(
                    id = %record.id,
                    op = record.op.as_str(),
                    lhs = %record.lhs,
                    rhs = %record.rhs,
                    severity = record.severity,
                    "diff"
                );
                report.push(record);
            }
        }

        debug!(
            critical = report.summary.critical,
            medium = report.summary.medium,
            low = report.summary.low,
            "report built"
        );
        report
    }

    /// Parse two JSON exports and compare them. Parse failures abort before
    /// any comparison work.
    pub fn build_from_json(&self, lhs: &str, rhs: &str, pair_id: &str) -> DiffResult<Report> {
        let lhs = Document::parse(lhs)?;
        let rhs = Document::parse(rhs)?;
        Ok(self.build(&lhs, &rhs, pair_id))
    }

    pub fn build_from_files(&self, lhs: &Path, rhs: &Path, pair_id: &str) -> DiffResult<Report> {
        let lhs = Document::load(lhs)?;
        let rhs = Document::load(rhs)?;
        Ok(self.build(&lhs, &rhs, pair_id))
    }

    fn record(
        &self,
        seq: usize,
        op: &AlignmentOp<'_>,
        lhs_line: &LineRecord,
        rhs_line: &LineRecord,
    ) -> DiffRecord {
        let severity = self.scorer.score(op, lhs_line, rhs_line);
        let (lhs, rhs) = (op.lhs(), op.rhs());
        let sides = || lhs.into_iter().chain(rhs);
        // Tokens carry their line's provenance, so the first token with a
        // value covers the line fallback too.
        let block_label = sides()
            .map(|t| t.block_label.as_str())
            .find(|label| !label.is_empty())
            .unwrap_or_default()
            .to_string();

        DiffRecord {
            id: DiffRecord::format_id(seq),
            op: op.kind(),
            level: DiffLevel::Token,
            page: sides().find_map(|t| t.page),
            block_label,
            line_index: sides().map(|t| t.line_index).next(),
            bbox: sides().find_map(|t| t.bbox),
            lhs: lhs.map(|t| t.text.clone()).unwrap_or_default(),
            rhs: rhs.map(|t| t.text.clone()).unwrap_or_default(),
            lhs_kind: lhs.map(|t| t.kind),
            rhs_kind: rhs.map(|t| t.kind),
            severity: round3(severity.score),
            severity_bucket: severity.bucket,
            why_it_matters: Explanation::for_change(lhs, rhs).to_string(),
            suggested_action: suggested_action(severity.bucket).to_string(),
        }
    }
}

/// Compare two parsed documents with the default scoring configuration.
pub fn build_report(lhs: &Document, rhs: &Document, pair_id: &str) -> Report {
    ReportBuilder::new().build(lhs, rhs, pair_id)
}

pub fn build_report_from_json(lhs: &str, rhs: &str, pair_id: &str) -> DiffResult<Report> {
    ReportBuilder::new().build_from_json(lhs, rhs, pair_id)
}

pub fn build_report_from_files(lhs: &Path, rhs: &Path, pair_id: &str) -> DiffResult<Report> {
    ReportBuilder::new().build_from_files(lhs, rhs, pair_id)
}
