use std::fmt::{self, Write};

use crate::report::{DiffRecord, Report, ABSENT_KIND};

// pair: invoice-7
// critical 1 · medium 0 · low 1 · total 2
//
// d_00000  critical  0.650  sub  number→number  "500.00" → "550.00"  (page 1, line 2, block totals)
//          Numeric value changed; verify totals/limits/quantities.
pub struct ReportDisplay<'a> {
    report: &'a Report,
    explanations: bool,
}

impl<'a> ReportDisplay<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            explanations: true,
        }
    }

    /// Omit the explanation line under each diff.
    pub fn compact(mut self) -> Self {
        self.explanations = false;
        self
    }
}

fn kind_name(kind: Option<ocr_diff::Category>) -> &'static str {
    kind.map_or(ABSENT_KIND, |k| k.as_str())
}

fn location(diff: &DiffRecord) -> String {
    let mut parts = Vec::new();
    if let Some(page) = diff.page {
        parts.push(format!("page {}", page));
    }
    if let Some(line) = diff.line_index {
        parts.push(format!("line {}", line));
    }
    if !diff.block_label.is_empty() {
        parts.push(format!("block {}", diff.block_label));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("  ({})", parts.join(", "))
    }
}

impl<'a> fmt::Display for ReportDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const INDENT: usize = 9;

        let summary = &self.report.summary;
        writeln!(f, "pair: {}", self.report.document_pair_id)?;
        write!(
            f,
            "critical {} · medium {} · low {} · total {}",
            summary.critical, summary.medium, summary.low, self.report.totals.diffs
        )?;

        if self.report.diffs.is_empty() {
            return Ok(());
        }
        f.write_char('\n')?;

        for diff in &self.report.diffs {
            write!(
                f,
                "\n{}  {:<8}  {:.3}  {:<3}  {}→{}  {:?} → {:?}{}",
                diff.id,
                diff.severity_bucket.as_str(),
                diff.severity,
                diff.op.as_str(),
                kind_name(diff.lhs_kind),
                kind_name(diff.rhs_kind),
                diff.lhs,
                diff.rhs,
                location(diff),
            )?;
            if self.explanations {
                write!(f, "\n{:indent$}{}", "", diff.why_it_matters, indent = INDENT)?;
            }
        }

        Ok(())
    }
}
