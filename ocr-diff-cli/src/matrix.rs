//! Every-pair comparison of a set of OCR exports.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, instrument};

use ocr_diff_document::{Document, LineRecord};
use ocr_diff_report::ReportBuilder;

const CORNER: &str = "lhs \\ rhs";
const GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixCell {
    pub critical: usize,
    pub total: usize,
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.critical, self.total)
    }
}

// lhs \ rhs  run_5  run_10
// run_5      -      1/1
// run_10     1/1    -
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMatrix {
    labels: Vec<String>,
    /// Row = left document, column = right document; the diagonal is `None`.
    cells: Vec<Vec<Option<MatrixCell>>>,
}

impl DiffMatrix {
    /// Row and column labels for `files`: the file stem, or the full path
    /// when two files share a stem.
    pub fn labels_for(files: &[PathBuf]) -> Vec<String> {
        let stems: Vec<String> = files
            .iter()
            .map(|p| {
                p.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect();
        let mut seen = HashSet::new();
        let unique = stems.iter().all(|s| seen.insert(s.as_str()));
        if unique {
            stems
        } else {
            files.iter().map(|p| p.display().to_string()).collect()
        }
    }

    /// Build a report for every ordered pair of distinct documents.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn compute(documents: &[(String, Document)], builder: &ReportBuilder) -> Self {
        let lines: Vec<Vec<LineRecord>> = documents.iter().map(|(_, doc)| doc.lines()).collect();

        let cells = documents
            .iter()
            .enumerate()
            .map(|(i, (lhs, _))| {
                documents
                    .iter()
                    .enumerate()
                    .map(|(j, (rhs, _))| {
                        if i == j {
                            return None;
                        }
                        let pair_id = format!("{}__vs__{}", lhs, rhs);
                        let report = builder.build_from_lines(&lines[i], &lines[j], &pair_id);
                        Some(MatrixCell {
                            critical: report.summary.critical,
                            total: report.totals.diffs,
                        })
                    })
                    .collect()
            })
            .collect();

        debug!("matrix computed");
        Self {
            labels: documents.iter().map(|(label, _)| label.clone()).collect(),
            cells,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn cell(&self, lhs: usize, rhs: usize) -> Option<MatrixCell> {
        self.cells.get(lhs).and_then(|row| row.get(rhs)).copied().flatten()
    }
}

fn cell_text(cell: Option<MatrixCell>) -> String {
    cell.map_or_else(|| "-".to_string(), |c| c.to_string())
}

impl fmt::Display for DiffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first_width = self
            .labels
            .iter()
            .map(|l| l.chars().count())
            .chain([CORNER.len()])
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = (0..self.labels.len())
            .map(|j| {
                self.cells
                    .iter()
                    .map(|row| cell_text(row[j]).chars().count())
                    .chain([self.labels[j].chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |first: &str, rest: Vec<String>| {
            let mut line = format!("{:<width$}", first, width = first_width);
            for (text, width) in rest.iter().zip(&widths) {
                line.push_str(GAP);
                line.push_str(&format!("{:<width$}", text, width = *width));
            }
            line.trim_end().to_string()
        };

        f.write_str(&render(CORNER, self.labels.clone()))?;
        for (label, row) in self.labels.iter().zip(&self.cells) {
            f.write_str("\n")?;
            f.write_str(&render(label, row.iter().map(|c| cell_text(*c)).collect()))?;
        }
        Ok(())
    }
}
