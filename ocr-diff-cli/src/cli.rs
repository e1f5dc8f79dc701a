//! Argument parsing and command execution.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use ocr_diff::{align_tokens, AlignmentDisplay};
use ocr_diff_document::{align_lines, Document};
use ocr_diff_report::{ReportBuilder, ReportDisplay, ScoringConfig};

use crate::matrix::DiffMatrix;

/// ocr-diff - context-aware comparison of OCR exports
#[derive(Parser, Debug)]
#[command(name = "ocr-diff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two OCR exports
    Compare(CompareArgs),

    /// Compare every ordered pair of OCR exports
    Matrix {
        /// OCR export files (JSON)
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,

        /// Scoring configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Left (reference) OCR export
    pub lhs: PathBuf,

    /// Right (candidate) OCR export
    pub rhs: PathBuf,

    /// Identifier recorded in the report
    #[arg(long, default_value = "run")]
    pub pair_id: String,

    /// Also write the JSON report to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Printed format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Scoring configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON report
    Json,
    /// Summary, one row per diff, and the token alignment of each changed line
    Text,
}

impl Cli {
    /// Run the command, printing to stdout.
    pub fn execute(self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run(&mut out)
    }

    pub fn run(self, out: &mut dyn Write) -> Result<()> {
        match self.command {
            Commands::Compare(args) => compare(&args, out),
            Commands::Matrix { files, config } => matrix(&files, config.as_deref(), out),
        }
    }
}

fn builder(config: Option<&Path>) -> Result<ReportBuilder> {
    match config {
        Some(path) => {
            let config = ScoringConfig::load(path)
                .with_context(|| format!("loading scoring config {}", path.display()))?;
            Ok(ReportBuilder::with_config(config))
        }
        None => Ok(ReportBuilder::new()),
    }
}

fn load(path: &Path) -> Result<Document> {
    Document::load(path).with_context(|| format!("loading OCR export {}", path.display()))
}

fn compare(args: &CompareArgs, out: &mut dyn Write) -> Result<()> {
    let builder = builder(args.config.as_deref())?;
    let lhs = load(&args.lhs)?;
    let rhs = load(&args.rhs)?;

    let report = builder.build(&lhs, &rhs, &args.pair_id);
    let json = report.to_json_pretty().context("serializing report")?;

    if let Some(path) = &args.output {
        fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
        info!(
            path = %path.display(),
            diffs = report.totals.diffs,
            critical = report.summary.critical,
            "wrote report"
        );
    }

    match args.format {
        OutputFormat::Json => writeln!(out, "{}", json)?,
        OutputFormat::Text => {
            writeln!(out, "{}", ReportDisplay::new(&report))?;
            write_alignments(out, &lhs, &rhs)?;
        }
    }
    Ok(())
}

/// One block per changed line pair: the line's path, then its token
/// alignment.
fn write_alignments(out: &mut dyn Write, lhs: &Document, rhs: &Document) -> io::Result<()> {
    let (lhs_lines, rhs_lines) = (lhs.lines(), rhs.lines());
    for pair in align_lines(&lhs_lines, &rhs_lines) {
        if pair.is_unchanged() {
            continue;
        }
        let (left, right) = pair.tokenize();
        let alignment = align_tokens(&left, &right);
        if alignment.changes().next().is_none() {
            continue;
        }
        let path = if pair.lhs.is_placeholder() {
            pair.rhs.path_string()
        } else {
            pair.lhs.path_string()
        };
        writeln!(out, "\n{}", path)?;
        writeln!(out, "{}", AlignmentDisplay::new(&alignment))?;
    }
    Ok(())
}

fn matrix(files: &[PathBuf], config: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    if files.len() < 2 {
        bail!("matrix needs at least two OCR exports");
    }
    let builder = builder(config)?;
    let labels = DiffMatrix::labels_for(files);
    let documents = files
        .iter()
        .zip(labels)
        .map(|(path, label)| -> Result<(String, Document)> { Ok((label, load(path)?)) })
        .collect::<Result<Vec<_>>>()?;

    let matrix = DiffMatrix::compute(&documents, &builder);
    writeln!(out, "{}", matrix)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocr_diff_report::{Report, SeverityBucket};

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args.iter().copied())?;
        let mut out = Vec::new();
        cli.run(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn exports(dir: &Path) -> (String, String) {
        let lhs = write(dir, "run_5.json", r#"{"lines": [{"text": "Payment is due"}]}"#);
        let rhs = write(dir, "run_10.json", r#"{"lines": [{"text": "Payment is not due"}]}"#);
        (lhs.display().to_string(), rhs.display().to_string())
    }

    #[test]
    fn compare_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let (lhs, rhs) = exports(dir.path());

        let output = run(&["ocr-diff", "compare", &lhs, &rhs]).unwrap();
        let report = Report::from_json(&output).unwrap();
        assert_eq!(report.document_pair_id, "run");
        assert_eq!(report.diffs.len(), 1);
        assert_eq!(report.diffs[0].severity_bucket, SeverityBucket::Critical);
    }

    #[test]
    fn compare_writes_the_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let (lhs, rhs) = exports(dir.path());
        let target = dir.path().join("report.json");
        let target_arg = target.display().to_string();

        let printed = run(&[
            "ocr-diff", "compare", &lhs, &rhs, "--pair-id", "run_vs_code", "-o", &target_arg,
        ])
        .unwrap();
        let written = fs::read_to_string(&target).unwrap();
        assert_eq!(printed.trim_end(), written);
        assert_eq!(
            Report::from_json(&written).unwrap().document_pair_id,
            "run_vs_code"
        );
    }

    #[test]
    fn compare_prints_text_with_alignments() {
        let dir = tempfile::tempdir().unwrap();
        let (lhs, rhs) = exports(dir.path());

        let output = run(&["ocr-diff", "compare", &lhs, &rhs, "--format", "text"]).unwrap();
        assert!(output.starts_with("pair: run\ncritical 1 · medium 0 · low 0 · total 1\n"));
        assert!(output.contains("Negation term added/removed"));
        assert!(output.contains("\nlines/0\n"));
        assert!(output.contains("╰─╯ins negation"));
    }

    #[test]
    fn compare_uses_the_scoring_config() {
        let dir = tempfile::tempdir().unwrap();
        let (lhs, rhs) = exports(dir.path());
        let config = write(dir.path(), "scoring.toml", "[thresholds]\ncritical = 0.9\n");
        let config_arg = config.display().to_string();

        let output = run(&["ocr-diff", "compare", &lhs, &rhs, "-c", &config_arg]).unwrap();
        let report = Report::from_json(&output).unwrap();
        assert_eq!(report.diffs[0].severity_bucket, SeverityBucket::Medium);
    }

    #[test]
    fn errors_name_the_failing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (lhs, _) = exports(dir.path());
        let broken = write(dir.path(), "broken.json", "{\"lines\": [");
        let broken_arg = broken.display().to_string();

        let err = run(&["ocr-diff", "compare", &lhs, &broken_arg]).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"), "{:#}", err);

        let bad_config = write(dir.path(), "scoring.toml", "uncertainty = 3.0\n");
        let config_arg = bad_config.display().to_string();
        let err = run(&["ocr-diff", "compare", &lhs, &lhs, "--config", &config_arg]).unwrap_err();
        assert!(format!("{:#}", err).contains("scoring config"), "{:#}", err);
    }

    #[test]
    fn matrix_needs_two_files() {
        assert!(Cli::try_parse_from(["ocr-diff", "matrix", "only.json"]).is_err());
    }

    #[test]
    fn matrix_prints_a_grid() {
        let dir = tempfile::tempdir().unwrap();
        let (lhs, rhs) = exports(dir.path());

        let output = run(&["ocr-diff", "matrix", &lhs, &rhs]).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("run_5") && lines[0].contains("run_10"));
        assert!(lines[1].starts_with("run_5") && lines[1].ends_with("1/1"));
        assert!(lines[2].starts_with("run_10") && lines[2].ends_with("-"));
    }
}
