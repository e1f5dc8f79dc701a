//! Severity scoring for a single alignment operation.
//!
//! ```text
//! score = clamp((w_i·impact + w_m·magnitude + w_p·position + w_r·rule_bump) · U, 0, 1)
//! U     = 1 - uncertainty · (1 - min(confidence_lhs, confidence_rhs))
//! ```
//!
//! Scoring is a pure function of the two (possibly absent) tokens and the
//! lines they came from.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use ocr_diff::{AlignmentOp, Category, ImpactTier, Token};
use ocr_diff_document::LineRecord;

use crate::config::ScoringConfig;

// Digits ending in zeros, optionally with an all-zero decimal tail.
static TRAILING_ZEROS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+0+(?:\.0+)?$").expect("trailing zeros pattern"));

/// Coarse severity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBucket {
    Low,
    Medium,
    Critical,
}

impl SeverityBucket {
    pub const ALL: [SeverityBucket; 3] = [
        SeverityBucket::Critical,
        SeverityBucket::Medium,
        SeverityBucket::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityBucket::Low => "low",
            SeverityBucket::Medium => "medium",
            SeverityBucket::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unweighted inputs of a score, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityComponents {
    pub impact: f64,
    pub magnitude: f64,
    pub position: f64,
    pub rule_bump: f64,
    /// Multiplicative confidence discount `U`.
    pub uncertainty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Severity {
    /// Unrounded score in `[0, 1]`.
    pub score: f64,
    pub bucket: SeverityBucket,
    pub components: SeverityComponents,
}

fn is(token: Option<&Token>, kind: Category) -> bool {
    token.map_or(false, |t| t.is(kind))
}

/// Parse a number token leniently: group separators are dropped, anything
/// that still fails to parse has no numeric value.
fn numeric_value(token: &Token) -> Option<f64> {
    let compact: String = token
        .text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    compact.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Default)]
pub struct SeverityScorer {
    config: ScoringConfig,
}

impl SeverityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one operation. `lhs_line`/`rhs_line` are the lines the op's
    /// tokens were taken from (placeholders for a missing side).
    pub fn score(
        &self,
        op: &AlignmentOp<'_>,
        lhs_line: &LineRecord,
        rhs_line: &LineRecord,
    ) -> Severity {
        let (lhs, rhs) = (op.lhs(), op.rhs());
        let components = SeverityComponents {
            impact: self.impact(lhs, rhs),
            magnitude: Self::magnitude(lhs, rhs),
            position: self
                .position_weight(lhs_line)
                .max(self.position_weight(rhs_line)),
            rule_bump: self.rule_bump(lhs, rhs),
            uncertainty: self.uncertainty(lhs, rhs),
        };

        let w = &self.config.weights;
        let raw = w.impact * components.impact
            + w.magnitude * components.magnitude
            + w.position * components.position
            + w.rule_bump * components.rule_bump;
        let score = (raw * components.uncertainty).clamp(0.0, 1.0);

        Severity {
            score,
            bucket: self.bucket(score),
            components,
        }
    }

    pub fn bucket(&self, score: f64) -> SeverityBucket {
        let t = &self.config.thresholds;
        if score < t.medium {
            SeverityBucket::Low
        } else if score < t.critical {
            SeverityBucket::Medium
        } else {
            SeverityBucket::Critical
        }
    }

    /// Category impact of the more informative side: the left kind unless it
    /// is absent or a plain word.
    pub fn impact(&self, lhs: Option<&Token>, rhs: Option<&Token>) -> f64 {
        let kind = match (lhs.map(|t| t.kind), rhs.map(|t| t.kind)) {
            (Some(k), _) if k != Category::Word => Some(k),
            (_, Some(k)) => Some(k),
            (k, None) => k,
        };
        let scores = &self.config.impact;
        match kind.map(Category::impact_tier) {
            Some(ImpactTier::Critical) => scores.critical,
            Some(ImpactTier::Medium) => scores.medium,
            Some(ImpactTier::Low) | None => scores.low,
        }
    }

    /// Relative numeric change, capped at 1. Zero unless both sides are
    /// present, one is a number and both parse.
    pub fn magnitude(lhs: Option<&Token>, rhs: Option<&Token>) -> f64 {
        let (Some(l), Some(r)) = (lhs, rhs) else {
            return 0.0;
        };
        if !l.is(Category::Number) && !r.is(Category::Number) {
            return 0.0;
        }
        let (Some(a), Some(b)) = (numeric_value(l), numeric_value(r)) else {
            return 0.0;
        };
        if a.abs() < 1e-9 {
            return if b.abs() > 1e-9 { 1.0 } else { 0.0 };
        }
        ((a - b).abs() / a.abs().max(1.0)).min(1.0)
    }

    /// Structural weight of a line in `[0, 1]`.
    pub fn position_weight(&self, line: &LineRecord) -> f64 {
        let p = &self.config.position;
        let path = line.path_string().to_lowercase();
        let mentions = |keywords: &[String]| {
            keywords
                .iter()
                .any(|k| !k.is_empty() && path.contains(&k.to_lowercase()))
        };

        let mut boost: f64 = 0.0;
        if mentions(p.finance_keywords.as_slice()) {
            boost += p.finance_boost;
        }
        if mentions(p.legal_keywords.as_slice()) {
            boost += p.legal_boost;
        }
        if line.line_index < p.early_line_limit {
            boost += p.early_line_boost;
        }
        boost.clamp(0.0, 1.0)
    }

    /// First applicable rule bump, 0 when none applies.
    pub fn rule_bump(&self, lhs: Option<&Token>, rhs: Option<&Token>) -> f64 {
        let bumps = &self.config.rule_bumps;
        let differs = |kind| is(lhs, kind) != is(rhs, kind);

        if differs(Category::Negation) {
            return bumps.negation;
        }
        if differs(Category::Unit) {
            return bumps.unit;
        }
        if differs(Category::Comparator) {
            return bumps.comparator;
        }
        if let (Some(l), Some(r)) = (lhs, rhs) {
            if l.is(Category::Number) && r.is(Category::Number) {
                if l.text.contains('.') != r.text.contains('.') {
                    return bumps.decimal_mismatch;
                }
                if TRAILING_ZEROS.is_match(&l.text) || TRAILING_ZEROS.is_match(&r.text) {
                    return bumps.trailing_zeros;
                }
            }
        }
        0.0
    }

    /// Confidence discount; an absent side counts as fully confident.
    pub fn uncertainty(&self, lhs: Option<&Token>, rhs: Option<&Token>) -> f64 {
        let confidence = |t: Option<&Token>| t.map_or(1.0, |t| t.confidence);
        let min = confidence(lhs).min(confidence(rhs));
        1.0 - self.config.uncertainty * (1.0 - min)
    }
}
