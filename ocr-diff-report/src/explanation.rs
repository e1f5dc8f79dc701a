//! Human-readable reasons attached to each diff.

use std::fmt;

use ocr_diff::{Category, Token};

use crate::severity::SeverityBucket;

/// Why a change matters. The first rule that applies wins:
/// negation mismatch, any number, any unit, any date, comparator mismatch,
/// any punctuation, then the lexical fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Explanation {
    Negation,
    Numeric,
    Unit,
    Date,
    Comparator,
    Punctuation,
    Lexical,
}

impl Explanation {
    pub fn for_change(lhs: Option<&Token>, rhs: Option<&Token>) -> Self {
        let either = |kind| lhs.map_or(false, |t| t.is(kind)) || rhs.map_or(false, |t| t.is(kind));
        let one = |kind| lhs.map_or(false, |t| t.is(kind)) != rhs.map_or(false, |t| t.is(kind));

        if one(Category::Negation) {
            Explanation::Negation
        } else if either(Category::Number) {
            Explanation::Numeric
        } else if either(Category::Unit) {
            Explanation::Unit
        } else if either(Category::Date) {
            Explanation::Date
        } else if one(Category::Comparator) {
            Explanation::Comparator
        } else if either(Category::Punctuation) {
            Explanation::Punctuation
        } else {
            Explanation::Lexical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Explanation::Negation => "Negation term added/removed; obligation may invert.",
            Explanation::Numeric => "Numeric value changed; verify totals/limits/quantities.",
            Explanation::Unit => "Unit changed; check scale and safety implications.",
            Explanation::Date => "Date changed; deadlines/effective periods may shift.",
            Explanation::Comparator => "Comparator changed; threshold semantics altered.",
            Explanation::Punctuation => {
                "Punctuation change; usually low impact unless disambiguating numbers."
            }
            Explanation::Lexical => "Lexical change; review in surrounding context.",
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const MANUAL_REVIEW: &str = "Manual review";
pub const ACCEPT_OR_IGNORE: &str = "Low impact; accept or ignore";

pub fn suggested_action(bucket: SeverityBucket) -> &'static str {
    match bucket {
        SeverityBucket::Low => ACCEPT_OR_IGNORE,
        SeverityBucket::Medium | SeverityBucket::Critical => MANUAL_REVIEW,
    }
}
