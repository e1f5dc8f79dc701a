//! Semantic categories for OCR tokens.
//!
//! Every token maps to exactly one [`Category`]. Classification checks the
//! closed word lists and patterns in a fixed precedence order and falls back
//! to [`Category::Word`], so [`Category::classify`] is total:
//!
//! ```text
//! comparator > negation > modal > currency > unit > number > date > identifier > punctuation > word
//! ```
//!
//! The order matters for symbols that belong to more than one family, e.g.
//! `%` is a unit, never punctuation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators, matched exactly.
pub const COMPARATORS: &[&str] = &["<", "≤", "=", "≥", ">", "<=", ">=", "≦", "≧"];

/// Closed-class negation words.
pub const NEGATIONS: &[&str] = &["no", "not", "without", "except", "unless"];

/// Modal and assurance words that shift obligations.
pub const MODALS: &[&str] = &["shall", "must", "may", "should", "warranty", "guarantee"];

/// Currency symbols and ISO-style codes.
pub const CURRENCIES: &[&str] = &["$", "usd", "eur", "€", "£", "inr", "¥"];

/// Measurement units and unit abbreviations.
pub const UNITS: &[&str] = &[
    "kg", "g", "mg", "lb", "oz", "m", "cm", "mm", "km", "°c", "°f", "%", "hrs", "hr", "min",
    "s", "l", "ml",
];

/// Single-character punctuation marks.
pub const PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '(', ')', '{', '}', '[', ']', '-', '–', '—', '"', '\'', '`', '•', '·',
    '…',
];

// One to four leading digits, then groups of exactly three digits behind a
// comma, period or space, then an optional decimal tail.
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,4}(?:[,.\s]\d{3})*(?:\.\d+)?$").expect("number pattern"));

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}",
        r"|\d{4}[-/]\d{2}[-/]\d{2}",
        r"|(?i:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?",
        r"|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2},?\s+\d{4}",
        r")$"
    ))
    .expect("date pattern")
});

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{0,3}\d{5,}[-0-9A-Za-z]*$").expect("identifier pattern"));

/// The semantic role of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// `<`, `>=`, `≤`, ...
    Comparator,
    /// "no", "not", "unless", ...
    Negation,
    /// "shall", "may", "warranty", ...
    Modal,
    /// `$`, `€`, "usd", ...
    Currency,
    /// "kg", "%", "hrs", ...
    Unit,
    /// Grouped or decimal numerals: `1,234.56`, `1234`
    Number,
    /// `12/05/2024`, `2024-05-12`, `May 12, 2024`
    Date,
    /// Invoice/reference style codes: `INV12345`, `0012345-A`
    Identifier,
    /// A single punctuation mark
    Punctuation,
    /// Anything else
    Word,
}

/// How much a change in a category matters before any other signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImpactTier {
    Low,
    Medium,
    Critical,
}

impl Category {
    /// All categories in classification precedence order.
    pub const ALL: [Category; 10] = [
        Category::Comparator,
        Category::Negation,
        Category::Modal,
        Category::Currency,
        Category::Unit,
        Category::Number,
        Category::Date,
        Category::Identifier,
        Category::Punctuation,
        Category::Word,
    ];

    /// Classify a raw token. Total and deterministic.
    pub fn classify(raw: &str) -> Category {
        let token = raw.trim();
        let lower = token.to_lowercase();
        let lower = lower.as_str();

        if COMPARATORS.contains(&lower) {
            Category::Comparator
        } else if NEGATIONS.contains(&lower) {
            Category::Negation
        } else if MODALS.contains(&lower) {
            Category::Modal
        } else if CURRENCIES.contains(&lower) {
            Category::Currency
        } else if UNITS.contains(&lower) {
            Category::Unit
        } else if NUMBER.is_match(lower) {
            Category::Number
        } else if DATE.is_match(token) {
            Category::Date
        } else if IDENTIFIER.is_match(token) {
            Category::Identifier
        } else if is_punctuation(token) {
            Category::Punctuation
        } else {
            Category::Word
        }
    }

    /// Impact tier used by severity scoring.
    pub fn impact_tier(self) -> ImpactTier {
        match self {
            Category::Currency
            | Category::Number
            | Category::Date
            | Category::Unit
            | Category::Comparator
            | Category::Negation
            | Category::Identifier => ImpactTier::Critical,
            Category::Modal => ImpactTier::Medium,
            Category::Punctuation | Category::Word => ImpactTier::Low,
        }
    }

    /// Serialized name, e.g. `"number"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Comparator => "comparator",
            Category::Negation => "negation",
            Category::Modal => "modal",
            Category::Currency => "currency",
            Category::Unit => "unit",
            Category::Number => "number",
            Category::Date => "date",
            Category::Identifier => "identifier",
            Category::Punctuation => "punctuation",
            Category::Word => "word",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PUNCTUATION.contains(&c),
        _ => false,
    }
}
