//! Tokens and the line provenance they inherit.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::category::Category;
use crate::normalize::normalize;

/// Axis-aligned rectangle reported by the OCR engine, `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
    }
}

/// Metadata a line hands down to each of its tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// OCR confidence in `[0, 1]`.
    pub confidence: f64,
    pub bbox: Option<BoundingBox>,
    pub page: Option<u32>,
    /// Block/region label, empty when the export has none.
    pub block_label: String,
    /// Line position within its document, `-1` for placeholder lines.
    pub line_index: i64,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            confidence: 1.0,
            bbox: None,
            page: None,
            block_label: String::new(),
            line_index: 0,
        }
    }
}

/// A classified token. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Original text, used for display and numeric parsing.
    pub text: String,
    pub kind: Category,
    /// Alignment key, see [`normalize`].
    pub normalized: String,
    pub confidence: f64,
    pub bbox: Option<BoundingBox>,
    pub page: Option<u32>,
    pub block_label: String,
    pub line_index: i64,
    /// Zero-based position within the line.
    pub column_index: usize,
}

impl Token {
    pub fn new(text: &str, column_index: usize, provenance: &Provenance) -> Self {
        Self {
            text: text.to_string(),
            kind: Category::classify(text),
            normalized: normalize(text),
            confidence: provenance.confidence,
            bbox: provenance.bbox,
            page: provenance.page,
            block_label: provenance.block_label.clone(),
            line_index: provenance.line_index,
            column_index,
        }
    }

    pub fn is(&self, kind: Category) -> bool {
        self.kind == kind
    }
}

static JOINED_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)*|\w+|[^\w\s]").expect("joined segment pattern"));

/// Word-boundary rules keep `:`, `.` and `'` between two letters in one
/// segment (`Terms:Net`, `a.m`). Such segments are split again; digit groups
/// stay whole.
fn split_joined(segment: &str) -> Vec<&str> {
    let has_symbol = segment
        .chars()
        .any(|c| !c.is_alphanumeric() && c != '_' && !c.is_whitespace());
    if !has_symbol || segment.chars().nth(1).is_none() {
        return vec![segment];
    }
    JOINED_SPLIT.find_iter(segment).map(|m| m.as_str()).collect()
}

/// Split `text` on Unicode word boundaries.
///
/// Runs of word characters stay together (including digit groups such as
/// `1,234.56`), every other symbol becomes its own token, and whitespace or
/// zero-width segments are dropped.
pub fn tokenize(text: &str, provenance: &Provenance) -> Vec<Token> {
    text.split_word_bounds()
        .flat_map(split_joined)
        .filter(|segment| !normalize(segment).is_empty())
        .enumerate()
        .map(|(column, segment)| Token::new(segment, column, provenance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_symbols_from_words() {
        let tokens = tokenize("total:$500", &Provenance::default());
        assert_eq!(texts(&tokens), vec!["total", ":", "$", "500"]);
    }

    #[test]
    fn splits_symbols_between_letters() {
        let tokens = tokenize("Terms:Net 30", &Provenance::default());
        assert_eq!(texts(&tokens), vec!["Terms", ":", "Net", "30"]);
        assert_eq!(tokens[1].kind, Category::Punctuation);
        assert_eq!(tokens[3].column_index, 3);

        let tokens = tokenize("Due 9 a.m. Monday", &Provenance::default());
        assert_eq!(texts(&tokens), vec!["Due", "9", "a", ".", "m", ".", "Monday"]);
    }

    #[test]
    fn keeps_grouped_numbers_whole() {
        let tokens = tokenize("Total: $1,234.56 due", &Provenance::default());
        assert_eq!(texts(&tokens), vec!["Total", ":", "$", "1,234.56", "due"]);
        assert_eq!(tokens[3].kind, Category::Number);
        assert_eq!(tokens[2].kind, Category::Currency);
    }

    #[test]
    fn drops_whitespace_and_zero_width_segments() {
        let tokens = tokenize("  a \u{200B} b\t\n", &Provenance::default());
        assert_eq!(texts(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn columns_are_sequential() {
        let tokens = tokenize("Item, cost", &Provenance::default());
        let columns: Vec<_> = tokens.iter().map(|t| t.column_index).collect();
        assert_eq!(columns, vec![0, 1, 2]);
    }

    #[test]
    fn tokens_inherit_provenance() {
        let provenance = Provenance {
            confidence: 0.8,
            bbox: Some(BoundingBox::from([1.0, 2.0, 3.0, 4.0])),
            page: Some(2),
            block_label: "header".to_string(),
            line_index: 7,
        };
        let tokens = tokenize("Invoice INV12345", &provenance);
        assert_eq!(tokens.len(), 2);
        for token in &tokens {
            assert_eq!(token.confidence, 0.8);
            assert_eq!(token.page, Some(2));
            assert_eq!(token.block_label, "header");
            assert_eq!(token.line_index, 7);
            assert_eq!(token.bbox, provenance.bbox);
        }
        assert_eq!(tokens[1].kind, Category::Identifier);
        assert_eq!(tokens[1].normalized, "inv12345");
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("", &Provenance::default()).is_empty());
    }
}
