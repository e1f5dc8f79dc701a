//! Token classification and sequence alignment for comparing OCR output.
//!
//! This crate is the text layer of the `ocr-diff` workspace:
//!
//! - [`Category`] - Closed taxonomy of token roles (number, negation, unit, ...)
//! - [`normalize`] - Alignment keys that fold OCR noise (dashes, quotes, spacing)
//! - [`tokenize`] - Unicode word-boundary tokenizer producing classified [`Token`]s
//! - [`SequenceMatcher`] - Ratcliff-Obershelp longest-matching-block alignment
//! - [`align_tokens`] - Match/substitute/insert/delete script over two token runs
//! - [`AlignmentDisplay`] - Column-aligned rendering of a token alignment
//!
//! Document trees and line extraction live in `ocr-diff-document`; severity
//! scoring and reports live in `ocr-diff-report`.
//!
//! ## Example
//!
//! ```
//! use ocr_diff::{align_tokens, tokenize, Category, Provenance};
//!
//! let left = tokenize("Total: $500.00", &Provenance::default());
//! let right = tokenize("Total: $550.00", &Provenance::default());
//! let alignment = align_tokens(&left, &right);
//!
//! let (before, after) = alignment.substituted().next().unwrap();
//! assert_eq!((before.text.as_str(), after.text.as_str()), ("500.00", "550.00"));
//! assert_eq!(before.kind, Category::Number);
//! ```

mod category;
mod display;
mod normalize;
mod sequence_matcher;
mod token;
mod token_diff;

pub use category::{
    Category, ImpactTier, COMPARATORS, CURRENCIES, MODALS, NEGATIONS, PUNCTUATION, UNITS,
};
pub use display::AlignmentDisplay;
pub use normalize::normalize;
pub use sequence_matcher::{Match, OpTag, Opcode, SequenceMatcher, Step};
pub use token::{tokenize, BoundingBox, Provenance, Token};
pub use token_diff::{align_tokens, AlignmentOp, AlignmentStats, OpKind, TokenAlignment};

#[cfg(test)]
mod tests {
    mod display;
    mod properties;
    mod token_diff;
}
