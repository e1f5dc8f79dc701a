//! OCR export trees, line extraction and line alignment for `ocr-diff`.
//!
//! The core `ocr-diff` crate compares single lines of text. This crate turns
//! a whole OCR export into an ordered list of [`LineRecord`]s and pairs the
//! lines of two exports so each pair can be compared token by token.
//!
//! ## Core Types
//!
//! - [`Document`] / [`Node`] - Schema-free export tree with a JSON loader
//! - [`LineRecord`] - One text unit with its path and typed [`Provenance`](ocr_diff::Provenance)
//! - [`LinePair`] - One aligned row, possibly against a placeholder
//!
//! ## Example
//!
//! ```
//! use ocr_diff_document::{align_lines, Document};
//!
//! let left = Document::parse(r#"{"lines": [{"text": "Invoice"}, {"text": "Thanks"}]}"#).unwrap();
//! let right = Document::parse(r#"{"lines": [{"text": "Invoice"}]}"#).unwrap();
//!
//! let (left, right) = (left.lines(), right.lines());
//! let pairs = align_lines(&left, &right);
//! assert_eq!(pairs.len(), 2);
//! assert!(pairs[1].rhs.is_placeholder());
//! ```

mod document;
mod error;
mod line;
mod line_align;
pub mod metadata;

pub use document::{Document, Node, Scalar};
pub use error::{InputError, InputResult};
pub use line::{extract_lines, tokenize_line, LineRecord, PathSegment};
pub use line_align::{align_lines, LinePair};
