//! Command-line front end for `ocr-diff`.
//!
//! - `ocr-diff compare LHS RHS` builds the context-diff report for one pair
//!   of OCR exports and prints it as JSON or text.
//! - `ocr-diff matrix FILES...` compares every ordered pair of exports and
//!   prints a grid of `critical/total` diff counts.

pub mod cli;
pub mod matrix;

pub use cli::{Cli, Commands, CompareArgs, OutputFormat};
pub use matrix::{DiffMatrix, MatrixCell};
