//! Error types for loading OCR exports.

use thiserror::Error;

/// The export could not be turned into a document tree.
///
/// Raised before any comparison work starts, so a failed comparison never
/// leaves a partial report behind.
#[derive(Debug, Error)]
pub enum InputError {
    /// The export is not well-formed.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The export could not be read.
    #[error("failed to read document: {path}: {message}")]
    Io { path: String, message: String },
}

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        InputError::Parse {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Result type for document loading.
pub type InputResult<T> = Result<T, InputError>;
