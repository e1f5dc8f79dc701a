//! Error types for the fixture harness.

use thiserror::Error;

/// Errors that can occur while loading or running fixtures.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A fixture file is not valid fixture TOML.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A fixture file or directory could not be read.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// A fixture could not be run or its expectations are malformed.
    #[error("assertion failed: {message}")]
    Assertion { message: String },
}

/// Result type for harness operations.
pub type SpecResult<T> = Result<T, SpecError>;
