//! Error types for report building.

use ocr_diff_document::InputError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the fallible report entry points.
///
/// The comparison pipeline itself cannot fail; everything here happens
/// before it starts (loading inputs, loading configuration) or after it ends
/// (serializing the report).
#[derive(Debug, Error)]
pub enum DiffError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type DiffResult<T> = Result<T, DiffError>;
