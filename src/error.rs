//! Error types for schema walking and mapping validation

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures: nothing useful can be produced for the run.
///
/// Mapping defects found by the validator are reported as plain strings
/// instead, see [`crate::validate`].
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Failed to load schema from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Invalid JSON in {path}: {reason}")]
    ParseError { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}
