use thiserror::Error;

/// A single input file could not be turned into submissions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("input not found: {0}")]
    NotFound(String),

    #[error("read {path}: {message}")]
    Io { path: String, message: String },

    #[error("unsupported input format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("{path}: invalid CSV: {message}")]
    Csv { path: String, message: String },

    #[error("{path}: invalid JSON: {message}")]
    Json { path: String, message: String },

    #[error("{path}: none of the configured columns appear in the header")]
    NoKnownColumns { path: String },
}
