use thiserror::Error;

/// Why a source could not produce a signal. Always recoverable at the check level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("environment variable {0} is not set")]
    MissingCredentials(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("could not parse response: {0}")]
    Parse(String),

    #[error("service reported an error: {0}")]
    Service(String),

    #[error("not a GitHub repository: {0}")]
    InvalidRepository(String),
}
