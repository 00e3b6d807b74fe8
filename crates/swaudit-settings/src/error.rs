use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {format} policy document: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("{field}: {message}")]
    Invalid { field: String, message: String },

    #[error("failed to serialize policy document: {0}")]
    Serialize(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
