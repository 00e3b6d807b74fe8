//! Policy document parsing, shipped defaults, and resolution.
//!
//! This crate is IO-free: callers hand it document text and get back a validated, immutable
//! [`ResolvedConfig`].

#![forbid(unsafe_code)]

mod error;
mod model;
mod presets;
mod resolve;

pub use error::ConfigError;
pub use model::{
    ActivitySection, ActivitySourceSection, AutoApproveSection, AutoRejectSection,
    ColumnsSection, EvidenceSection, IntakeSection, ManualReviewSection, PolicyDocumentV1,
    SCHEMA_POLICY_V1, SearchSourceSection, SourcesSection, TextCheckSection,
    VulnerabilityDbSection, VulnerabilitySection,
};
pub use presets::{default_intake, default_policy, default_sources};
pub use resolve::{IntakeSettings, ResolvedConfig, default_document, resolve_policy};

/// Serialization format of a policy document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with(".toml") {
            Self::Toml
        } else {
            Self::Json
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// Parse a policy document into the typed model. No defaults are applied here.
pub fn parse_policy(input: &str, format: DocumentFormat) -> Result<PolicyDocumentV1, ConfigError> {
    match format {
        DocumentFormat::Json => parse_policy_json(input),
        DocumentFormat::Toml => toml::from_str(input).map_err(|e| ConfigError::Parse {
            format: format.name(),
            message: e.to_string(),
        }),
    }
}

pub fn parse_policy_json(input: &str) -> Result<PolicyDocumentV1, ConfigError> {
    serde_json::from_str(input).map_err(|e| ConfigError::Parse {
        format: DocumentFormat::Json.name(),
        message: e.to_string(),
    })
}

/// Render a document in the requested format, newline-terminated.
pub fn render_document(doc: &PolicyDocumentV1, format: DocumentFormat) -> Result<String, ConfigError> {
    let mut out = match format {
        DocumentFormat::Json => {
            serde_json::to_string_pretty(doc).map_err(|e| ConfigError::Serialize(e.to_string()))?
        }
        DocumentFormat::Toml => {
            toml::to_string_pretty(doc).map_err(|e| ConfigError::Serialize(e.to_string()))?
        }
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// JSON Schema of the policy document.
pub fn policy_schema() -> schemars::Schema {
    schemars::schema_for!(PolicyDocumentV1)
}
