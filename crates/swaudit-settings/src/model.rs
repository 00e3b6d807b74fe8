use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_POLICY_V1: &str = "swaudit.policy.v1";

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Policy document v1 (`config/audit_rules.json` or a TOML equivalent).
///
/// Every field is optional; anything left out falls back to the shipped default. The three rule
/// sections keep the names used by existing rule files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocumentV1 {
    /// Optional schema string for tooling (`swaudit.policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub auto_approve: AutoApproveSection,

    #[serde(default)]
    pub auto_reject: AutoRejectSection,

    #[serde(default)]
    pub require_manual_review: ManualReviewSection,

    #[serde(default, skip_serializing_if = "is_default")]
    pub evidence: EvidenceSection,

    #[serde(default, skip_serializing_if = "is_default")]
    pub sources: SourcesSection,

    #[serde(default, skip_serializing_if = "is_default")]
    pub intake: IntakeSection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AutoApproveSection {
    /// Enables the trusted-vendor free-software approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_software: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_vendors: Option<Vec<String>>,

    /// Free-tier ceiling; costs at or below it are flagged `low-cost`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_yen: Option<u64>,

    /// Keywords marking a license label as free (`無料`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_license_keywords: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AutoRejectSection {
    /// Substrings matched against purpose and software name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prohibited_categories: Option<Vec<String>>,

    /// License labels rejected on exact match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_licenses: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ManualReviewSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_cost_threshold: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive_departments: Option<Vec<String>>,

    /// Keywords matched against purpose and remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_keywords: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident: Option<TextCheckSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reputation: Option<TextCheckSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<VulnerabilitySection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivitySection>,

    /// Citations kept per evidence item (2 or 3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_citations: Option<u32>,

    /// License-label markers that put software in the paid category (`有償`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_markers: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextCheckSection {
    /// Query template; `{subject}` is replaced with the software name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VulnerabilitySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_paid: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_free: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback_years: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActivitySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_commits: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_releases: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourcesSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSourceSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_db: Option<VulnerabilityDbSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivitySourceSection>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchSourceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VulnerabilityDbSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActivitySourceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding an optional access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntakeSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnsSection>,

    /// File names ignored when scanning input directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_files: Option<Vec<String>>,
}

/// Header names of the submission columns in CSV input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
