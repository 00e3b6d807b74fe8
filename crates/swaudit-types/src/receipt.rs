use crate::Submission;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifiers for swaudit reports.
pub const SCHEMA_REVIEW_REPORT_V1: &str = "swaudit.review.v1";
pub const SCHEMA_AUDIT_REPORT_V1: &str = "swaudit.audit.v1";

/// Terminal outcome of rule evaluation for one submission.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Approved,
    Rejected,
    ManualReview,
}

impl DecisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionKind::Approved => "approved",
            DecisionKind::Rejected => "rejected",
            DecisionKind::ManualReview => "manual_review",
        }
    }
}

/// Advisory annotation raised during evaluation. Flags never change the decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Flag {
    pub code: String,
    pub message: String,
}

impl Flag {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub kind: DecisionKind,
    /// Id of the rule that produced the decision (see [`crate::ids`]).
    pub rule_id: String,
    /// Exactly one reason: the one attached to the deciding rule.
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
}

/// Classification of a single evidence signal.
///
/// `Unknown` means the signal could not be obtained. It is never a synonym for `Clear`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    Clear,
    Flagged,
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Citation {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snippet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Evidence {
    pub check_id: String,
    pub judgment: Judgment,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Approved,
    ConditionallyApproved,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JudgmentCounts {
    pub clear: u32,
    pub flagged: u32,
    pub unknown: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub reason: String,
    pub counts: JudgmentCounts,
}

/// Paid/free category of the software, used to pick the vulnerability threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Paid,
    Free,
}

impl CostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CostCategory::Paid => "paid",
            CostCategory::Free => "free",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionCounts {
    pub approved: u32,
    pub rejected: u32,
    pub manual_review: u32,
}

impl DecisionCounts {
    pub fn from_decisions<'a>(decisions: impl IntoIterator<Item = &'a Decision>) -> Self {
        let mut counts = DecisionCounts::default();
        for d in decisions {
            match d.kind {
                DecisionKind::Approved => counts.approved += 1,
                DecisionKind::Rejected => counts.rejected += 1,
                DecisionKind::ManualReview => counts.manual_review += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.approved + self.rejected + self.manual_review
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewRecord {
    /// Input file the submission was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub submission: Submission,
    pub decision: Decision,
}

/// An input that could not be read; the rest of the batch is still evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedInput {
    pub source: String,
    pub reason: String,
}

/// Batch review report (`swaudit.review.v1`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    /// SHA-256 of the resolved policy document the batch was evaluated under.
    pub policy_digest: String,
    pub counts: DecisionCounts,
    /// Records in input order.
    pub records: Vec<ReviewRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedInput>,
}

/// Evidence audit report for one subject (`swaudit.audit.v1`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub policy_digest: String,
    pub subject: String,
    pub category: CostCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Evidence in check order.
    pub evidence: Vec<Evidence>,
    pub verdict: Verdict,
}
