//! Stable DTOs and IDs used across the swaudit workspace.
//!
//! This crate is intentionally boring:
//! - the typed submission record
//! - data types for decisions, evidence, verdicts and the emitted reports
//! - stable string IDs for rules, flags and evidence checks
//! - explain registry for reviewer guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;
pub mod submission;

pub use explain::{Explanation, lookup_explanation};
pub use receipt::{
    AuditReport, Citation, CostCategory, Decision, DecisionCounts, DecisionKind, Evidence, Flag,
    Judgment, JudgmentCounts, ReviewRecord, ReviewReport, SCHEMA_AUDIT_REPORT_V1,
    SCHEMA_REVIEW_REPORT_V1, SkippedInput, ToolMeta, Verdict, VerdictKind,
};
pub use submission::Submission;
