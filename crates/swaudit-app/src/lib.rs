//! Use case orchestration for swaudit.
//!
//! This crate provides the application layer: use cases that coordinate the domain, intake,
//! sources, settings, and render layers. It stays thin and delegates the real work.
//!
//! The CLI crate depends on this; it only handles argument parsing, I/O, and exit codes.

#![forbid(unsafe_code)]

mod audit;
mod explain;
mod policy;
mod render;
mod report;
mod review;

pub use audit::{
    AuditBatchEntry, AuditBatchInput, AuditBatchOutput, AuditInput, AuditSources, HttpSources,
    audit_batch_exit_code, audit_exit_code, derive_category, run_audit, run_audit_batch,
};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use policy::{InitOutcome, PolicyLoad, init_policy, load_policy};
pub use render::{render_markdown, write_report, write_text};
pub use report::{ReportVariant, parse_report_json, serialize_report};
pub use review::{ReviewInput, ReviewOutput, run_review};

pub(crate) fn tool_meta() -> swaudit_types::ToolMeta {
    swaudit_types::ToolMeta {
        name: "swaudit".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
