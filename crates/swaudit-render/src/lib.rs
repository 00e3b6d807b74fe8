//! Rendering utilities for human-facing surfaces (Markdown).

#![forbid(unsafe_code)]

mod markdown;

pub use markdown::{render_audit_markdown, render_review_markdown};
