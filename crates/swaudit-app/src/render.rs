//! Render use cases and artifact writing.

use anyhow::Context;
use camino::Utf8Path;

use crate::report::{ReportVariant, serialize_report};

pub fn render_markdown(report: &ReportVariant) -> String {
    match report {
        ReportVariant::Review(r) => swaudit_render::render_review_markdown(r),
        ReportVariant::Audit(r) => swaudit_render::render_audit_markdown(r),
    }
}

pub fn write_report(path: &Utf8Path, report: &ReportVariant) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    create_parent(path)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    create_parent(path)?;
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))
}

fn create_parent(path: &Utf8Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    Ok(())
}
