//! Report parsing and serialization.

use anyhow::Context;
use swaudit_types::{AuditReport, ReviewReport, SCHEMA_AUDIT_REPORT_V1, SCHEMA_REVIEW_REPORT_V1};

#[derive(Clone, Debug)]
pub enum ReportVariant {
    Review(ReviewReport),
    Audit(AuditReport),
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportVariant> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    match schema.as_str() {
        SCHEMA_REVIEW_REPORT_V1 => {
            let report: ReviewReport =
                serde_json::from_value(value).context("parse review report")?;
            Ok(ReportVariant::Review(report))
        }
        SCHEMA_AUDIT_REPORT_V1 => {
            let report: AuditReport =
                serde_json::from_value(value).context("parse audit report")?;
            Ok(ReportVariant::Audit(report))
        }
        _ => anyhow::bail!("unknown report schema: {schema:?}"),
    }
}

pub fn serialize_report(report: &ReportVariant) -> anyhow::Result<Vec<u8>> {
    let mut data = match report {
        ReportVariant::Review(r) => serde_json::to_vec_pretty(r).context("serialize review report")?,
        ReportVariant::Audit(r) => serde_json::to_vec_pretty(r).context("serialize audit report")?,
    };
    data.push(b'\n');
    Ok(data)
}
