use crate::error::ConfigError;
use crate::model::{
    ActivitySection, ActivitySourceSection, AutoApproveSection, AutoRejectSection,
    ColumnsSection, EvidenceSection, IntakeSection, ManualReviewSection, PolicyDocumentV1,
    SCHEMA_POLICY_V1, SearchSourceSection, SourcesSection, TextCheckSection,
    VulnerabilityDbSection, VulnerabilitySection,
};
use crate::presets;
use sha2::{Digest, Sha256};
use swaudit_domain::policy::{Policy, TextCheck};
use swaudit_intake::ColumnMap;
use swaudit_sources::SourceSettings;

const MAX_WINDOW_DAYS: u32 = 3650;
const MAX_LOOKBACK_YEARS: u32 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakeSettings {
    pub columns: ColumnMap,
    /// File names skipped when scanning directories.
    pub skip_files: Vec<String>,
}

/// Everything a run needs, resolved once and then read-only.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: Policy,
    pub sources: SourceSettings,
    pub intake: IntakeSettings,
    /// The fully materialized document (defaults filled in).
    pub document: PolicyDocumentV1,
    /// SHA-256 over the canonical JSON of `document`.
    pub digest: String,
}

pub fn resolve_policy(doc: PolicyDocumentV1) -> Result<ResolvedConfig, ConfigError> {
    if let Some(schema) = doc.schema.as_deref()
        && schema != SCHEMA_POLICY_V1
    {
        return Err(ConfigError::invalid(
            "schema",
            format!("unsupported schema {schema} (expected {SCHEMA_POLICY_V1})"),
        ));
    }

    let mut policy = presets::default_policy();
    let mut sources = presets::default_sources();
    let mut intake = presets::default_intake();

    apply_approve(&mut policy, &doc.auto_approve)?;
    apply_reject(&mut policy, &doc.auto_reject)?;
    apply_review(&mut policy, &doc.require_manual_review)?;
    apply_evidence(&mut policy, &doc.evidence)?;
    apply_sources(&mut sources, &doc.sources)?;
    apply_intake(&mut intake, &doc.intake)?;

    let document = materialize(&policy, &sources, &intake);
    let digest = digest(&document)?;

    Ok(ResolvedConfig {
        policy,
        sources,
        intake,
        document,
        digest,
    })
}

/// The default policy as a complete document, suitable for writing to disk.
pub fn default_document() -> PolicyDocumentV1 {
    materialize(
        &presets::default_policy(),
        &presets::default_sources(),
        &presets::default_intake(),
    )
}

fn digest(document: &PolicyDocumentV1) -> Result<String, ConfigError> {
    let canonical =
        serde_json::to_vec(document).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

// --- Rule sections ---

fn apply_approve(policy: &mut Policy, section: &AutoApproveSection) -> Result<(), ConfigError> {
    let approve = &mut policy.approve;
    if let Some(v) = section.free_software {
        approve.free_software = v;
    }
    if let Some(v) = &section.known_vendors {
        approve.known_vendors = list("auto_approve.known_vendors", v)?;
    }
    if let Some(v) = section.max_cost_yen {
        approve.max_cost = v;
    }
    if let Some(v) = &section.free_license_keywords {
        approve.free_license_keywords = non_empty_list("auto_approve.free_license_keywords", v)?;
    }
    Ok(())
}

fn apply_reject(policy: &mut Policy, section: &AutoRejectSection) -> Result<(), ConfigError> {
    if let Some(v) = &section.prohibited_categories {
        policy.reject.prohibited_categories = list("auto_reject.prohibited_categories", v)?;
    }
    if let Some(v) = &section.high_risk_licenses {
        policy.reject.high_risk_licenses = list("auto_reject.high_risk_licenses", v)?;
    }
    Ok(())
}

fn apply_review(policy: &mut Policy, section: &ManualReviewSection) -> Result<(), ConfigError> {
    let review = &mut policy.review;
    if let Some(v) = section.high_cost_threshold {
        review.high_cost_threshold = v;
    }
    if let Some(v) = &section.sensitive_departments {
        review.sensitive_departments = list("require_manual_review.sensitive_departments", v)?;
    }
    if let Some(v) = &section.security_keywords {
        review.security_keywords = list("require_manual_review.security_keywords", v)?;
    }
    Ok(())
}

// --- Evidence ---

fn apply_evidence(policy: &mut Policy, section: &EvidenceSection) -> Result<(), ConfigError> {
    let evidence = &mut policy.evidence;
    if let Some(s) = &section.incident {
        apply_text_check(&mut evidence.incident, "evidence.incident", s)?;
    }
    if let Some(s) = &section.reputation {
        apply_text_check(&mut evidence.reputation, "evidence.reputation", s)?;
    }
    if let Some(s) = &section.vulnerability {
        apply_vulnerability(policy, s)?;
    }
    if let Some(s) = &section.activity {
        apply_activity(policy, s)?;
    }

    let evidence = &mut policy.evidence;
    if let Some(v) = section.max_citations {
        if !(2..=3).contains(&v) {
            return Err(ConfigError::invalid(
                "evidence.max_citations",
                format!("{v} is outside 2..=3"),
            ));
        }
        evidence.max_citations = v as usize;
    }
    if let Some(v) = &section.paid_markers {
        evidence.paid_markers = non_empty_list("evidence.paid_markers", v)?;
    }
    Ok(())
}

fn apply_text_check(
    check: &mut TextCheck,
    field: &str,
    section: &TextCheckSection,
) -> Result<(), ConfigError> {
    if let Some(query) = &section.query {
        if !query.contains("{subject}") {
            return Err(ConfigError::invalid(
                format!("{field}.query"),
                "must contain the {subject} placeholder",
            ));
        }
        check.query = query.clone();
    }
    if let Some(keywords) = &section.keywords {
        check.keywords = non_empty_list(&format!("{field}.keywords"), keywords)?;
    }
    Ok(())
}

fn apply_vulnerability(policy: &mut Policy, section: &VulnerabilitySection) -> Result<(), ConfigError> {
    let v = &mut policy.evidence.vulnerability;
    if let Some(n) = section.threshold_paid {
        v.paid = positive("evidence.vulnerability.threshold_paid", n)?;
    }
    if let Some(n) = section.threshold_free {
        v.free = positive("evidence.vulnerability.threshold_free", n)?;
    }
    if let Some(n) = section.lookback_years {
        v.lookback_years = bounded(
            "evidence.vulnerability.lookback_years",
            n,
            MAX_LOOKBACK_YEARS,
        )?;
    }
    Ok(())
}

fn apply_activity(policy: &mut Policy, section: &ActivitySection) -> Result<(), ConfigError> {
    let a = &mut policy.evidence.activity;
    if let Some(n) = section.window_days {
        a.window_days = bounded("evidence.activity.window_days", n, MAX_WINDOW_DAYS)?;
    }
    if let Some(n) = section.min_commits {
        a.min_commits = positive("evidence.activity.min_commits", n)?;
    }
    if let Some(n) = section.min_releases {
        a.min_releases = positive("evidence.activity.min_releases", n)?;
    }
    Ok(())
}

// --- Sources and intake ---

fn apply_sources(sources: &mut SourceSettings, section: &SourcesSection) -> Result<(), ConfigError> {
    if let Some(s) = &section.search {
        let search = &mut sources.search;
        if let Some(v) = &s.endpoint {
            search.endpoint = endpoint("sources.search.endpoint", v)?;
        }
        if let Some(v) = &s.api_key_env {
            search.api_key_env = text("sources.search.api_key_env", v)?;
        }
        if let Some(v) = s.timeout_secs {
            search.timeout_secs = timeout("sources.search.timeout_secs", v)?;
        }
        if let Some(v) = s.num_results {
            search.num_results = bounded("sources.search.num_results", v, 10)?;
        }
        if let Some(v) = &s.language {
            search.language = text("sources.search.language", v)?;
        }
        if let Some(v) = &s.country {
            search.country = text("sources.search.country", v)?;
        }
    }
    if let Some(s) = &section.vulnerability_db {
        let vuln = &mut sources.vulnerability;
        if let Some(v) = &s.endpoint {
            vuln.endpoint = endpoint("sources.vulnerability_db.endpoint", v)?;
        }
        if let Some(v) = &s.search_page {
            vuln.search_page = endpoint("sources.vulnerability_db.search_page", v)?;
        }
        if let Some(v) = s.timeout_secs {
            vuln.timeout_secs = timeout("sources.vulnerability_db.timeout_secs", v)?;
        }
    }
    if let Some(s) = &section.activity {
        let activity = &mut sources.activity;
        if let Some(v) = &s.endpoint {
            activity.endpoint = endpoint("sources.activity.endpoint", v)?;
        }
        if let Some(v) = &s.token_env {
            activity.token_env = text("sources.activity.token_env", v)?;
        }
        if let Some(v) = s.timeout_secs {
            activity.timeout_secs = timeout("sources.activity.timeout_secs", v)?;
        }
    }
    Ok(())
}

fn apply_intake(intake: &mut IntakeSettings, section: &IntakeSection) -> Result<(), ConfigError> {
    if let Some(c) = &section.columns {
        let columns = &mut intake.columns;
        let slots: [(&str, &Option<String>, &mut String); 10] = [
            ("id", &c.id, &mut columns.id),
            ("applicant", &c.applicant, &mut columns.applicant),
            ("subject", &c.subject, &mut columns.subject),
            ("vendor", &c.vendor, &mut columns.vendor),
            ("license", &c.license, &mut columns.license),
            ("cost", &c.cost, &mut columns.cost),
            ("purpose", &c.purpose, &mut columns.purpose),
            ("remarks", &c.remarks, &mut columns.remarks),
            ("department", &c.department, &mut columns.department),
            ("url", &c.url, &mut columns.url),
        ];
        for (name, value, slot) in slots {
            if let Some(v) = value {
                *slot = text(&format!("intake.columns.{name}"), v)?;
            }
        }
    }
    if let Some(v) = &section.skip_files {
        intake.skip_files = list("intake.skip_files", v)?;
    }
    Ok(())
}

// --- Materialization ---

fn materialize(
    policy: &Policy,
    sources: &SourceSettings,
    intake: &IntakeSettings,
) -> PolicyDocumentV1 {
    let evidence = &policy.evidence;
    let columns = &intake.columns;
    PolicyDocumentV1 {
        schema: Some(SCHEMA_POLICY_V1.to_string()),
        auto_approve: AutoApproveSection {
            free_software: Some(policy.approve.free_software),
            known_vendors: Some(policy.approve.known_vendors.clone()),
            max_cost_yen: Some(policy.approve.max_cost),
            free_license_keywords: Some(policy.approve.free_license_keywords.clone()),
        },
        auto_reject: AutoRejectSection {
            prohibited_categories: Some(policy.reject.prohibited_categories.clone()),
            high_risk_licenses: Some(policy.reject.high_risk_licenses.clone()),
        },
        require_manual_review: ManualReviewSection {
            high_cost_threshold: Some(policy.review.high_cost_threshold),
            sensitive_departments: Some(policy.review.sensitive_departments.clone()),
            security_keywords: Some(policy.review.security_keywords.clone()),
        },
        evidence: EvidenceSection {
            incident: Some(text_section(&evidence.incident)),
            reputation: Some(text_section(&evidence.reputation)),
            vulnerability: Some(VulnerabilitySection {
                threshold_paid: Some(evidence.vulnerability.paid),
                threshold_free: Some(evidence.vulnerability.free),
                lookback_years: Some(evidence.vulnerability.lookback_years),
            }),
            activity: Some(ActivitySection {
                window_days: Some(evidence.activity.window_days),
                min_commits: Some(evidence.activity.min_commits),
                min_releases: Some(evidence.activity.min_releases),
            }),
            max_citations: Some(evidence.max_citations as u32),
            paid_markers: Some(evidence.paid_markers.clone()),
        },
        sources: SourcesSection {
            search: Some(SearchSourceSection {
                endpoint: Some(sources.search.endpoint.clone()),
                api_key_env: Some(sources.search.api_key_env.clone()),
                timeout_secs: Some(sources.search.timeout_secs),
                num_results: Some(sources.search.num_results),
                language: Some(sources.search.language.clone()),
                country: Some(sources.search.country.clone()),
            }),
            vulnerability_db: Some(VulnerabilityDbSection {
                endpoint: Some(sources.vulnerability.endpoint.clone()),
                search_page: Some(sources.vulnerability.search_page.clone()),
                timeout_secs: Some(sources.vulnerability.timeout_secs),
            }),
            activity: Some(ActivitySourceSection {
                endpoint: Some(sources.activity.endpoint.clone()),
                token_env: Some(sources.activity.token_env.clone()),
                timeout_secs: Some(sources.activity.timeout_secs),
            }),
        },
        intake: IntakeSection {
            columns: Some(ColumnsSection {
                id: Some(columns.id.clone()),
                applicant: Some(columns.applicant.clone()),
                subject: Some(columns.subject.clone()),
                vendor: Some(columns.vendor.clone()),
                license: Some(columns.license.clone()),
                cost: Some(columns.cost.clone()),
                purpose: Some(columns.purpose.clone()),
                remarks: Some(columns.remarks.clone()),
                department: Some(columns.department.clone()),
                url: Some(columns.url.clone()),
            }),
            skip_files: Some(intake.skip_files.clone()),
        },
    }
}

fn text_section(check: &TextCheck) -> TextCheckSection {
    TextCheckSection {
        query: Some(check.query.clone()),
        keywords: Some(check.keywords.clone()),
    }
}

// --- Value validation ---

/// Trimmed list without blank entries. Empty lists are allowed (the rule then never fires).
fn list(field: &str, values: &[String]) -> Result<Vec<String>, ConfigError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let v = v.trim();
            if v.is_empty() {
                Err(ConfigError::invalid(format!("{field}[{i}]"), "must not be blank"))
            } else {
                Ok(v.to_string())
            }
        })
        .collect()
}

fn non_empty_list(field: &str, values: &[String]) -> Result<Vec<String>, ConfigError> {
    let out = list(field, values)?;
    if out.is_empty() {
        return Err(ConfigError::invalid(field, "must list at least one entry"));
    }
    Ok(out)
}

fn text(field: &str, value: &str) -> Result<String, ConfigError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ConfigError::invalid(field, "must not be blank"));
    }
    Ok(v.to_string())
}

fn endpoint(field: &str, value: &str) -> Result<String, ConfigError> {
    let v = text(field, value)?;
    if !(v.starts_with("https://") || v.starts_with("http://")) {
        return Err(ConfigError::invalid(field, format!("{v} is not an http(s) url")));
    }
    Ok(v)
}

fn positive(field: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be greater than 0"));
    }
    Ok(value)
}

fn bounded(field: &str, value: u32, max: u32) -> Result<u32, ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::invalid(field, format!("{value} is outside 1..={max}")));
    }
    Ok(value)
}

fn timeout(field: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 || value > MAX_TIMEOUT_SECS {
        return Err(ConfigError::invalid(
            field,
            format!("{value} is outside 1..={MAX_TIMEOUT_SECS}"),
        ));
    }
    Ok(value)
}
