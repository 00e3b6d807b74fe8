//! The `audit` use case: gather external evidence for one subject and aggregate a verdict.

use anyhow::Context;
use camino::Utf8PathBuf;
use swaudit_domain::evidence::{
    SignalUnavailable, TextCheckKind, classify_activity, classify_text, classify_vulnerabilities,
};
use swaudit_domain::model::cost_category;
use swaudit_settings::ResolvedConfig;
use swaudit_sources::{
    ActivitySource, GithubActivitySource, MyJvnSource, SearchSource, SerpApiSearch,
    SourceError, SourceSettings, VulnerabilitySource, parse_repository,
};
use swaudit_types::{
    AuditReport, CostCategory, Evidence, SCHEMA_AUDIT_REPORT_V1, SkippedInput, Submission,
    VerdictKind,
};

use crate::review::{IntakeBatch, read_inputs};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Input for the audit use case.
#[derive(Clone, Debug)]
pub struct AuditInput {
    pub subject: String,
    pub category: CostCategory,
    /// Repository URL or `owner/repo`; the activity check runs only when present.
    pub repository: Option<String>,
    /// Leave out the two web-search checks.
    pub skip_search: bool,
}

impl AuditInput {
    /// Audit input for one submission row; `None` when the row names no software.
    ///
    /// The category comes from the license label and cost. A GitHub reference URL becomes the
    /// repository for the activity check; any other URL is ignored.
    pub fn from_submission(
        submission: &Submission,
        config: &ResolvedConfig,
        skip_search: bool,
    ) -> Option<Self> {
        let subject = submission.subject();
        if subject.is_empty() {
            return None;
        }
        let repository = submission.url.as_deref().and_then(|url| match parse_repository(url) {
            Ok((owner, repo)) => Some(format!("{owner}/{repo}")),
            Err(err) => {
                debug!(%subject, error = %err, "reference url is not a repository");
                None
            }
        });
        Some(Self {
            subject: subject.to_string(),
            category: cost_category(submission, &config.policy.evidence),
            repository,
            skip_search,
        })
    }
}

/// Audit every submission found in `inputs`, one report per row.
#[derive(Clone, Debug)]
pub struct AuditBatchInput {
    pub inputs: Vec<Utf8PathBuf>,
    /// Overrides the per-row category when set.
    pub category: Option<CostCategory>,
    pub skip_search: bool,
}

#[derive(Clone, Debug)]
pub struct AuditBatchEntry {
    /// Application id of the row, when it has one.
    pub id: Option<String>,
    pub report: AuditReport,
}

#[derive(Clone, Debug, Default)]
pub struct AuditBatchOutput {
    pub entries: Vec<AuditBatchEntry>,
    pub skipped: Vec<SkippedInput>,
    /// Rows without a software name; nothing to audit.
    pub without_subject: usize,
}

/// The evidence sources an audit consults.
#[derive(Clone, Copy)]
pub struct AuditSources<'a> {
    pub search: &'a dyn SearchSource,
    pub vulnerability: &'a dyn VulnerabilitySource,
    pub activity: &'a dyn ActivitySource,
}

/// The production HTTP sources, built from resolved settings.
pub struct HttpSources {
    search: SerpApiSearch,
    vulnerability: MyJvnSource,
    activity: GithubActivitySource,
}

impl HttpSources {
    /// Credentials are read from the environment variables named in `settings`.
    pub fn from_settings(settings: &SourceSettings, now: OffsetDateTime) -> anyhow::Result<Self> {
        Ok(Self {
            search: SerpApiSearch::from_env(settings.search.clone())
                .context("build search client")?,
            vulnerability: MyJvnSource::new(settings.vulnerability.clone(), now.date())
                .context("build vulnerability database client")?,
            activity: GithubActivitySource::from_env(settings.activity.clone(), now)
                .context("build repository activity client")?,
        })
    }

    pub fn as_sources(&self) -> AuditSources<'_> {
        AuditSources {
            search: &self.search,
            vulnerability: &self.vulnerability,
            activity: &self.activity,
        }
    }
}

pub fn run_audit(
    input: &AuditInput,
    sources: AuditSources<'_>,
    config: &ResolvedConfig,
) -> anyhow::Result<AuditReport> {
    let started_at = OffsetDateTime::now_utc();
    let subject = input.subject.trim();
    if subject.is_empty() {
        anyhow::bail!("audit subject must not be empty");
    }
    let policy = &config.policy.evidence;

    let mut evidence: Vec<Evidence> = Vec::new();

    if !input.skip_search {
        evidence.push(text_check(TextCheckKind::Incident, subject, sources.search, config));
    }

    let vulns = sources
        .vulnerability
        .vulnerability_count(subject, policy.vulnerability.lookback_years)
        .map_err(|e| unavailable(swaudit_types::ids::CHECK_VULNERABILITY_DB, e));
    evidence.push(classify_vulnerabilities(vulns.as_ref(), input.category, policy));

    if !input.skip_search {
        evidence.push(text_check(TextCheckKind::Reputation, subject, sources.search, config));
    }

    if let Some(repo) = input.repository.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        let activity = sources
            .activity
            .activity(repo, policy.activity.window_days)
            .map_err(|e| unavailable(swaudit_types::ids::CHECK_REPOSITORY_ACTIVITY, e));
        evidence.push(classify_activity(activity.as_ref(), policy));
    }

    let verdict = swaudit_domain::aggregate(&evidence);
    info!(
        %subject,
        verdict = ?verdict.kind,
        clear = verdict.counts.clear,
        flagged = verdict.counts.flagged,
        unknown = verdict.counts.unknown,
        "audit finished"
    );

    Ok(AuditReport {
        schema: SCHEMA_AUDIT_REPORT_V1.to_string(),
        tool: crate::tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        policy_digest: config.digest.clone(),
        subject: subject.to_string(),
        category: input.category,
        repository: input.repository.clone(),
        evidence,
        verdict,
    })
}

/// Run [`run_audit`] for each submission row, in input order.
pub fn run_audit_batch(
    input: &AuditBatchInput,
    sources: AuditSources<'_>,
    config: &ResolvedConfig,
) -> anyhow::Result<AuditBatchOutput> {
    let IntakeBatch { rows, skipped, .. } = read_inputs(&input.inputs, config)?;

    let mut output = AuditBatchOutput {
        skipped,
        ..AuditBatchOutput::default()
    };
    for (source, submission) in &rows {
        let Some(mut audit) = AuditInput::from_submission(submission, config, input.skip_search)
        else {
            warn!(%source, id = ?submission.id, "submission has no software name; not audited");
            output.without_subject += 1;
            continue;
        };
        if let Some(category) = input.category {
            audit.category = category;
        }
        let report = run_audit(&audit, sources, config)?;
        output.entries.push(AuditBatchEntry {
            id: submission.id.clone(),
            report,
        });
    }

    info!(
        audited = output.entries.len(),
        skipped = output.skipped.len(),
        without_subject = output.without_subject,
        "audit batch finished"
    );
    Ok(output)
}

/// Worst exit code over a batch: 2 when any subject is only conditionally approved.
pub fn audit_batch_exit_code(output: &AuditBatchOutput) -> i32 {
    output
        .entries
        .iter()
        .map(|e| audit_exit_code(&e.report))
        .max()
        .unwrap_or(0)
}

/// Category for an audit that was not given one explicitly: paid when the license label carries a
/// paid marker or the stated cost is above zero.
pub fn derive_category(
    license: Option<&str>,
    cost: Option<&str>,
    config: &ResolvedConfig,
) -> CostCategory {
    let submission = Submission {
        license: license.map(str::to_string),
        cost: cost.map(str::to_string),
        ..Submission::default()
    };
    cost_category(&submission, &config.policy.evidence)
}

/// 0 when approved, 2 when conditionally approved.
pub fn audit_exit_code(report: &AuditReport) -> i32 {
    match report.verdict.kind {
        VerdictKind::Approved => 0,
        VerdictKind::ConditionallyApproved => 2,
    }
}

fn text_check(
    kind: TextCheckKind,
    subject: &str,
    search: &dyn SearchSource,
    config: &ResolvedConfig,
) -> Evidence {
    let policy = &config.policy.evidence;
    let query = kind.definition(policy).query_for(subject);
    debug!(check = kind.check_id(), %query, "search");
    let hits = search
        .search(&query)
        .map_err(|e| unavailable(kind.check_id(), e));
    classify_text(kind, hits.as_ref().map(Vec::as_slice), policy)
}

fn unavailable(check_id: &str, err: SourceError) -> SignalUnavailable {
    warn!(check = check_id, error = %err, "evidence unavailable");
    SignalUnavailable::new(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swaudit_domain::evidence::{ActivitySignal, VulnerabilitySignal};
    use swaudit_types::{Citation, Judgment, ids};
    use time::macros::date;

    struct FakeSearch(Result<Vec<Citation>, SourceError>);

    impl SearchSource for FakeSearch {
        fn search(&self, _query: &str) -> Result<Vec<Citation>, SourceError> {
            self.0.clone()
        }
    }

    struct FakeVulns(u64);

    impl VulnerabilitySource for FakeVulns {
        fn vulnerability_count(
            &self,
            _subject: &str,
            _lookback_years: u32,
        ) -> Result<VulnerabilitySignal, SourceError> {
            Ok(VulnerabilitySignal {
                count: self.0,
                citations: Vec::new(),
            })
        }
    }

    struct FakeActivity;

    impl ActivitySource for FakeActivity {
        fn activity(
            &self,
            _repository: &str,
            _window_days: u32,
        ) -> Result<ActivitySignal, SourceError> {
            Ok(ActivitySignal {
                commit_count: 40,
                release_count: 2,
                last_commit: Some(date!(2026 - 10 - 01)),
                as_of: date!(2026 - 10 - 16),
                citations: Vec::new(),
            })
        }
    }

    fn config() -> ResolvedConfig {
        swaudit_settings::resolve_policy(swaudit_settings::default_document()).expect("resolve")
    }

    fn calm_hits() -> Vec<Citation> {
        vec![Citation {
            title: "Review".to_string(),
            url: "https://example.com/review".to_string(),
            snippet: "使いやすいツールです".to_string(),
        }]
    }

    fn input(category: CostCategory) -> AuditInput {
        AuditInput {
            subject: "Example".to_string(),
            category,
            repository: Some("example/example".to_string()),
            skip_search: false,
        }
    }

    #[test]
    fn all_clear_evidence_is_approved_in_check_order() {
        let search = FakeSearch(Ok(calm_hits()));
        let sources = AuditSources {
            search: &search,
            vulnerability: &FakeVulns(1),
            activity: &FakeActivity,
        };
        let report = run_audit(&input(CostCategory::Free), sources, &config()).expect("audit");

        let checks: Vec<&str> = report.evidence.iter().map(|e| e.check_id.as_str()).collect();
        assert_eq!(
            checks,
            vec![
                ids::CHECK_INCIDENT_REPORTS,
                ids::CHECK_VULNERABILITY_DB,
                ids::CHECK_VENDOR_REPUTATION,
                ids::CHECK_REPOSITORY_ACTIVITY
            ]
        );
        assert_eq!(report.verdict.kind, VerdictKind::Approved);
        assert_eq!(audit_exit_code(&report), 0);
        assert_eq!(report.policy_digest, config().digest);
    }

    #[test]
    fn failing_search_becomes_unknown_and_blocks_approval() {
        let search = FakeSearch(Err(SourceError::MissingCredentials("SERPAPI_KEY".into())));
        let sources = AuditSources {
            search: &search,
            vulnerability: &FakeVulns(0),
            activity: &FakeActivity,
        };
        let report = run_audit(&input(CostCategory::Paid), sources, &config()).expect("audit");

        assert_eq!(report.evidence[0].judgment, Judgment::Unknown);
        assert!(report.evidence[0].reason.contains("SERPAPI_KEY"));
        assert_eq!(report.verdict.counts.unknown, 2);
        assert_eq!(report.verdict.kind, VerdictKind::ConditionallyApproved);
        assert_eq!(audit_exit_code(&report), 2);
    }

    #[test]
    fn vulnerability_threshold_depends_on_category() {
        let search = FakeSearch(Ok(calm_hits()));
        let sources = AuditSources {
            search: &search,
            vulnerability: &FakeVulns(7),
            activity: &FakeActivity,
        };
        let mut free = input(CostCategory::Free);
        free.skip_search = true;
        free.repository = None;
        let mut paid = free.clone();
        paid.category = CostCategory::Paid;

        let free_report = run_audit(&free, sources, &config()).expect("audit");
        let paid_report = run_audit(&paid, sources, &config()).expect("audit");

        assert_eq!(free_report.evidence.len(), 1);
        assert_eq!(free_report.evidence[0].judgment, Judgment::Flagged);
        assert_eq!(paid_report.evidence[0].judgment, Judgment::Clear);
        assert_eq!(paid_report.verdict.kind, VerdictKind::Approved);
    }

    #[test]
    fn category_is_derived_from_license_then_cost() {
        let config = config();
        assert_eq!(derive_category(Some("有償"), None, &config), CostCategory::Paid);
        assert_eq!(derive_category(None, Some("3,000円/月"), &config), CostCategory::Paid);
        assert_eq!(derive_category(Some("無料"), Some("不明"), &config), CostCategory::Free);
        assert_eq!(derive_category(None, None, &config), CostCategory::Free);
    }

    #[test]
    fn submission_row_supplies_subject_category_and_repository() {
        let config = config();
        let row = Submission {
            subject: Some(" Tool ".to_string()),
            license: Some("有償".to_string()),
            url: Some("https://github.com/example/tool".to_string()),
            ..Submission::default()
        };
        let audit = AuditInput::from_submission(&row, &config, true).expect("has subject");
        assert_eq!(audit.subject, "Tool");
        assert_eq!(audit.category, CostCategory::Paid);
        assert_eq!(audit.repository.as_deref(), Some("example/tool"));
        assert!(audit.skip_search);

        let vendor_site = Submission {
            url: Some("https://www.example.com/tool".to_string()),
            ..row.clone()
        };
        let audit = AuditInput::from_submission(&vendor_site, &config, false).expect("has subject");
        assert_eq!(audit.repository, None);

        assert!(AuditInput::from_submission(&Submission::default(), &config, false).is_none());
    }

    #[test]
    fn batch_audits_each_row_and_counts_rows_without_subject() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        let file = root.join("requests.csv");
        std::fs::write(
            &file,
            "申請ID,ソフトウェア名,ライセンス形態,参考URL\n\
             A-1,Tool,有償,https://github.com/example/tool\n\
             A-2,,無料,\n\
             A-3,Viewer,無料,https://viewer.example.com\n",
        )
        .expect("write");

        let search = FakeSearch(Ok(calm_hits()));
        let sources = AuditSources {
            search: &search,
            vulnerability: &FakeVulns(7),
            activity: &FakeActivity,
        };
        let input = AuditBatchInput {
            inputs: vec![file],
            category: None,
            skip_search: true,
        };
        let output = run_audit_batch(&input, sources, &config()).expect("batch");

        assert_eq!(output.without_subject, 1);
        assert_eq!(output.entries.len(), 2);
        let first = &output.entries[0];
        assert_eq!(first.id.as_deref(), Some("A-1"));
        assert_eq!(first.report.category, CostCategory::Paid);
        assert_eq!(first.report.evidence.len(), 2);
        assert_eq!(first.report.evidence[1].check_id, ids::CHECK_REPOSITORY_ACTIVITY);

        let second = &output.entries[1].report;
        assert_eq!(second.category, CostCategory::Free);
        assert_eq!(second.evidence.len(), 1);
        assert_eq!(second.verdict.kind, VerdictKind::ConditionallyApproved);
        assert_eq!(audit_batch_exit_code(&output), 2);
    }

    #[test]
    fn blank_subject_is_rejected() {
        let search = FakeSearch(Ok(Vec::new()));
        let sources = AuditSources {
            search: &search,
            vulnerability: &FakeVulns(0),
            activity: &FakeActivity,
        };
        let mut blank = input(CostCategory::Free);
        blank.subject = "  ".to_string();

        assert!(run_audit(&blank, sources, &config()).is_err());
    }
}
