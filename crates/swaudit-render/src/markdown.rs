use swaudit_types::{
    AuditReport, DecisionKind, Judgment, ReviewRecord, ReviewReport, VerdictKind,
};

const DIGEST_PREFIX: usize = 12;

pub fn render_review_markdown(report: &ReviewReport) -> String {
    let mut out = String::new();

    out.push_str("# Software review report\n\n");
    out.push_str(&format!(
        "- Submissions: {} (approved {}, rejected {}, manual review {})\n",
        report.counts.total(),
        report.counts.approved,
        report.counts.rejected,
        report.counts.manual_review
    ));
    out.push_str(&format!("- Policy: `{}`\n", short_digest(&report.policy_digest)));
    out.push_str(&format!("- Finished: {}\n\n", report.finished_at.date()));

    if !report.skipped.is_empty() {
        out.push_str("## Skipped inputs\n\n");
        for s in &report.skipped {
            out.push_str(&format!("- `{}`: {}\n", s.source, s.reason));
        }
        out.push('\n');
    }

    if report.records.is_empty() {
        out.push_str("No submissions.\n");
        return out;
    }

    // Most actionable first.
    for (kind, title) in [
        (DecisionKind::Rejected, "Rejected"),
        (DecisionKind::ManualReview, "Manual review"),
        (DecisionKind::Approved, "Approved"),
    ] {
        let rows: Vec<&ReviewRecord> = report
            .records
            .iter()
            .filter(|r| r.decision.kind == kind)
            .collect();
        if rows.is_empty() {
            continue;
        }

        out.push_str(&format!("## {title} ({})\n\n", rows.len()));
        out.push_str("| ID | Software | Department | Reason | Flags |\n");
        out.push_str("|---|---|---|---|---|\n");
        for r in rows {
            let s = &r.submission;
            let flags: Vec<&str> = r.decision.flags.iter().map(|f| f.code.as_str()).collect();
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cell(s.id.as_deref().unwrap_or("")),
                cell(s.subject()),
                cell(s.department()),
                cell(&r.decision.reason),
                cell(&flags.join(", "))
            ));
        }
        out.push('\n');
    }

    out
}

pub fn render_audit_markdown(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Evidence audit: {}\n\n", report.subject));
    let verdict = match report.verdict.kind {
        VerdictKind::Approved => "APPROVED",
        VerdictKind::ConditionallyApproved => "CONDITIONALLY APPROVED",
    };
    out.push_str(&format!("- Verdict: **{verdict}**\n"));
    out.push_str(&format!("- Reason: {}\n", report.verdict.reason));
    out.push_str(&format!(
        "- Evidence: {} clear / {} flagged / {} unknown\n",
        report.verdict.counts.clear, report.verdict.counts.flagged, report.verdict.counts.unknown
    ));
    out.push_str(&format!("- Category: {}\n", report.category.as_str()));
    if let Some(repo) = &report.repository {
        out.push_str(&format!("- Repository: {repo}\n"));
    }
    out.push_str(&format!("- Policy: `{}`\n\n", short_digest(&report.policy_digest)));

    if report.evidence.is_empty() {
        out.push_str("No evidence collected.\n");
        return out;
    }

    out.push_str("## Evidence\n\n");
    for e in &report.evidence {
        let judgment = match e.judgment {
            Judgment::Clear => "CLEAR",
            Judgment::Flagged => "FLAGGED",
            Judgment::Unknown => "UNKNOWN",
        };
        out.push_str(&format!("- [{judgment}] `{}`: {}\n", e.check_id, e.reason));
        for c in &e.citations {
            out.push_str(&format!("  - [{}]({})\n", link_text(&c.title, &c.url), c.url));
        }
    }

    out
}

fn short_digest(digest: &str) -> &str {
    digest.get(..DIGEST_PREFIX).unwrap_or(digest)
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn link_text<'a>(title: &'a str, url: &'a str) -> &'a str {
    if title.trim().is_empty() { url } else { title }
}
