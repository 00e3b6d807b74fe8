//! Evidence classification.
//!
//! Each classifier turns one raw signal into an [`Evidence`] item. A signal that could not be
//! obtained is passed as [`SignalUnavailable`] and always classifies as [`Judgment::Unknown`].

use crate::model::first_contained;
use crate::policy::{EvidencePolicy, TextCheck};
use swaudit_types::{Citation, CostCategory, Evidence, Judgment, ids};
use time::{Date, Duration};

/// Why a signal could not be obtained (missing credentials, timeout, bad response, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalUnavailable {
    pub reason: String,
}

impl SignalUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextCheckKind {
    Incident,
    Reputation,
}

impl TextCheckKind {
    pub fn check_id(self) -> &'static str {
        match self {
            TextCheckKind::Incident => ids::CHECK_INCIDENT_REPORTS,
            TextCheckKind::Reputation => ids::CHECK_VENDOR_REPUTATION,
        }
    }

    pub fn definition(self, policy: &EvidencePolicy) -> &TextCheck {
        match self {
            TextCheckKind::Incident => &policy.incident,
            TextCheckKind::Reputation => &policy.reputation,
        }
    }

    fn clear_reason(self) -> &'static str {
        match self {
            TextCheckKind::Incident => "no reports of security incidents were found",
            TextCheckKind::Reputation => "no negative reputation signals were found",
        }
    }

    fn flagged_reason(self) -> &'static str {
        match self {
            TextCheckKind::Incident => "search results mention possible security incidents",
            TextCheckKind::Reputation => "search results contain negative reputation signals",
        }
    }
}

/// Vulnerability reports found for a subject within the lookback window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VulnerabilitySignal {
    pub count: u64,
    pub citations: Vec<Citation>,
}

/// Repository activity observed as of `as_of`.
///
/// `commit_count` and `release_count` cover the activity window ending at `as_of`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivitySignal {
    pub commit_count: u64,
    pub release_count: u64,
    pub last_commit: Option<Date>,
    pub as_of: Date,
    pub citations: Vec<Citation>,
}

fn unknown(check_id: &str, err: &SignalUnavailable) -> Evidence {
    Evidence {
        check_id: check_id.to_string(),
        judgment: Judgment::Unknown,
        reason: format!("evidence unavailable: {}", err.reason),
        citations: Vec::new(),
    }
}

fn bounded(citations: &[Citation], policy: &EvidencePolicy) -> Vec<Citation> {
    citations.iter().take(policy.max_citations).cloned().collect()
}

/// Classify search hits against the check's keyword set.
///
/// An empty hit list is inconclusive, not clear.
pub fn classify_text(
    kind: TextCheckKind,
    hits: Result<&[Citation], &SignalUnavailable>,
    policy: &EvidencePolicy,
) -> Evidence {
    let hits = match hits {
        Ok(hits) => hits,
        Err(err) => return unknown(kind.check_id(), err),
    };
    if hits.is_empty() {
        return unknown(
            kind.check_id(),
            &SignalUnavailable::new("search returned no results"),
        );
    }

    let keywords = &kind.definition(policy).keywords;
    let flagged = hits.iter().any(|hit| {
        let snippet = hit.snippet.to_lowercase();
        first_contained(&[snippet.as_str()], keywords).is_some()
    });

    let (judgment, reason) = if flagged {
        (Judgment::Flagged, kind.flagged_reason())
    } else {
        (Judgment::Clear, kind.clear_reason())
    };

    Evidence {
        check_id: kind.check_id().to_string(),
        judgment,
        reason: reason.to_string(),
        citations: bounded(hits, policy),
    }
}

/// Compare a vulnerability count with the threshold for the cost category.
pub fn classify_vulnerabilities(
    signal: Result<&VulnerabilitySignal, &SignalUnavailable>,
    category: CostCategory,
    policy: &EvidencePolicy,
) -> Evidence {
    let signal = match signal {
        Ok(signal) => signal,
        Err(err) => return unknown(ids::CHECK_VULNERABILITY_DB, err),
    };

    let thresholds = &policy.vulnerability;
    let threshold = thresholds.threshold_for(category);
    let judgment = if signal.count >= threshold {
        Judgment::Flagged
    } else {
        Judgment::Clear
    };
    let comparison = match judgment {
        Judgment::Flagged => "meets or exceeds",
        _ => "is below",
    };

    Evidence {
        check_id: ids::CHECK_VULNERABILITY_DB.to_string(),
        judgment,
        reason: format!(
            "{} vulnerability reports in the last {} years {} the {} threshold of {}",
            signal.count,
            thresholds.lookback_years,
            comparison,
            category.as_str(),
            threshold
        ),
        citations: bounded(&signal.citations, policy),
    }
}

/// Decide whether a repository is actively maintained.
pub fn classify_activity(
    signal: Result<&ActivitySignal, &SignalUnavailable>,
    policy: &EvidencePolicy,
) -> Evidence {
    let signal = match signal {
        Ok(signal) => signal,
        Err(err) => return unknown(ids::CHECK_REPOSITORY_ACTIVITY, err),
    };

    let activity = &policy.activity;
    let window_start = signal
        .as_of
        .checked_sub(Duration::days(i64::from(activity.window_days)))
        .unwrap_or(Date::MIN);
    let recent_commit = signal.last_commit.is_some_and(|d| d >= window_start);
    let active = recent_commit
        || signal.commit_count >= activity.min_commits
        || signal.release_count >= activity.min_releases;

    let last = match signal.last_commit {
        Some(d) => d.to_string(),
        None => "never".to_string(),
    };
    let summary = format!(
        "{} commits and {} releases in the last {} days, last commit {}",
        signal.commit_count, signal.release_count, activity.window_days, last
    );

    let (judgment, reason) = if active {
        (Judgment::Clear, format!("repository is maintained: {summary}"))
    } else {
        (Judgment::Flagged, format!("repository looks inactive: {summary}"))
    };

    Evidence {
        check_id: ids::CHECK_REPOSITORY_ACTIVITY.to_string(),
        judgment,
        reason,
        citations: bounded(&signal.citations, policy),
    }
}
