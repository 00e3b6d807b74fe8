use swaudit_types::{Evidence, Judgment, JudgmentCounts, Verdict, VerdictKind};

pub const REASON_ALL_CLEAR: &str = "all evidence checks are clear";
pub const REASON_FLAGGED: &str =
    "one or more evidence checks raised concerns; approval is conditional on reviewer follow-up";
pub const REASON_INCONCLUSIVE: &str =
    "one or more evidence checks were inconclusive and are treated as flagged; approval is conditional on reviewer follow-up";

/// Combine evidence into one verdict. Any flagged or unknown item escalates.
///
/// The result does not depend on the order of `evidence`. An empty list is approved.
pub fn aggregate(evidence: &[Evidence]) -> Verdict {
    let mut counts = JudgmentCounts::default();
    for e in evidence {
        match e.judgment {
            Judgment::Clear => counts.clear += 1,
            Judgment::Flagged => counts.flagged += 1,
            Judgment::Unknown => counts.unknown += 1,
        }
    }

    let (kind, reason) = if counts.unknown > 0 {
        (VerdictKind::ConditionallyApproved, REASON_INCONCLUSIVE)
    } else if counts.flagged > 0 {
        (VerdictKind::ConditionallyApproved, REASON_FLAGGED)
    } else {
        (VerdictKind::Approved, REASON_ALL_CLEAR)
    };

    Verdict {
        kind,
        reason: reason.to_string(),
        counts,
    }
}
