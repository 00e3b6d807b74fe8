use crate::cost::{CostError, parse_cost};
use crate::policy::EvidencePolicy;
use swaudit_types::{CostCategory, Flag, Submission, ids};

/// Normalized view of a submission that the rules read from.
///
/// Text fields are trimmed and lowercased copies are kept for case-insensitive matching.
/// Building the view never fails: malformed facts degrade to defaults and raise flags.
#[derive(Clone, Debug)]
pub struct Facts<'a> {
    /// Normalized cost; 0 when the field was missing or unparseable.
    pub cost: u64,
    /// False when the cost fell back to 0; cost-based flags are skipped then.
    pub cost_known: bool,
    pub subject: &'a str,
    pub vendor: &'a str,
    pub license: &'a str,
    pub department: &'a str,
    pub purpose: &'a str,
    subject_lower: String,
    purpose_lower: String,
    remarks_lower: String,
    license_lower: String,
}

impl<'a> Facts<'a> {
    pub fn collect(submission: &'a Submission, flags: &mut Vec<Flag>) -> Self {
        let (cost, cost_known) = match parse_cost(submission.cost.as_deref().unwrap_or("")) {
            Ok(cost) => (cost, true),
            Err(err) => {
                let message = match err {
                    CostError::Empty => "cost not provided; treated as 0".to_string(),
                    CostError::NotANumber(raw) => {
                        format!("cost '{raw}' could not be parsed; treated as 0")
                    }
                };
                flags.push(Flag::new(ids::FLAG_COST_UNKNOWN, message));
                (0, false)
            }
        };

        if submission.subject().is_empty() {
            flags.push(Flag::new(
                ids::FLAG_SUBJECT_MISSING,
                "software name not provided",
            ));
        }

        Self {
            cost,
            cost_known,
            subject: submission.subject(),
            vendor: submission.vendor(),
            license: submission.license(),
            department: submission.department(),
            purpose: submission.purpose(),
            subject_lower: submission.subject().to_lowercase(),
            purpose_lower: submission.purpose().to_lowercase(),
            remarks_lower: submission.remarks().to_lowercase(),
            license_lower: submission.license().to_lowercase(),
        }
    }

    /// First keyword contained in the purpose or the subject.
    pub fn purpose_or_subject_match<'k>(&self, keywords: &'k [String]) -> Option<&'k str> {
        first_contained(&[self.purpose_lower.as_str(), self.subject_lower.as_str()], keywords)
    }

    /// First keyword contained in the purpose or the remarks.
    pub fn purpose_or_remarks_match<'k>(&self, keywords: &'k [String]) -> Option<&'k str> {
        first_contained(&[self.purpose_lower.as_str(), self.remarks_lower.as_str()], keywords)
    }

    pub fn license_contains_any(&self, keywords: &[String]) -> bool {
        first_contained(&[self.license_lower.as_str()], keywords).is_some()
    }
}

/// First keyword (in list order) that occurs in any haystack. Haystacks must be lowercase.
pub fn first_contained<'k>(haystacks: &[&str], keywords: &'k [String]) -> Option<&'k str> {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .find(|k| {
            let needle = k.to_lowercase();
            haystacks.iter().any(|h| h.contains(&needle))
        })
}

/// Paid when the license label carries a paid marker or the stated cost is above zero.
pub fn cost_category(submission: &Submission, evidence: &EvidencePolicy) -> CostCategory {
    let license = submission.license().to_lowercase();
    if first_contained(&[license.as_str()], &evidence.paid_markers).is_some() {
        return CostCategory::Paid;
    }
    match parse_cost(submission.cost.as_deref().unwrap_or("")) {
        Ok(cost) if cost > 0 => CostCategory::Paid,
        _ => CostCategory::Free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{default_policy, submission};

    #[test]
    fn unparseable_cost_degrades_to_zero_with_flag() {
        let s = submission(&[("cost", "不明"), ("subject", "Tool")]);
        let mut flags = Vec::new();
        let facts = Facts::collect(&s, &mut flags);

        assert_eq!(facts.cost, 0);
        assert!(!facts.cost_known);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].code, ids::FLAG_COST_UNKNOWN);
    }

    #[test]
    fn missing_subject_is_flagged() {
        let s = submission(&[("cost", "0円")]);
        let mut flags = Vec::new();
        let _ = Facts::collect(&s, &mut flags);

        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].code, ids::FLAG_SUBJECT_MISSING);
    }

    #[test]
    fn keyword_matching_is_case_insensitive_and_skips_blank_keywords() {
        let keywords = vec!["  ".to_string(), "vpn".to_string()];
        assert_eq!(first_contained(&["社内vpn接続"], &keywords), Some("vpn"));

        let s = submission(&[("purpose", "Company VPN client"), ("subject", "Tunnel")]);
        let mut flags = Vec::new();
        let facts = Facts::collect(&s, &mut flags);
        assert_eq!(facts.purpose_or_remarks_match(&keywords), Some("vpn"));
    }

    #[test]
    fn cost_category_uses_paid_marker_then_cost() {
        let policy = default_policy();
        let paid_label = submission(&[("license", "有償"), ("cost", "0円")]);
        let paid_cost = submission(&[("license", "サブスクリプション"), ("cost", "1,200円")]);
        let free = submission(&[("license", "無償"), ("cost", "")]);

        assert_eq!(cost_category(&paid_label, &policy.evidence), CostCategory::Paid);
        assert_eq!(cost_category(&paid_cost, &policy.evidence), CostCategory::Paid);
        assert_eq!(cost_category(&free, &policy.evidence), CostCategory::Free);
    }
}
