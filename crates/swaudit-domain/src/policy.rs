use swaudit_types::CostCategory;

/// Auto-reject rule group. Checked first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RejectRules {
    /// Substrings matched (case-insensitively) against purpose and subject.
    pub prohibited_categories: Vec<String>,
    /// License labels matched exactly (after trimming).
    pub high_risk_licenses: Vec<String>,
}

/// Auto-approve rule group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApproveRules {
    /// Master switch for the trusted-vendor free-software rule.
    pub free_software: bool,
    pub known_vendors: Vec<String>,
    /// Keywords whose presence in the license label marks it as free.
    pub free_license_keywords: Vec<String>,
    /// Free-tier ceiling; costs at or below it get a low-cost flag.
    pub max_cost: u64,
}

/// Manual-review rule group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewRules {
    pub high_cost_threshold: u64,
    pub sensitive_departments: Vec<String>,
    /// Keywords matched (case-insensitively) against purpose and remarks.
    pub security_keywords: Vec<String>,
}

/// Definition of a keyword-driven text evidence check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextCheck {
    /// Search query template; `{subject}` is replaced with the software name.
    pub query: String,
    pub keywords: Vec<String>,
}

impl TextCheck {
    pub fn query_for(&self, subject: &str) -> String {
        self.query.replace("{subject}", subject)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VulnerabilityThresholds {
    pub paid: u64,
    pub free: u64,
    pub lookback_years: u32,
}

impl VulnerabilityThresholds {
    pub fn threshold_for(&self, category: CostCategory) -> u64 {
        match category {
            CostCategory::Paid => self.paid,
            CostCategory::Free => self.free,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityThresholds {
    pub window_days: u32,
    pub min_commits: u64,
    pub min_releases: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvidencePolicy {
    pub incident: TextCheck,
    pub reputation: TextCheck,
    pub vulnerability: VulnerabilityThresholds,
    pub activity: ActivityThresholds,
    /// Upper bound on citations kept per evidence item.
    pub max_citations: usize,
    /// License-label markers that put software in the paid category.
    pub paid_markers: Vec<String>,
}

/// The immutable rule set threaded into every evaluation.
///
/// Precedence is fixed by the engine, not by this value: reject, approve, manual review, then
/// the baseline default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    pub reject: RejectRules,
    pub approve: ApproveRules,
    pub review: ReviewRules,
    pub evidence: EvidencePolicy,
}
