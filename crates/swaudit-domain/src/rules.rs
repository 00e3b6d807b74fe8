use crate::model::Facts;
use crate::policy::Policy;
use swaudit_types::{DecisionKind, Flag, ids};

/// Terminal outcome proposed by a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub kind: DecisionKind,
    pub reason: String,
}

/// What a rule did with the facts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Stop evaluating; this rule decides.
    Decide(Outcome),
    /// Annotate and keep going.
    Flag(Flag),
    Continue,
}

pub struct Rule {
    pub id: &'static str,
    pub apply: fn(&Facts<'_>, &Policy) -> Step,
}

/// Rules in evaluation order. Rejects come first, then approvals, advisory flags and the
/// manual-review escalators. The engine falls back to the baseline approval when all continue.
pub const RULES: &[Rule] = &[
    Rule {
        id: ids::RULE_REJECT_PROHIBITED_CATEGORY,
        apply: prohibited_category,
    },
    Rule {
        id: ids::RULE_REJECT_HIGH_RISK_LICENSE,
        apply: high_risk_license,
    },
    Rule {
        id: ids::RULE_APPROVE_TRUSTED_VENDOR_FREE,
        apply: trusted_vendor_free,
    },
    Rule {
        id: ids::RULE_FLAG_LOW_COST,
        apply: low_cost,
    },
    Rule {
        id: ids::RULE_REVIEW_HIGH_COST,
        apply: high_cost,
    },
    Rule {
        id: ids::RULE_REVIEW_SENSITIVE_DEPARTMENT,
        apply: sensitive_department,
    },
    Rule {
        id: ids::RULE_REVIEW_SECURITY_KEYWORD,
        apply: security_keyword,
    },
];

fn decide(kind: DecisionKind, reason: String) -> Step {
    Step::Decide(Outcome { kind, reason })
}

fn prohibited_category(facts: &Facts<'_>, policy: &Policy) -> Step {
    match facts.purpose_or_subject_match(&policy.reject.prohibited_categories) {
        Some(category) => decide(
            DecisionKind::Rejected,
            format!("prohibited category: {category}"),
        ),
        None => Step::Continue,
    }
}

fn high_risk_license(facts: &Facts<'_>, policy: &Policy) -> Step {
    if facts.license.is_empty() {
        return Step::Continue;
    }
    match policy
        .reject
        .high_risk_licenses
        .iter()
        .find(|l| l.trim() == facts.license)
    {
        Some(license) => decide(
            DecisionKind::Rejected,
            format!("high-risk license: {}", license.trim()),
        ),
        None => Step::Continue,
    }
}

fn trusted_vendor_free(facts: &Facts<'_>, policy: &Policy) -> Step {
    let approve = &policy.approve;
    if !approve.free_software || facts.cost != 0 || facts.vendor.is_empty() {
        return Step::Continue;
    }
    if !facts.license_contains_any(&approve.free_license_keywords) {
        return Step::Continue;
    }
    let known = approve
        .known_vendors
        .iter()
        .any(|v| v.trim().eq_ignore_ascii_case(facts.vendor));
    if !known {
        return Step::Continue;
    }
    decide(
        DecisionKind::Approved,
        format!("free software from trusted vendor: {}", facts.vendor),
    )
}

fn low_cost(facts: &Facts<'_>, policy: &Policy) -> Step {
    if facts.cost_known && facts.cost <= policy.approve.max_cost {
        Step::Flag(Flag::new(
            ids::FLAG_LOW_COST,
            format!(
                "cost {} is within the free-tier ceiling {}",
                facts.cost, policy.approve.max_cost
            ),
        ))
    } else {
        Step::Continue
    }
}

fn high_cost(facts: &Facts<'_>, policy: &Policy) -> Step {
    let threshold = policy.review.high_cost_threshold;
    if facts.cost > threshold {
        decide(
            DecisionKind::ManualReview,
            format!(
                "high cost: {} exceeds the threshold {}",
                facts.cost, threshold
            ),
        )
    } else {
        Step::Continue
    }
}

fn sensitive_department(facts: &Facts<'_>, policy: &Policy) -> Step {
    if facts.department.is_empty() {
        return Step::Continue;
    }
    let sensitive = policy
        .review
        .sensitive_departments
        .iter()
        .any(|d| d.trim() == facts.department);
    if sensitive {
        decide(
            DecisionKind::ManualReview,
            format!("sensitive department: {}", facts.department),
        )
    } else {
        Step::Continue
    }
}

fn security_keyword(facts: &Facts<'_>, policy: &Policy) -> Step {
    match facts.purpose_or_remarks_match(&policy.review.security_keywords) {
        Some(keyword) => decide(
            DecisionKind::ManualReview,
            format!("security-sensitive keyword: {keyword}"),
        ),
        None => Step::Continue,
    }
}
