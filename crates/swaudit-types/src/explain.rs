//! Explain registry for rules, flags and evidence checks.
//!
//! Maps stable identifiers to human-readable explanations with reviewer guidance.

use crate::ids;

/// Explanation entry for a rule, flag or check.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/flag/check.
    pub title: &'static str,
    /// What triggers it and what it means for the submission.
    pub description: &'static str,
    /// What a reviewer or applicant should do about it.
    pub remediation: &'static str,
    /// A submission (JSON) that triggers it under the default policy.
    pub example: &'static str,
}

/// Look up an explanation by rule id, flag code or check id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Rules
        ids::RULE_REJECT_PROHIBITED_CATEGORY => Some(explain_prohibited_category()),
        ids::RULE_REJECT_HIGH_RISK_LICENSE => Some(explain_high_risk_license()),
        ids::RULE_APPROVE_TRUSTED_VENDOR_FREE => Some(explain_trusted_vendor_free()),
        ids::RULE_FLAG_LOW_COST | ids::FLAG_LOW_COST => Some(explain_low_cost()),
        ids::RULE_REVIEW_HIGH_COST => Some(explain_high_cost()),
        ids::RULE_REVIEW_SENSITIVE_DEPARTMENT => Some(explain_sensitive_department()),
        ids::RULE_REVIEW_SECURITY_KEYWORD => Some(explain_security_keyword()),
        ids::RULE_DEFAULT_BASELINE => Some(explain_baseline()),

        // Flags
        ids::FLAG_COST_UNKNOWN => Some(explain_cost_unknown()),
        ids::FLAG_SUBJECT_MISSING => Some(explain_subject_missing()),

        // Evidence checks
        ids::CHECK_INCIDENT_REPORTS => Some(explain_incident_reports()),
        ids::CHECK_VULNERABILITY_DB => Some(explain_vulnerability_db()),
        ids::CHECK_VENDOR_REPUTATION => Some(explain_vendor_reputation()),
        ids::CHECK_REPOSITORY_ACTIVITY => Some(explain_repository_activity()),

        _ => None,
    }
}

/// All rule ids, in evaluation order.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_REJECT_PROHIBITED_CATEGORY,
        ids::RULE_REJECT_HIGH_RISK_LICENSE,
        ids::RULE_APPROVE_TRUSTED_VENDOR_FREE,
        ids::RULE_FLAG_LOW_COST,
        ids::RULE_REVIEW_HIGH_COST,
        ids::RULE_REVIEW_SENSITIVE_DEPARTMENT,
        ids::RULE_REVIEW_SECURITY_KEYWORD,
        ids::RULE_DEFAULT_BASELINE,
    ]
}

pub fn all_flag_codes() -> &'static [&'static str] {
    &[
        ids::FLAG_COST_UNKNOWN,
        ids::FLAG_LOW_COST,
        ids::FLAG_SUBJECT_MISSING,
    ]
}

pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_INCIDENT_REPORTS,
        ids::CHECK_VULNERABILITY_DB,
        ids::CHECK_VENDOR_REPUTATION,
        ids::CHECK_REPOSITORY_ACTIVITY,
    ]
}

// --- Rules ---

fn explain_prohibited_category() -> Explanation {
    Explanation {
        title: "Prohibited Category",
        description: "\
Rejects a submission whose purpose or software name contains one of the prohibited category
substrings (`auto_reject.prohibited_categories`). Matching is case-insensitive. This is the
first rule evaluated, so it wins over every approval rule.",
        remediation: "\
The software falls into a category the organisation does not permit. If the match is a false
positive, reword the purpose or ask the policy owner to narrow the category list.",
        example: r#"{"subject": "Share", "purpose": "P2Pファイル共有ソフト"}"#,
    }
}

fn explain_high_risk_license() -> Explanation {
    Explanation {
        title: "High-Risk License",
        description: "\
Rejects a submission whose license label exactly equals one of
`auto_reject.high_risk_licenses` (for example an unknown or proprietary one-off license).",
        remediation: "\
Confirm the actual license terms with the vendor and resubmit with a recognised license label.",
        example: r#"{"subject": "Tool", "license": "不明"}"#,
    }
}

fn explain_trusted_vendor_free() -> Explanation {
    Explanation {
        title: "Trusted Vendor Free Software",
        description: "\
Approves a submission that costs nothing, whose license label contains a free-license keyword,
and whose vendor appears in `auto_approve.known_vendors`.",
        remediation: "No action needed.",
        example: r#"{"vendor": "Microsoft", "cost": "0円", "license": "無料", "purpose": "文書作成"}"#,
    }
}

fn explain_low_cost() -> Explanation {
    Explanation {
        title: "Low Cost",
        description: "\
Advisory flag raised when the normalized cost is at or below `auto_approve.max_cost_yen`.
A cost that could not be parsed gets `cost-unknown` instead and is never flagged low-cost.
It never decides the outcome; evaluation continues with the manual-review rules.",
        remediation: "No action needed; the flag is informational.",
        example: r#"{"subject": "Editor", "cost": "3,000円"}"#,
    }
}

fn explain_high_cost() -> Explanation {
    Explanation {
        title: "High Cost",
        description: "\
Routes a submission to manual review when its cost exceeds
`require_manual_review.high_cost_threshold`.",
        remediation: "A reviewer must confirm the budget before the purchase is approved.",
        example: r#"{"subject": "Suite", "cost": "80,000円", "department": "総務部"}"#,
    }
}

fn explain_sensitive_department() -> Explanation {
    Explanation {
        title: "Sensitive Department",
        description: "\
Routes a submission to manual review when the requesting department is listed in
`require_manual_review.sensitive_departments`.",
        remediation: "A reviewer must confirm data-handling requirements for the department.",
        example: r#"{"subject": "Viewer", "cost": "0円", "department": "経理部"}"#,
    }
}

fn explain_security_keyword() -> Explanation {
    Explanation {
        title: "Security Keyword",
        description: "\
Routes a submission to manual review when its purpose or remarks mention one of
`require_manual_review.security_keywords` (remote access, VPN, encryption, ...).",
        remediation: "A reviewer must assess the security impact of the intended use.",
        example: r#"{"subject": "Connect", "purpose": "社外からのリモートアクセス"}"#,
    }
}

fn explain_baseline() -> Explanation {
    Explanation {
        title: "Baseline Criteria",
        description: "\
Fallback approval when no reject, approve or manual-review rule matched. Advisory flags raised
along the way are kept on the decision.",
        remediation: "No action needed.",
        example: r#"{"subject": "Notes", "vendor": "Example", "cost": "20,000円"}"#,
    }
}

// --- Flags ---

fn explain_cost_unknown() -> Explanation {
    Explanation {
        title: "Cost Unknown",
        description: "\
The cost field was empty or could not be normalized into a non-negative integer. Evaluation
continues with a cost of 0.",
        remediation: "Ask the applicant for a numeric amount such as `5,000円/年`.",
        example: r#"{"subject": "Tool", "cost": "不明"}"#,
    }
}

fn explain_subject_missing() -> Explanation {
    Explanation {
        title: "Subject Missing",
        description: "\
The submission has no software name. Name-based rules and evidence checks cannot match it.",
        remediation: "Ask the applicant to fill in the software name.",
        example: r#"{"vendor": "Example"}"#,
    }
}

// --- Evidence checks ---

fn explain_incident_reports() -> Explanation {
    Explanation {
        title: "Security Incident Reports",
        description: "\
Web search for security incidents involving the software. Flagged when any returned snippet
contains an incident keyword; unknown when the search is unavailable or returns nothing.",
        remediation: "Read the cited articles and decide whether the incidents are still relevant.",
        example: r#"{"subject": "Example Chat"}"#,
    }
}

fn explain_vulnerability_db() -> Explanation {
    Explanation {
        title: "Vulnerability Database",
        description: "\
Counts vulnerability reports published for the software within the lookback window. Flagged
when the count reaches the threshold for the software's cost category (paid: 10, free: 5).",
        remediation: "Check that the reported vulnerabilities are fixed in the version to be installed.",
        example: r#"{"subject": "Apache", "license": "無償"}"#,
    }
}

fn explain_vendor_reputation() -> Explanation {
    Explanation {
        title: "Vendor Reputation",
        description: "\
Web search for reviews of the software. Flagged when any returned snippet contains a negative
reputation keyword; unknown when the search is unavailable or returns nothing.",
        remediation: "Read the cited reviews and confirm the concerns do not apply.",
        example: r#"{"subject": "Example Cleaner"}"#,
    }
}

fn explain_repository_activity() -> Explanation {
    Explanation {
        title: "Repository Activity",
        description: "\
Checks whether the source repository is maintained: the last commit falls within the activity
window, or the commit or release count in the window meets its threshold. Flagged otherwise.",
        remediation: "Prefer an actively maintained alternative or plan for vendoring patches.",
        example: r#"{"subject": "httpd", "url": "https://github.com/apache/httpd"}"#,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_identifier_has_an_explanation() {
        for id in all_rule_ids()
            .iter()
            .chain(all_flag_codes())
            .chain(all_check_ids())
        {
            assert!(lookup_explanation(id).is_some(), "missing explanation for {id}");
        }
    }

    #[test]
    fn unknown_identifier_is_none() {
        assert!(lookup_explanation("reject.nope").is_none());
    }
}
