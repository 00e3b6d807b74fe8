//! Stable identifiers for rules, advisory flags and evidence checks.
//!
//! Rule ids are a dotted `stage.name` namespace. Flag codes are short kebab-case discriminators.

// Rules: auto-reject
pub const RULE_REJECT_PROHIBITED_CATEGORY: &str = "reject.prohibited_category";
pub const RULE_REJECT_HIGH_RISK_LICENSE: &str = "reject.high_risk_license";

// Rules: auto-approve
pub const RULE_APPROVE_TRUSTED_VENDOR_FREE: &str = "approve.trusted_vendor_free";

// Rules: advisory
pub const RULE_FLAG_LOW_COST: &str = "flag.low_cost";

// Rules: manual review
pub const RULE_REVIEW_HIGH_COST: &str = "review.high_cost";
pub const RULE_REVIEW_SENSITIVE_DEPARTMENT: &str = "review.sensitive_department";
pub const RULE_REVIEW_SECURITY_KEYWORD: &str = "review.security_keyword";

// Rules: fallback
pub const RULE_DEFAULT_BASELINE: &str = "default.baseline";

// Flags
pub const FLAG_COST_UNKNOWN: &str = "cost-unknown";
pub const FLAG_LOW_COST: &str = "low-cost";
pub const FLAG_SUBJECT_MISSING: &str = "subject-missing";

// Evidence checks
pub const CHECK_INCIDENT_REPORTS: &str = "evidence.incident_reports";
pub const CHECK_VULNERABILITY_DB: &str = "evidence.vulnerability_db";
pub const CHECK_VENDOR_REPUTATION: &str = "evidence.vendor_reputation";
pub const CHECK_REPOSITORY_ACTIVITY: &str = "evidence.repository_activity";
