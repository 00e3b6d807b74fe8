use crate::policy::{
    ActivityThresholds, ApproveRules, EvidencePolicy, Policy, RejectRules, ReviewRules, TextCheck,
    VulnerabilityThresholds,
};
use swaudit_types::{Citation, Evidence, Judgment, Submission};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Mirrors the shipped default policy document.
pub fn default_policy() -> Policy {
    Policy {
        reject: RejectRules {
            prohibited_categories: strings(&["P2P", "暗号通貨マイニング"]),
            high_risk_licenses: strings(&["不明", "独自"]),
        },
        approve: ApproveRules {
            free_software: true,
            known_vendors: strings(&[
                "Microsoft",
                "Google",
                "Apple",
                "Mozilla",
                "Python Software Foundation",
                "Linux Foundation",
            ]),
            free_license_keywords: strings(&["無料"]),
            max_cost: 10_000,
        },
        review: ReviewRules {
            high_cost_threshold: 50_000,
            sensitive_departments: strings(&["経理部", "人事部"]),
            security_keywords: strings(&["リモートアクセス", "VPN", "暗号化"]),
        },
        evidence: EvidencePolicy {
            incident: TextCheck {
                query: "{subject} セキュリティ インシデント 情報漏洩".to_string(),
                keywords: strings(&[
                    "情報漏洩",
                    "セキュリティ侵害",
                    "脆弱性",
                    "ハッキング",
                    "不正アクセス",
                ]),
            },
            reputation: TextCheck {
                query: "{subject} 評判 レビュー".to_string(),
                keywords: strings(&["危険", "注意", "おすすめしない", "問題", "トラブル"]),
            },
            vulnerability: VulnerabilityThresholds {
                paid: 10,
                free: 5,
                lookback_years: 5,
            },
            activity: ActivityThresholds {
                window_days: 365,
                min_commits: 12,
                min_releases: 1,
            },
            max_citations: 2,
            paid_markers: strings(&["有償"]),
        },
    }
}

/// Build a submission from `(field, value)` pairs. Unknown field names panic.
pub fn submission(fields: &[(&str, &str)]) -> Submission {
    let mut s = Submission::default();
    for (field, value) in fields {
        let value = Some(value.to_string());
        match *field {
            "id" => s.id = value,
            "applicant" => s.applicant = value,
            "subject" => s.subject = value,
            "vendor" => s.vendor = value,
            "license" => s.license = value,
            "cost" => s.cost = value,
            "purpose" => s.purpose = value,
            "remarks" => s.remarks = value,
            "department" => s.department = value,
            "url" => s.url = value,
            other => panic!("unknown submission field: {other}"),
        }
    }
    s
}

pub fn citation(title: &str, snippet: &str) -> Citation {
    Citation {
        title: title.to_string(),
        url: format!("https://example.com/{}", title.to_lowercase()),
        snippet: snippet.to_string(),
    }
}

pub fn evidence(judgment: Judgment) -> Evidence {
    Evidence {
        check_id: "evidence.test".to_string(),
        judgment,
        reason: "test".to_string(),
        citations: Vec::new(),
    }
}
