use swaudit_domain::policy::{
    ActivityThresholds, ApproveRules, EvidencePolicy, Policy, RejectRules, ReviewRules, TextCheck,
    VulnerabilityThresholds,
};
use swaudit_intake::ColumnMap;
use swaudit_sources::{ActivityConfig, SearchConfig, SourceSettings, VulnerabilityDbConfig};

use crate::resolve::IntakeSettings;

/// The shipped defaults.
///
/// Keep these readable. Organisation-specific lists belong in the policy document.
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

pub fn default_sources() -> SourceSettings {
    SourceSettings {
        search: SearchConfig {
            endpoint: "https://serpapi.com/search".to_string(),
            api_key_env: "SERPAPI_KEY".to_string(),
            timeout_secs: 10,
            num_results: 3,
            language: "ja".to_string(),
            country: "jp".to_string(),
        },
        vulnerability: VulnerabilityDbConfig {
            endpoint: "https://jvndb.jvn.jp/myjvn".to_string(),
            search_page: "https://jvndb.jvn.jp/search/index.php".to_string(),
            timeout_secs: 30,
        },
        activity: ActivityConfig {
            endpoint: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            timeout_secs: 30,
        },
    }
}

pub fn default_intake() -> IntakeSettings {
    IntakeSettings {
        columns: ColumnMap {
            id: "申請ID".to_string(),
            applicant: "申請者".to_string(),
            subject: "ソフトウェア名".to_string(),
            vendor: "ベンダー".to_string(),
            license: "ライセンス形態".to_string(),
            cost: "コスト".to_string(),
            purpose: "利用目的".to_string(),
            remarks: "備考".to_string(),
            department: "部署".to_string(),
            url: "参考URL".to_string(),
        },
        skip_files: strings(&["sample.csv"]),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
