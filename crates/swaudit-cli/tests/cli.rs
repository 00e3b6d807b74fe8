//! End-to-end CLI tests.
//!
//! Each test runs the `swaudit` binary inside a temp directory so the default policy path
//! (`config/audit_rules.json`) and artifact paths never touch the source tree.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::thread;
use swaudit_test_util::normalize_nondeterministic;
use tempfile::TempDir;
use tiny_http::{Response, Server};

/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn swaudit_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("swaudit").expect("swaudit binary not found");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read json");
    serde_json::from_str(&text).expect("parse json")
}

/// A policy whose external sources all point at `endpoint`.
fn policy_with_sources(dir: &Path, endpoint: &str) -> PathBuf {
    let path = dir.join("policy.json");
    let doc = serde_json::json!({
        "sources": {
            "search": {"endpoint": format!("{endpoint}/search"), "api_key_env": "SWAUDIT_TEST_NO_KEY"},
            "vulnerability_db": {"endpoint": format!("{endpoint}/myjvn"), "timeout_secs": 5},
            "activity": {"endpoint": endpoint, "token_env": "SWAUDIT_TEST_NO_TOKEN", "timeout_secs": 5}
        }
    });
    std::fs::write(&path, doc.to_string()).expect("write policy");
    path
}

// ============================================================================
// review
// ============================================================================

#[test]
fn review_matches_golden_report() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("out/review.json");

    swaudit_cmd(tmp.path())
        .arg("review")
        .arg("--input")
        .arg(fixtures_dir().join("review"))
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "5 submissions (approved 2, rejected 1, manual review 2)",
        ));

    let actual = normalize_nondeterministic(read_json(&report));
    let expected = read_json(&fixtures_dir().join("expected.review.json"));
    assert_eq!(actual, expected);

    // The missing default policy was materialized.
    assert!(tmp.path().join("config/audit_rules.json").exists());
}

#[test]
fn review_under_custom_toml_policy() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("review.json");

    swaudit_cmd(tmp.path())
        .arg("--policy")
        .arg(fixtures_dir().join("strict-policy.toml"))
        .arg("review")
        .arg("--input")
        .arg(fixtures_dir().join("review/requests.csv"))
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success();

    let value = read_json(&report);
    assert_eq!(value["counts"]["approved"], 1);
    assert_eq!(value["counts"]["rejected"], 1);
    assert_eq!(value["counts"]["manual_review"], 3);
    assert_eq!(
        value["records"][4]["decision"]["reason"],
        "sensitive department: 開発部"
    );
}

#[test]
fn review_writes_markdown_and_archives_inputs() {
    let tmp = TempDir::new().expect("temp dir");
    let inbox = tmp.path().join("inbox");
    std::fs::create_dir_all(&inbox).expect("mkdir");
    std::fs::copy(
        fixtures_dir().join("review/requests.csv"),
        inbox.join("requests.csv"),
    )
    .expect("copy fixture");

    swaudit_cmd(tmp.path())
        .args(["review", "--input", "inbox", "--write-markdown", "--archive-dir", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archived:"));

    let md = std::fs::read_to_string(tmp.path().join("artifacts/swaudit/review.md"))
        .expect("read markdown");
    assert!(md.contains("## Rejected (1)"));
    assert!(md.contains("## Manual review (2)"));
    assert!(!inbox.join("requests.csv").exists());
    assert!(tmp.path().join("done/requests.csv").exists());
}

#[test]
fn review_of_missing_input_fails_with_exit_1() {
    let tmp = TempDir::new().expect("temp dir");

    swaudit_cmd(tmp.path())
        .args(["review", "--input", "nowhere.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("swaudit error:"))
        .stderr(predicate::str::contains("input not found"));
}

#[test]
fn invalid_policy_fails_before_evaluation() {
    let tmp = TempDir::new().expect("temp dir");
    let policy = tmp.path().join("bad.json");
    std::fs::write(&policy, r#"{"evidence": {"max_citations": 1}}"#).expect("write");

    swaudit_cmd(tmp.path())
        .arg("--policy")
        .arg(&policy)
        .arg("review")
        .arg("--input")
        .arg(fixtures_dir().join("review"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("evidence.max_citations"));

    assert!(!tmp.path().join("artifacts/swaudit/review.json").exists());
}

// ============================================================================
// audit
// ============================================================================

const MYJVN_FEW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns="http://purl.org/rss/1.0/"
         xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:status="http://jvndb.jvn.jp/myjvn/Status">
  <status:Status retCd="0" errCd="" errMsg="" totalRes="1" totalResRet="0"/>
</rdf:RDF>"#;

/// Answer `requests` MyJVN requests with a low vulnerability count.
fn serve_myjvn(requests: usize) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("bind stub server");
    let addr = server.server_addr().to_ip().expect("ip address");
    let handle = thread::spawn(move || {
        for _ in 0..requests {
            let Ok(request) = server.recv() else { break };
            let _ = request.respond(Response::from_string(MYJVN_FEW));
        }
    });
    (format!("http://{addr}"), handle)
}

#[test]
fn audit_with_clear_evidence_exits_0() {
    let tmp = TempDir::new().expect("temp dir");
    let (endpoint, handle) = serve_myjvn(1);
    let policy = policy_with_sources(tmp.path(), &endpoint);

    swaudit_cmd(tmp.path())
        .arg("--policy")
        .arg(&policy)
        .args([
            "audit",
            "--subject",
            "Example",
            "--category",
            "free",
            "--skip-search",
            "--write-markdown",
        ])
        .assert()
        .code(0);
    handle.join().expect("stub server");

    let report = read_json(&tmp.path().join("artifacts/swaudit/audit.json"));
    assert_eq!(report["schema"], "swaudit.audit.v1");
    assert_eq!(report["verdict"]["kind"], "approved");
    assert_eq!(report["evidence"][0]["check_id"], "evidence.vulnerability_db");
    assert_eq!(report["evidence"][0]["judgment"], "clear");

    let md = std::fs::read_to_string(tmp.path().join("artifacts/swaudit/audit.md"))
        .expect("read markdown");
    assert!(md.contains("- Verdict: **APPROVED**"));
}

#[test]
fn audit_with_unavailable_evidence_exits_2() {
    let tmp = TempDir::new().expect("temp dir");
    // Nothing listens on the discard port; every source fails fast.
    let policy = policy_with_sources(tmp.path(), "http://127.0.0.1:9");

    swaudit_cmd(tmp.path())
        .arg("--policy")
        .arg(&policy)
        .env_remove("SWAUDIT_TEST_NO_KEY")
        .args([
            "audit",
            "--subject",
            "Example",
            "--category",
            "paid",
            "--repository",
            "https://github.com/example/example",
        ])
        .assert()
        .code(2);

    let report = read_json(&tmp.path().join("artifacts/swaudit/audit.json"));
    assert_eq!(report["verdict"]["kind"], "conditionally_approved");
    assert_eq!(report["verdict"]["counts"]["unknown"], 4);
    let evidence = report["evidence"].as_array().expect("evidence array");
    assert!(evidence.iter().all(|e| e["judgment"] == "unknown"));
    assert!(
        evidence[0]["reason"]
            .as_str()
            .expect("reason")
            .contains("SWAUDIT_TEST_NO_KEY")
    );
}

#[test]
fn audit_derives_category_from_license_label() {
    let tmp = TempDir::new().expect("temp dir");
    let (endpoint, handle) = serve_myjvn(1);
    let policy = policy_with_sources(tmp.path(), &endpoint);

    swaudit_cmd(tmp.path())
        .arg("--policy")
        .arg(&policy)
        .args(["audit", "--subject", "Example", "--license", "有償", "--skip-search"])
        .assert()
        .code(0);
    handle.join().expect("stub server");

    let report = read_json(&tmp.path().join("artifacts/swaudit/audit.json"));
    assert_eq!(report["category"], "paid");
}

/// Serve `requests` requests: MyJVN lookups get a low count, GitHub listings come back empty.
/// Joining the handle yields the request paths in arrival order.
fn serve_myjvn_and_github(requests: usize) -> (String, thread::JoinHandle<Vec<String>>) {
    let server = Server::http("127.0.0.1:0").expect("bind stub server");
    let addr = server.server_addr().to_ip().expect("ip address");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..requests {
            let Ok(request) = server.recv() else { break };
            let url = request.url().to_string();
            let body = if url.starts_with("/myjvn") { MYJVN_FEW } else { "[]" };
            let _ = request.respond(Response::from_string(body));
            seen.push(url);
        }
        seen
    });
    (format!("http://{addr}"), handle)
}

#[test]
fn audit_from_submission_file_uses_reference_url_as_repository() {
    let tmp = TempDir::new().expect("temp dir");
    // Vulnerability lookup, commits in window, latest commit, releases.
    let (endpoint, handle) = serve_myjvn_and_github(4);
    let policy = policy_with_sources(tmp.path(), &endpoint);
    std::fs::write(
        tmp.path().join("requests.csv"),
        "申請ID,ソフトウェア名,ライセンス形態,コスト,参考URL\n\
         A-9,Tool,無料,0円,https://github.com/example/tool\n",
    )
    .expect("write requests");

    swaudit_cmd(tmp.path())
        .arg("--policy")
        .arg(&policy)
        .args(["audit", "--input", "requests.csv", "--skip-search"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("1 submissions audited"));
    let paths = handle.join().expect("stub server");
    assert!(
        paths
            .iter()
            .any(|p| p.starts_with("/repos/example/tool/commits")),
        "{paths:?}"
    );

    let report = read_json(&tmp.path().join("artifacts/swaudit/audits/A-9.json"));
    assert_eq!(report["subject"], "Tool");
    assert_eq!(report["category"], "free");
    assert_eq!(report["repository"], "example/tool");
    assert_eq!(report["evidence"][0]["judgment"], "clear");
    assert_eq!(report["evidence"][1]["check_id"], "evidence.repository_activity");
    assert_eq!(report["evidence"][1]["judgment"], "flagged");
}

#[test]
fn audit_rejects_subject_together_with_input() {
    let tmp = TempDir::new().expect("temp dir");

    swaudit_cmd(tmp.path())
        .args(["audit", "--subject", "Tool", "--input", "requests.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// ============================================================================
// init-policy, explain, md, schema
// ============================================================================

#[test]
fn init_policy_writes_once_and_respects_force() {
    let tmp = TempDir::new().expect("temp dir");

    swaudit_cmd(tmp.path())
        .arg("init-policy")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote default policy"));

    let written = read_json(&tmp.path().join("config/audit_rules.json"));
    assert_eq!(written["schema"], "swaudit.policy.v1");
    assert_eq!(written["auto_approve"]["max_cost_yen"], 10000);

    swaudit_cmd(tmp.path())
        .arg("init-policy")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    swaudit_cmd(tmp.path())
        .args(["init-policy", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("overwrote"));
}

#[test]
fn explain_known_and_unknown_identifiers() {
    let tmp = TempDir::new().expect("temp dir");

    swaudit_cmd(tmp.path())
        .args(["explain", "review.high_cost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"));

    swaudit_cmd(tmp.path())
        .args(["explain", "bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule id, flag code or check id: bogus"));
}

#[test]
fn md_renders_existing_report() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("review.json");

    swaudit_cmd(tmp.path())
        .arg("review")
        .arg("--input")
        .arg(fixtures_dir().join("review/requests.csv"))
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success();

    swaudit_cmd(tmp.path())
        .arg("md")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Software review report"))
        .stdout(predicate::str::contains("prohibited category: P2P"));
}

#[test]
fn schema_is_valid_json_schema_and_accepts_default_policy() {
    let tmp = TempDir::new().expect("temp dir");

    let output = swaudit_cmd(tmp.path())
        .arg("schema")
        .output()
        .expect("run schema");
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).expect("schema json");

    swaudit_cmd(tmp.path())
        .arg("init-policy")
        .assert()
        .success();
    let policy = read_json(&tmp.path().join("config/audit_rules.json"));

    let validator = jsonschema::validator_for(&schema).expect("valid schema");
    assert!(validator.is_valid(&policy));
    assert!(!validator.is_valid(&serde_json::json!({"auto_approve": {"max_cost_yen": "cheap"}})));
}
