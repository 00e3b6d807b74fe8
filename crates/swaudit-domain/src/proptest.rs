//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Decision totality (one terminal kind, one non-empty reason)
//! - Determinism of evaluation and aggregation
//! - Rule precedence and cost normalization

use crate::cost::parse_cost;
use crate::engine::{evaluate, evaluate_all};
use crate::test_support::{default_policy, evidence};
use crate::verdict::aggregate;
use proptest::prelude::*;
use swaudit_types::{DecisionKind, Judgment, Submission, VerdictKind, ids};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Free text mixing ASCII, Japanese and words the default policy reacts to.
fn arb_text() -> impl Strategy<Value = Option<String>> {
    let word = prop_oneof![
        prop::string::string_regex("[A-Za-z0-9 ]{0,12}").unwrap(),
        Just("P2P".to_string()),
        Just("VPN".to_string()),
        Just("無料".to_string()),
        Just("不明".to_string()),
        Just("経理部".to_string()),
        Just("文書作成".to_string()),
        Just("Microsoft".to_string()),
    ];
    prop::option::of(word)
}

fn arb_cost() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        (0u64..200_000).prop_map(|n| n.to_string()),
        (0u64..200_000).prop_map(|n| format!("{n}円")),
        (0u64..200_000).prop_map(|n| format!("¥{n}/年")),
        Just("不明".to_string()),
        Just(String::new()),
    ])
}

fn arb_submission() -> impl Strategy<Value = Submission> {
    (
        arb_text(),
        arb_text(),
        arb_text(),
        arb_cost(),
        arb_text(),
        arb_text(),
        arb_text(),
    )
        .prop_map(
            |(subject, vendor, license, cost, purpose, remarks, department)| Submission {
                subject,
                vendor,
                license,
                cost,
                purpose,
                remarks,
                department,
                ..Submission::default()
            },
        )
}

fn arb_judgment() -> impl Strategy<Value = Judgment> {
    prop_oneof![
        Just(Judgment::Clear),
        Just(Judgment::Flagged),
        Just(Judgment::Unknown),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn every_submission_gets_one_non_empty_reason(s in arb_submission()) {
        let d = evaluate(&s, &default_policy());
        prop_assert!(!d.reason.is_empty());
        prop_assert!(!d.rule_id.is_empty());
    }

    #[test]
    fn evaluation_is_idempotent(s in arb_submission()) {
        let policy = default_policy();
        prop_assert_eq!(evaluate(&s, &policy), evaluate(&s, &policy));
    }

    #[test]
    fn prohibited_subject_always_rejects(mut s in arb_submission()) {
        s.subject = Some("P2P Share".to_string());
        s.vendor = Some("Microsoft".to_string());
        s.license = Some("無料".to_string());
        s.cost = Some("0".to_string());

        let d = evaluate(&s, &default_policy());
        prop_assert_eq!(d.kind, DecisionKind::Rejected);
    }

    #[test]
    fn rule_flags_never_decide(s in arb_submission()) {
        let d = evaluate(&s, &default_policy());
        for flag in &d.flags {
            prop_assert!(flag.code != d.rule_id);
        }
        if d.rule_id == ids::RULE_DEFAULT_BASELINE {
            prop_assert_eq!(d.kind, DecisionKind::Approved);
        }
    }

    #[test]
    fn plain_amounts_parse_to_themselves(n in 0u64..10_000_000) {
        prop_assert_eq!(parse_cost(&n.to_string()), Ok(n));
        prop_assert_eq!(parse_cost(&format!("{n}円/月")), Ok(n));
    }

    #[test]
    fn batch_matches_single_evaluation(batch in prop::collection::vec(arb_submission(), 0..16)) {
        let policy = default_policy();
        let all = evaluate_all(&batch, &policy);
        let one_by_one: Vec<_> = batch.iter().map(|s| evaluate(s, &policy)).collect();
        prop_assert_eq!(all, one_by_one);
    }

    #[test]
    fn aggregation_is_order_independent(judgments in prop::collection::vec(arb_judgment(), 0..8)) {
        let items: Vec<_> = judgments.iter().copied().map(evidence).collect();
        let mut reversed = items.clone();
        reversed.reverse();

        prop_assert_eq!(aggregate(&items), aggregate(&reversed));
    }

    #[test]
    fn unknown_never_yields_approved(judgments in prop::collection::vec(arb_judgment(), 1..8)) {
        let mut items: Vec<_> = judgments.iter().copied().map(evidence).collect();
        items.push(evidence(Judgment::Unknown));

        prop_assert_eq!(aggregate(&items).kind, VerdictKind::ConditionallyApproved);
    }
}
