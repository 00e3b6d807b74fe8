use crate::model::Facts;
use crate::policy::Policy;
use crate::rules::{RULES, Step};
use swaudit_types::{Decision, DecisionKind, Submission, ids};

pub const BASELINE_REASON: &str = "meets baseline criteria";

/// Evaluate one submission against the policy.
///
/// Rules run in a fixed order and the first deciding rule wins. Flags raised before the
/// decision (malformed facts, low cost) are kept on the result.
pub fn evaluate(submission: &Submission, policy: &Policy) -> Decision {
    let mut flags = Vec::new();
    let facts = Facts::collect(submission, &mut flags);

    for rule in RULES {
        match (rule.apply)(&facts, policy) {
            Step::Decide(outcome) => {
                return Decision {
                    kind: outcome.kind,
                    rule_id: rule.id.to_string(),
                    reason: outcome.reason,
                    flags,
                };
            }
            Step::Flag(flag) => flags.push(flag),
            Step::Continue => {}
        }
    }

    Decision {
        kind: DecisionKind::Approved,
        rule_id: ids::RULE_DEFAULT_BASELINE.to_string(),
        reason: BASELINE_REASON.to_string(),
        flags,
    }
}

/// Evaluate a batch in input order.
pub fn evaluate_all<'a>(
    submissions: impl IntoIterator<Item = &'a Submission>,
    policy: &Policy,
) -> Vec<Decision> {
    submissions
        .into_iter()
        .map(|s| evaluate(s, policy))
        .collect()
}
