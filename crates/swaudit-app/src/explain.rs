//! The `explain` use case: look up rule, flag and check documentation.

use swaudit_types::explain::{self, Explanation};

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; lists everything that can be explained.
    NotFound {
        identifier: String,
        rule_ids: &'static [&'static str],
        flag_codes: &'static [&'static str],
        check_ids: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier.trim()) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            rule_ids: explain::all_rule_ids(),
            flag_codes: explain::all_flag_codes(),
            check_ids: explain::all_check_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.chars().count()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Example\n");
    out.push_str("-------\n\n");
    out.push_str("```json\n");
    out.push_str(exp.example);
    out.push('\n');
    out.push_str("```\n");

    out
}

pub fn format_not_found(
    identifier: &str,
    rule_ids: &[&str],
    flag_codes: &[&str],
    check_ids: &[&str],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule id, flag code or check id: {identifier}\n"));
    for (heading, items) in [
        ("Rule ids", rule_ids),
        ("Flag codes", flag_codes),
        ("Check ids", check_ids),
    ] {
        out.push_str(&format!("\n{heading}:\n"));
        for item in items {
            out.push_str(&format!("  - {item}\n"));
        }
    }

    out
}
