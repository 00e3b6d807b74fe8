use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One software approval request, as produced by the intake layer.
///
/// Every fact is optional: a missing column or an empty cell is `None`, never an empty string.
/// The record is never mutated after intake; evaluation reads it by reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Submission {
    /// Application identifier assigned by the workflow system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,
    /// Software name; the subject of every evidence query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// License-type label, e.g. `無料` or `有償`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Cost as typed by the applicant (`5,000円/年`). Normalized during evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Reference URL; a GitHub URL doubles as the repository for activity checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Submission {
    pub fn subject(&self) -> &str {
        field(&self.subject)
    }

    pub fn vendor(&self) -> &str {
        field(&self.vendor)
    }

    pub fn license(&self) -> &str {
        field(&self.license)
    }

    pub fn purpose(&self) -> &str {
        field(&self.purpose)
    }

    pub fn remarks(&self) -> &str {
        field(&self.remarks)
    }

    pub fn department(&self) -> &str {
        field(&self.department)
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}
