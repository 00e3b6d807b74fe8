//! Shared test utilities for the swaudit workspace.

use serde_json::Value;

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Root-only, and only when the root looks like a report (`schema`, `tool`, `policy_digest`):
/// - `tool.version` becomes `"__VERSION__"`
/// - `policy_digest` becomes `"__DIGEST__"`
///
/// Recursive:
/// - `started_at` / `finished_at` become `"__TIMESTAMP__"`
/// - `source` strings are reduced to their file name, so absolute fixture paths compare equal
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_report = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("policy_digest");
        if is_report {
            if let Some(tool_obj) = obj.get_mut("tool").and_then(Value::as_object_mut)
                && tool_obj.contains_key("version")
            {
                tool_obj.insert(
                    "version".to_string(),
                    Value::String("__VERSION__".to_string()),
                );
            }
            obj.insert(
                "policy_digest".to_string(),
                Value::String("__DIGEST__".to_string()),
            );
        }
    }
    normalize_recursive(&mut value);
    value
}

fn normalize_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            if let Some(Value::String(source)) = map.get_mut("source") {
                let name = source
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or_default()
                    .to_string();
                *source = name;
            }
            for val in map.values_mut() {
                normalize_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_recursive(val);
            }
        }
        _ => {}
    }
}
