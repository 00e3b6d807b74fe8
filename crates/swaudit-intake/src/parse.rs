use crate::{ColumnMap, IntakeError};
use serde_json::Value;
use swaudit_types::Submission;

/// Field slots in `Submission` order, paired with the english key accepted in JSON input.
const FIELDS: [&str; 10] = [
    "id",
    "applicant",
    "subject",
    "vendor",
    "license",
    "cost",
    "purpose",
    "remarks",
    "department",
    "url",
];

fn column_names(columns: &ColumnMap) -> [&str; 10] {
    [
        columns.id.as_str(),
        columns.applicant.as_str(),
        columns.subject.as_str(),
        columns.vendor.as_str(),
        columns.license.as_str(),
        columns.cost.as_str(),
        columns.purpose.as_str(),
        columns.remarks.as_str(),
        columns.department.as_str(),
        columns.url.as_str(),
    ]
}

fn build(values: [Option<String>; 10]) -> Submission {
    let [id, applicant, subject, vendor, license, cost, purpose, remarks, department, url] = values;
    Submission {
        id,
        applicant,
        subject,
        vendor,
        license,
        cost,
        purpose,
        remarks,
        department,
        url,
    }
}

fn cell(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Parse CSV text with a header row. Rows whose mapped cells are all empty are dropped.
pub fn parse_csv(
    text: &str,
    columns: &ColumnMap,
    source: &str,
) -> Result<Vec<Submission>, IntakeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let csv_err = |e: csv::Error| IntakeError::Csv {
        path: source.to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let positions = column_names(columns).map(|name| headers.iter().position(|h| h == name));
    if positions.iter().all(Option::is_none) {
        return Err(IntakeError::NoKnownColumns {
            path: source.to_string(),
        });
    }

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let values = positions.map(|pos| pos.and_then(|i| record.get(i)).and_then(cell));
        if values.iter().all(Option::is_none) {
            continue;
        }
        out.push(build(values));
    }
    Ok(out)
}

/// Parse a JSON array of objects. Keys may be the configured column names or the english field
/// names; strings and numbers are accepted as values.
pub fn parse_json(
    text: &str,
    columns: &ColumnMap,
    source: &str,
) -> Result<Vec<Submission>, IntakeError> {
    let json_err = |message: String| IntakeError::Json {
        path: source.to_string(),
        message,
    };

    let value: Value = serde_json::from_str(text).map_err(|e| json_err(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(json_err("expected an array of submission objects".to_string()));
    };

    let names = column_names(columns);
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(json_err(format!("item {index} is not an object")));
        };
        let mut values: [Option<String>; 10] = Default::default();
        for (slot, (column, field)) in values.iter_mut().zip(names.iter().zip(FIELDS)) {
            let raw = map.get(*column).or_else(|| map.get(field));
            *slot = match raw {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => cell(s),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                Some(_) => {
                    return Err(json_err(format!(
                        "item {index}: field {field} must be a string or number"
                    )));
                }
            };
        }
        out.push(build(values));
    }
    Ok(out)
}
