//! Submission intake: discover input files and turn CSV/JSON rows into typed submissions.
//!
//! This crate is allowed to do filesystem IO. Parsing itself is exposed as string-in functions so
//! it can be exercised without files.

#![forbid(unsafe_code)]

mod discover;
mod error;
mod parse;

use camino::Utf8Path;
use swaudit_types::Submission;

pub use discover::discover_inputs;
pub use error::IntakeError;
pub use parse::{parse_csv, parse_json};

/// Header names of the submission fields in input files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: String,
    pub applicant: String,
    pub subject: String,
    pub vendor: String,
    pub license: String,
    pub cost: String,
    pub purpose: String,
    pub remarks: String,
    pub department: String,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("csv") => Some(Self::Csv),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Read one input file into submissions, in file order.
pub fn read_submissions(path: &Utf8Path, columns: &ColumnMap) -> Result<Vec<Submission>, IntakeError> {
    let format =
        InputFormat::from_path(path).ok_or_else(|| IntakeError::UnsupportedFormat(path.to_string()))?;
    let text = std::fs::read_to_string(path).map_err(|e| IntakeError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    match format {
        InputFormat::Csv => parse_csv(&text, columns, path.as_str()),
        InputFormat::Json => parse_json(&text, columns, path.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn columns() -> ColumnMap {
        ColumnMap {
            id: "申請ID".into(),
            applicant: "申請者".into(),
            subject: "ソフトウェア名".into(),
            vendor: "ベンダー".into(),
            license: "ライセンス形態".into(),
            cost: "コスト".into(),
            purpose: "利用目的".into(),
            remarks: "備考".into(),
            department: "部署".into(),
            url: "参考URL".into(),
        }
    }

    #[test]
    fn reads_workflow_export() {
        let tmp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("export.csv")).expect("utf8 path");
        std::fs::write(
            &path,
            "申請ID,申請者,ソフトウェア名,ベンダー,ライセンス形態,コスト,利用目的,備考,部署\n\
             A-001,山田,Microsoft Teams,Microsoft,無料,0円,会議,,総務部\n",
        )
        .expect("write");

        let rows = read_submissions(&path, &columns()).expect("read");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_deref(), Some("A-001"));
        assert_eq!(rows[0].cost.as_deref(), Some("0円"));
        assert_eq!(rows[0].remarks, None);
        assert_eq!(rows[0].url, None);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_submissions(Utf8Path::new("input.xlsx"), &columns()).unwrap_err();
        assert_eq!(err, IntakeError::UnsupportedFormat("input.xlsx".to_string()));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let err = read_submissions(Utf8Path::new("does/not/exist.csv"), &columns()).unwrap_err();
        assert!(matches!(err, IntakeError::Io { .. }));
    }
}
