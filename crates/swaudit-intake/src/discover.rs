use crate::{InputFormat, IntakeError};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Expand input paths into the list of submission files to read.
///
/// Files named explicitly are kept as given. Directories are walked and contribute every
/// `.csv`/`.json` file whose name is not in `skip_files`, sorted by path. Duplicates are dropped.
pub fn discover_inputs(
    inputs: &[Utf8PathBuf],
    skip_files: &[String],
) -> Result<Vec<Utf8PathBuf>, IntakeError> {
    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for input in inputs {
        if input.is_file() {
            push_unique(&mut out, input.clone());
            continue;
        }
        if !input.is_dir() {
            return Err(IntakeError::NotFound(input.to_string()));
        }

        let mut found: Vec<Utf8PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
            .filter(|p| InputFormat::from_path(p).is_some())
            .filter(|p| !is_skipped(p, skip_files))
            .collect();
        found.sort();
        for path in found {
            push_unique(&mut out, path);
        }
    }
    Ok(out)
}

fn is_skipped(path: &Utf8Path, skip_files: &[String]) -> bool {
    path.file_name()
        .is_some_and(|name| skip_files.iter().any(|s| s == name))
}

fn push_unique(out: &mut Vec<Utf8PathBuf>, path: Utf8PathBuf) {
    if !out.contains(&path) {
        out.push(path);
    }
}
