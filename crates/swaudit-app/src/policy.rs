//! Loading and initializing the policy document.

use anyhow::Context;
use camino::Utf8Path;
use swaudit_settings::{DocumentFormat, ResolvedConfig};
use tracing::info;

use crate::render::write_text;

#[derive(Clone, Debug)]
pub struct PolicyLoad {
    pub resolved: ResolvedConfig,
    /// The file did not exist and the default document was written to it.
    pub created: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Overwritten,
    /// A document already exists and `force` was not given.
    Kept,
}

/// Load and resolve the policy at `path`.
///
/// A missing file is not an error: the default document is materialized there and used.
pub fn load_policy(path: &Utf8Path) -> anyhow::Result<PolicyLoad> {
    let format = DocumentFormat::from_path(path.as_str());

    if !path.exists() {
        write_default(path, format)?;
        info!(%path, "policy file not found; wrote defaults");
        let resolved = swaudit_settings::resolve_policy(swaudit_settings::default_document())
            .context("resolve default policy")?;
        return Ok(PolicyLoad {
            resolved,
            created: true,
        });
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("read policy: {path}"))?;
    let doc = swaudit_settings::parse_policy(&text, format)
        .with_context(|| format!("parse policy: {path}"))?;
    let resolved = swaudit_settings::resolve_policy(doc)
        .with_context(|| format!("resolve policy: {path}"))?;
    info!(%path, digest = %resolved.digest, "policy loaded");

    Ok(PolicyLoad {
        resolved,
        created: false,
    })
}

/// Write the default document to `path` unless one exists (or `force` is set).
pub fn init_policy(path: &Utf8Path, force: bool) -> anyhow::Result<InitOutcome> {
    let existed = path.exists();
    if existed && !force {
        return Ok(InitOutcome::Kept);
    }
    write_default(path, DocumentFormat::from_path(path.as_str()))?;
    Ok(if existed {
        InitOutcome::Overwritten
    } else {
        InitOutcome::Created
    })
}

fn write_default(path: &Utf8Path, format: DocumentFormat) -> anyhow::Result<()> {
    let text = swaudit_settings::render_document(&swaudit_settings::default_document(), format)
        .context("render default policy")?;
    write_text(path, &text).with_context(|| format!("write default policy: {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn missing_policy_is_materialized_then_reloaded() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8_root(&tmp).join("config/audit_rules.json");

        let first = load_policy(&path).expect("load");
        assert!(first.created);
        assert!(path.exists());

        let second = load_policy(&path).expect("reload");
        assert!(!second.created);
        assert_eq!(first.resolved.digest, second.resolved.digest);
    }

    #[test]
    fn invalid_policy_error_names_the_file() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8_root(&tmp).join("rules.json");
        std::fs::write(&path, r#"{"evidence": {"max_citations": 9}}"#).expect("write");

        let err = load_policy(&path).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("resolve policy"), "{text}");
        assert!(text.contains("evidence.max_citations"), "{text}");
    }

    #[test]
    fn init_keeps_existing_document_unless_forced() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8_root(&tmp).join("policy.toml");

        assert_eq!(init_policy(&path, false).expect("init"), InitOutcome::Created);
        std::fs::write(&path, "# edited\n").expect("write");
        assert_eq!(init_policy(&path, false).expect("init"), InitOutcome::Kept);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "# edited\n");
        assert_eq!(init_policy(&path, true).expect("init"), InitOutcome::Overwritten);

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("[auto_approve]"), "{text}");
    }
}
