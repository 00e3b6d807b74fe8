//! The `review` use case: read submission files, evaluate them, and build the batch report.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use swaudit_settings::ResolvedConfig;
use swaudit_types::{
    DecisionCounts, ReviewRecord, ReviewReport, SCHEMA_REVIEW_REPORT_V1, SkippedInput, Submission,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Input for the review use case.
#[derive(Clone, Debug)]
pub struct ReviewInput {
    /// Files or directories to read.
    pub inputs: Vec<Utf8PathBuf>,
    /// Successfully read files are moved here after evaluation.
    pub archive_dir: Option<Utf8PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ReviewOutput {
    pub report: ReviewReport,
    /// Where each archived input ended up.
    pub archived: Vec<Utf8PathBuf>,
}

/// Submissions read from the discovered input files.
pub(crate) struct IntakeBatch {
    /// `(source file, submission)` in input order.
    pub rows: Vec<(String, Submission)>,
    pub skipped: Vec<SkippedInput>,
    /// Files that were read successfully.
    pub read_ok: Vec<Utf8PathBuf>,
}

/// Discover and read every input. Unreadable files are recorded as skipped, not fatal.
pub(crate) fn read_inputs(
    inputs: &[Utf8PathBuf],
    config: &ResolvedConfig,
) -> anyhow::Result<IntakeBatch> {
    let files = swaudit_intake::discover_inputs(inputs, &config.intake.skip_files)
        .context("discover input files")?;
    debug!(files = files.len(), "inputs discovered");

    let mut batch = IntakeBatch {
        rows: Vec::new(),
        skipped: Vec::new(),
        read_ok: Vec::new(),
    };
    for file in files {
        match swaudit_intake::read_submissions(&file, &config.intake.columns) {
            Ok(submissions) => {
                debug!(%file, rows = submissions.len(), "input read");
                batch
                    .rows
                    .extend(submissions.into_iter().map(|s| (file.to_string(), s)));
                batch.read_ok.push(file);
            }
            Err(err) => {
                warn!(%file, error = %err, "skipping unreadable input");
                batch.skipped.push(SkippedInput {
                    source: file.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(batch)
}

pub fn run_review(input: &ReviewInput, config: &ResolvedConfig) -> anyhow::Result<ReviewOutput> {
    let started_at = OffsetDateTime::now_utc();
    let IntakeBatch {
        rows,
        skipped,
        read_ok,
    } = read_inputs(&input.inputs, config)?;

    // Policy is shared read-only; collecting an indexed parallel iterator keeps input order.
    let policy = &config.policy;
    let records: Vec<ReviewRecord> = rows
        .into_par_iter()
        .map(|(source, submission)| {
            let decision = swaudit_domain::evaluate(&submission, policy);
            ReviewRecord {
                source: Some(source),
                submission,
                decision,
            }
        })
        .collect();

    let counts = DecisionCounts::from_decisions(records.iter().map(|r| &r.decision));
    info!(
        total = counts.total(),
        approved = counts.approved,
        rejected = counts.rejected,
        manual_review = counts.manual_review,
        skipped = skipped.len(),
        "review finished"
    );

    let archived = match &input.archive_dir {
        Some(dir) => archive_inputs(&read_ok, dir, started_at)?,
        None => Vec::new(),
    };

    let report = ReviewReport {
        schema: SCHEMA_REVIEW_REPORT_V1.to_string(),
        tool: crate::tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        policy_digest: config.digest.clone(),
        counts,
        records,
        skipped,
    };

    Ok(ReviewOutput { report, archived })
}

fn archive_inputs(
    files: &[Utf8PathBuf],
    dir: &Utf8Path,
    started_at: OffsetDateTime,
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("create archive directory: {dir}"))?;

    let mut out = Vec::with_capacity(files.len());
    for file in files {
        let name = file.file_name().unwrap_or("input");
        let mut dest = dir.join(name);
        if dest.exists() {
            dest = dir.join(format!("{}_{}", started_at.unix_timestamp(), name));
        }
        move_file(file, &dest).with_context(|| format!("archive {file} to {dest}"))?;
        debug!(%file, %dest, "input archived");
        out.push(dest);
    }
    Ok(out)
}

fn move_file(from: &Utf8Path, to: &Utf8Path) -> std::io::Result<()> {
    // Rename fails across filesystems; fall back to copy and remove.
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)
}
