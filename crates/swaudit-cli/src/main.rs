//! CLI entry point for swaudit.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `swaudit-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use swaudit_app::{
    AuditBatchEntry, AuditBatchInput, AuditInput, ExplainOutput, HttpSources, InitOutcome,
    ReportVariant, ReviewInput, audit_batch_exit_code, audit_exit_code, derive_category,
    init_policy, load_policy, parse_report_json, render_markdown, run_audit, run_audit_batch,
    run_explain, run_review, write_report, write_text,
};
use swaudit_types::CostCategory;
use time::OffsetDateTime;

#[derive(Parser, Debug)]
#[command(
    name = "swaudit",
    version,
    about = "Policy review and evidence audits for software approval requests"
)]
struct Cli {
    /// Policy document (JSON, or TOML by extension). Written with defaults when missing.
    #[arg(long, global = true, default_value = "config/audit_rules.json")]
    policy: Utf8PathBuf,

    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate submission files against the policy.
    Review {
        /// Input files or directories (.csv / .json).
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/swaudit/review.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/swaudit/review.md")]
        markdown_out: Utf8PathBuf,

        /// Move successfully read input files here afterwards.
        #[arg(long)]
        archive_dir: Option<Utf8PathBuf>,
    },

    /// Gather external evidence for one piece of software, or for every submission in --input.
    Audit {
        /// Software name to investigate.
        #[arg(long, required_unless_present = "input")]
        subject: Option<String>,

        /// Submission files or directories; each row is audited using its software name,
        /// license, cost and reference URL.
        #[arg(
            long,
            num_args = 1..,
            conflicts_with_all = ["subject", "license", "cost", "repository"]
        )]
        input: Vec<Utf8PathBuf>,

        /// Cost category; selects the vulnerability threshold. Derived from --license and
        /// --cost when omitted.
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// License label as written on the request (e.g. "有償").
        #[arg(long)]
        license: Option<String>,

        /// Cost as written on the request (e.g. "5,000円/年").
        #[arg(long)]
        cost: Option<String>,

        /// Source repository (GitHub URL or owner/repo) for the activity check.
        #[arg(long)]
        repository: Option<String>,

        /// Skip the web-search checks (incident reports, reputation).
        #[arg(long)]
        skip_search: bool,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/swaudit/audit.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/swaudit/audit.md")]
        markdown_out: Utf8PathBuf,

        /// Directory for the per-submission reports written with --input.
        #[arg(long, default_value = "artifacts/swaudit/audits")]
        out_dir: Utf8PathBuf,
    },

    /// Write the default policy document to the --policy path.
    InitPolicy {
        /// Overwrite an existing document.
        #[arg(long)]
        force: bool,
    },

    /// Explain a rule id, flag code or evidence check id.
    Explain {
        /// e.g. "review.high_cost", "cost-unknown", "evidence.vulnerability_db".
        identifier: String,
    },

    /// Render Markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Print the JSON schema of the policy document.
    Schema,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryArg {
    Paid,
    Free,
}

impl From<CategoryArg> for CostCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Paid => CostCategory::Paid,
            CategoryArg::Free => CostCategory::Free,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(policy = %cli.policy, command = ?cli.cmd, "starting");

    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("swaudit error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Commands::Review {
            input,
            report_out,
            write_markdown,
            markdown_out,
            archive_dir,
        } => {
            let markdown = write_markdown.then_some(markdown_out);
            cmd_review(&cli.policy, input, archive_dir, &report_out, markdown.as_deref())
        }
        Commands::Audit {
            subject,
            input,
            category,
            license,
            cost,
            repository,
            skip_search,
            report_out,
            write_markdown,
            markdown_out,
            out_dir,
        } => {
            if !input.is_empty() {
                let batch = AuditBatchInput {
                    inputs: input,
                    category: category.map(Into::into),
                    skip_search,
                };
                return cmd_audit_batch(&cli.policy, &batch, &out_dir, write_markdown);
            }
            let subject = subject.context("--subject or --input is required")?;
            let request = AuditRequest {
                subject,
                category,
                license,
                cost,
                repository,
                skip_search,
            };
            let markdown = write_markdown.then_some(markdown_out);
            cmd_audit(&cli.policy, request, &report_out, markdown.as_deref())
        }
        Commands::InitPolicy { force } => cmd_init_policy(&cli.policy, force),
        Commands::Explain { identifier } => Ok(cmd_explain(&identifier)),
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()),
        Commands::Schema => cmd_schema(),
    }
}

fn cmd_review(
    policy: &Utf8Path,
    inputs: Vec<Utf8PathBuf>,
    archive_dir: Option<Utf8PathBuf>,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let loaded = load_policy(policy)?;
    let input = ReviewInput {
        inputs,
        archive_dir,
    };
    let output = run_review(&input, &loaded.resolved)?;

    let counts = output.report.counts.clone();
    let skipped = output.report.skipped.len();
    let report = ReportVariant::Review(output.report);
    emit(&report, report_out, markdown_out)?;

    println!(
        "swaudit: {} submissions (approved {}, rejected {}, manual review {}); {} inputs skipped",
        counts.total(),
        counts.approved,
        counts.rejected,
        counts.manual_review,
        skipped
    );
    for path in &output.archived {
        println!("archived: {path}");
    }
    Ok(0)
}

struct AuditRequest {
    subject: String,
    category: Option<CategoryArg>,
    license: Option<String>,
    cost: Option<String>,
    repository: Option<String>,
    skip_search: bool,
}

fn cmd_audit(
    policy: &Utf8Path,
    request: AuditRequest,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let loaded = load_policy(policy)?;
    let category = match request.category {
        Some(category) => category.into(),
        None => derive_category(
            request.license.as_deref(),
            request.cost.as_deref(),
            &loaded.resolved,
        ),
    };
    let input = AuditInput {
        subject: request.subject,
        category,
        repository: request.repository,
        skip_search: request.skip_search,
    };

    let sources = HttpSources::from_settings(&loaded.resolved.sources, OffsetDateTime::now_utc())?;
    let report = run_audit(&input, sources.as_sources(), &loaded.resolved)?;

    let code = audit_exit_code(&report);
    println!("swaudit: {}: {}", report.subject, report.verdict.reason);
    emit(&ReportVariant::Audit(report), report_out, markdown_out)?;
    Ok(code)
}

fn cmd_audit_batch(
    policy: &Utf8Path,
    input: &AuditBatchInput,
    out_dir: &Utf8Path,
    write_markdown: bool,
) -> anyhow::Result<i32> {
    let loaded = load_policy(policy)?;
    let sources = HttpSources::from_settings(&loaded.resolved.sources, OffsetDateTime::now_utc())?;
    let output = run_audit_batch(input, sources.as_sources(), &loaded.resolved)?;

    let code = audit_batch_exit_code(&output);
    let mut used = BTreeSet::new();
    for (index, entry) in output.entries.iter().enumerate() {
        let mut stem = report_stem(index, entry);
        if !used.insert(stem.clone()) {
            stem = format!("{stem}-{}", index + 1);
            used.insert(stem.clone());
        }
        println!(
            "swaudit: {}: {}",
            entry.report.subject, entry.report.verdict.reason
        );
        let markdown = write_markdown.then(|| out_dir.join(format!("{stem}.md")));
        emit(
            &ReportVariant::Audit(entry.report.clone()),
            &out_dir.join(format!("{stem}.json")),
            markdown.as_deref(),
        )?;
    }
    println!(
        "swaudit: {} submissions audited; {} inputs skipped; {} rows without a software name",
        output.entries.len(),
        output.skipped.len(),
        output.without_subject
    );
    Ok(code)
}

/// File stem for a batch report: the application id when it is usable, else the row position.
fn report_stem(index: usize, entry: &AuditBatchEntry) -> String {
    let id: String = entry
        .id
        .as_deref()
        .unwrap_or("")
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if id.is_empty() {
        format!("row-{:03}", index + 1)
    } else {
        id
    }
}

fn emit(
    report: &ReportVariant,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    write_report(report_out, report).context("write report json")?;
    if let Some(path) = markdown_out {
        write_text(path, &render_markdown(report)).context("write markdown")?;
    }
    Ok(())
}

fn cmd_init_policy(policy: &Utf8Path, force: bool) -> anyhow::Result<i32> {
    match init_policy(policy, force)? {
        InitOutcome::Created => println!("wrote default policy to {policy}"),
        InitOutcome::Overwritten => println!("overwrote {policy} with the default policy"),
        InitOutcome::Kept => println!("{policy} already exists; use --force to overwrite"),
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", swaudit_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            rule_ids,
            flag_codes,
            check_ids,
        } => {
            eprint!(
                "{}",
                swaudit_app::format_not_found(&identifier, rule_ids, flag_codes, check_ids)
            );
            1
        }
    }
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    match output {
        Some(out_path) => write_text(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(0)
}

fn cmd_schema() -> anyhow::Result<i32> {
    let schema = swaudit_settings::policy_schema();
    let text = serde_json::to_string_pretty(&schema).context("serialize policy schema")?;
    println!("{text}");
    Ok(0)
}
