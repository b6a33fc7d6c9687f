use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use gherkin_dict_core::{
    build_snapshot, search, CategoryFilter, SearchState, Snapshot, SnapshotDocument, SnapshotMetrics, SortMode,
};

use crate::adapter::{adapt_records, SourceKind};
use crate::config::DictConfig;
use crate::error::CliError;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Exported test cases or issues (JSON).
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long, value_enum, default_value_t = SourceKind::AgileTest)]
    pub source: SourceKind,
    /// Overrides `generate.output`.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Overrides `generate.limit`.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Overrides `generate.jira_field`.
    #[arg(long)]
    pub jira_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub records: usize,
    pub steps: usize,
}

pub fn run_generate(args: &GenerateArgs, config: &DictConfig) -> Result<GenerateReport, CliError> {
    let export = fs::read_to_string(&args.input).map_err(|source| CliError::ReadInput {
        path: args.input.clone(),
        source,
    })?;
    let limit = args.limit.unwrap_or(config.generate.limit);
    let jira_field = args
        .jira_field
        .as_deref()
        .unwrap_or(&config.generate.jira_field);
    let records =
        adapt_records(&export, args.source, jira_field, limit).map_err(|source| CliError::Adapt {
            path: args.input.clone(),
            source,
        })?;

    let snapshot = build_snapshot(&records);
    let document = SnapshotDocument::new(&snapshot, config.project.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.generate.output.clone());
    let json = document.to_json_pretty().map_err(|source| CliError::Snapshot {
        path: output.clone(),
        source,
    })?;
    write_output(&output, &json)?;

    tracing::info!(
        steps = document.total_steps,
        records = document.total_issues,
        output = %output.display(),
        "generated snapshot"
    );
    Ok(GenerateReport {
        output,
        records: document.total_issues,
        steps: document.total_steps,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CliError::WriteOutput {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let document = SnapshotDocument::from_json(&text).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(document.into_snapshot())
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub snapshot: PathBuf,
    /// `all`, `Given`, `When`, `Then`, `And` or `But`.
    #[arg(long, default_value = "all")]
    pub category: String,
    #[arg(long)]
    pub test_case: Option<String>,
    /// `relevance`, `frequency`, `alphabetic` or `reuse`.
    #[arg(long, default_value = "relevance")]
    pub sort: String,
    /// Maximum number of lines printed.
    #[arg(long, default_value_t = 20)]
    pub max: usize,
    /// Free text; wrap literal parameters in double quotes.
    pub query: Vec<String>,
}

/// Runs the search and renders one line per hit.
pub fn run_search(args: &SearchArgs) -> Result<Vec<String>, CliError> {
    let state = SearchState {
        query: args.query.join(" "),
        category: args.category.parse::<CategoryFilter>()?,
        test_case: args.test_case.clone(),
        sort: args.sort.parse::<SortMode>()?,
    };
    let snapshot = load_snapshot(&args.snapshot)?;
    let outcome = search(&snapshot, &state);

    if outcome.is_empty() {
        let message = match &state.test_case {
            Some(name) if !name.is_empty() => format!("No matches in test case: {name}"),
            _ => "No matches found.".to_string(),
        };
        return Ok(vec![message]);
    }

    let mut lines = Vec::with_capacity(outcome.hits.len().min(args.max) + 1);
    if let Some(top) = outcome.top_score() {
        lines.push(format!(
            "Found {} steps. Top match: {top}% similar.",
            outcome.hits.len()
        ));
    }
    for hit in outcome.hits.iter().take(args.max) {
        let score = hit.score.map(|s| format!("{s:>3}%")).unwrap_or_else(|| "   -".to_string());
        lines.push(format!(
            "{score}  {:>3}x {:>3}%  {}",
            hit.entry.count,
            hit.entry.reuse_percent(snapshot.total_records),
            hit.entry.step
        ));
    }
    Ok(lines)
}

pub fn run_stats(snapshot_path: &Path) -> Result<Vec<String>, CliError> {
    let snapshot = load_snapshot(snapshot_path)?;
    let metrics = SnapshotMetrics::from_snapshot(&snapshot);
    Ok(vec![
        format!(
            "{} unique steps from {} test cases",
            metrics.total_steps, metrics.total_records
        ),
        format!("average reuse: {}x", metrics.average_reuse),
        format!("high reuse steps: {}", metrics.high_reuse),
        format!("generated at: {}", snapshot.generated_at.to_rfc3339()),
    ])
}
