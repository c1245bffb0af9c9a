//! Subcommand implementations. Each returns a report; printing and exit
//! codes are left to `main`.

use std::fs;
use std::path::Path;

use anyhow::Context;
use deptrack_core::dependency_filter::{filter_dependencies, parse_dependencies, FilterSummary};
use deptrack_core::rule::RuleDraft;
use deptrack_core::validation::{merge_server_details, parse_server_error, validate_with};

use crate::config::RuleCheckConfig;
use crate::report::{FileReport, FilterReport, Outcome};

/// Validate one draft file. Read and parse failures become an
/// [`Outcome::Unreadable`] report rather than an error, so one bad file does
/// not stop a batch.
pub fn validate_file(path: &Path, config: &RuleCheckConfig) -> FileReport {
    let outcome = match load_draft(path) {
        Ok(draft) => check_draft(&draft, config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable draft");
            Outcome::Unreadable {
                error: format!("{err:#}"),
            }
        }
    };
    FileReport {
        path: path.display().to_string(),
        outcome,
    }
}

/// Validate every file in order.
pub fn run_validate(paths: &[impl AsRef<Path>], config: &RuleCheckConfig) -> Vec<FileReport> {
    let reports: Vec<FileReport> = paths
        .iter()
        .map(|p| validate_file(p.as_ref(), config))
        .collect();

    let invalid = reports.iter().filter(|r| !r.is_valid()).count();
    tracing::info!(files = reports.len(), invalid, "Validation complete");
    reports
}

/// Validate a draft and fold a saved API error response into its report.
///
/// The server's field details are merged over the local errors; its
/// top-level message is attached to the report. A saved error response always
/// makes the report a failure: when neither side names a field, the outcome
/// is [`Outcome::Rejected`] with just the server message.
pub fn run_merge(
    draft_path: &Path,
    response_path: &Path,
    config: &RuleCheckConfig,
) -> anyhow::Result<FileReport> {
    let draft = load_draft(draft_path)?;
    let raw = fs::read_to_string(response_path)
        .with_context(|| format!("Failed to read {}", response_path.display()))?;
    let body: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", response_path.display()))?;

    let server = parse_server_error(&body);
    tracing::debug!(
        message = %server.message,
        details = server.details.len(),
        "Parsed server error response"
    );

    let mut errors = match validate_with(&draft, &config.validator) {
        Ok(()) => Default::default(),
        Err(errors) => errors,
    };
    merge_server_details(&mut errors, &server.details);

    let outcome = if errors.is_empty() {
        Outcome::Rejected {
            server_message: server.message,
        }
    } else {
        Outcome::Invalid {
            errors,
            server_message: Some(server.message),
        }
    };

    Ok(FileReport {
        path: draft_path.display().to_string(),
        outcome,
    })
}

/// Filter a JSON dependency list by a fuzzy query.
pub fn run_filter(path: &Path, query: &str) -> anyhow::Result<FilterReport> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let dependencies = parse_dependencies(&raw)
        .with_context(|| format!("Invalid dependency list in {}", path.display()))?;

    let matches: Vec<_> = filter_dependencies(&dependencies, query)
        .into_iter()
        .cloned()
        .collect();
    let summary = FilterSummary::new(matches.len(), dependencies.len());
    tracing::debug!(query, %summary, "Filtered dependencies");

    Ok(FilterReport { summary, matches })
}

fn load_draft(path: &Path) -> anyhow::Result<RuleDraft> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    RuleDraft::from_json(&raw).with_context(|| format!("Invalid rule draft in {}", path.display()))
}

fn check_draft(draft: &RuleDraft, config: &RuleCheckConfig) -> Outcome {
    match validate_with(draft, &config.validator) {
        Ok(()) => Outcome::Valid {
            // Under the deferred policy a valid draft may still lack a target.
            target: draft
                .finalize()
                .ok()
                .map(|rule| rule.rule_definition.target.to_string()),
        },
        Err(errors) => Outcome::Invalid {
            errors,
            server_message: None,
        },
    }
}
