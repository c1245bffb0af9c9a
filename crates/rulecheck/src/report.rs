//! Per-file validation reports and their text / JSON rendering.

use std::fmt::Write as _;

use deptrack_core::dependency_filter::{Dependency, FilterSummary};
use deptrack_core::validation::FieldErrors;
use serde::Serialize;

use crate::config::OutputFormat;

/// Outcome of checking one rule draft file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Outcome {
    /// The draft validates. `target` is the rendered target, when one is set.
    Valid { target: Option<String> },
    /// The draft has field problems, possibly including server-side ones.
    Invalid {
        errors: FieldErrors,
        #[serde(skip_serializing_if = "Option::is_none")]
        server_message: Option<String>,
    },
    /// The server refused the draft without naming a field, and the draft
    /// has no local problems either.
    Rejected { server_message: String },
    /// The file could not be read or parsed.
    Unreadable { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, Outcome::Valid { .. })
    }
}

/// Result of the `filter` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    pub summary: FilterSummary,
    pub matches: Vec<Dependency>,
}

pub fn render_reports(reports: &[FileReport], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)? + "\n"),
        OutputFormat::Text => Ok(reports.iter().map(render_report_text).collect()),
    }
}

fn render_report_text(report: &FileReport) -> String {
    let mut out = String::new();
    match &report.outcome {
        Outcome::Valid { target: Some(target) } => {
            let _ = writeln!(out, "{}: ok ({target})", report.path);
        }
        Outcome::Valid { target: None } => {
            let _ = writeln!(out, "{}: ok (no target yet)", report.path);
        }
        Outcome::Invalid {
            errors,
            server_message,
        } => {
            let _ = writeln!(out, "{}: {} problem(s)", report.path, errors.len());
            if let Some(message) = server_message {
                let _ = writeln!(out, "  server: {message}");
            }
            for (field, message) in errors.iter() {
                let _ = writeln!(out, "  {field}: {message}");
            }
        }
        Outcome::Rejected { server_message } => {
            let _ = writeln!(out, "{}: rejected by server: {server_message}", report.path);
        }
        Outcome::Unreadable { error } => {
            let _ = writeln!(out, "{}: unreadable: {error}", report.path);
        }
    }
    out
}

pub fn render_filter(report: &FilterReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Text => {
            let mut out = format!("Dependencies ({})\n", report.summary);
            for dep in &report.matches {
                let _ = writeln!(out, "  {} {} {}", dep.artefact, dep.version, dep.kind);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deptrack_core::validation::Field;

    fn invalid_report() -> FileReport {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Name, "Name is required");
        FileReport {
            path: "rules/jdk.json".to_string(),
            outcome: Outcome::Invalid {
                errors,
                server_message: Some("Rule rejected".to_string()),
            },
        }
    }

    #[test]
    fn text_lists_each_problem() {
        let text = render_reports(&[invalid_report()], OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "rules/jdk.json: 1 problem(s)\n  server: Rule rejected\n  name: Name is required\n"
        );
    }

    #[test]
    fn json_flattens_outcome_into_report() {
        let json = render_reports(&[invalid_report()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["path"], "rules/jdk.json");
        assert_eq!(value[0]["outcome"], "invalid");
        assert_eq!(value[0]["errors"]["name"], "Name is required");
    }

    #[test]
    fn valid_report_shows_target() {
        let report = FileReport {
            path: "a.json".to_string(),
            outcome: Outcome::Valid {
                target: Some("JDK >= 17".to_string()),
            },
        };
        assert!(report.is_valid());
        assert_eq!(
            render_reports(&[report], OutputFormat::Text).unwrap(),
            "a.json: ok (JDK >= 17)\n"
        );
    }

    #[test]
    fn rejection_without_fields_prints_only_server_message() {
        let report = FileReport {
            path: "rules/node.json".to_string(),
            outcome: Outcome::Rejected {
                server_message: "Failed to save rule.".to_string(),
            },
        };
        assert!(!report.is_valid());
        assert_eq!(
            render_reports(std::slice::from_ref(&report), OutputFormat::Text).unwrap(),
            "rules/node.json: rejected by server: Failed to save rule.\n"
        );

        let json = render_reports(&[report], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["outcome"], "rejected");
        assert_eq!(value[0]["server_message"], "Failed to save rule.");
    }
}
