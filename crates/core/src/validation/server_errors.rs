//! Server-side field errors.
//!
//! The rules API re-validates on create/update and answers with an error
//! body such as:
//!
//! ```json
//! {"error": {"message": "Validation failed",
//!            "details": {"compliance.deadline": "must be in the future"}}}
//! ```
//!
//! Detail keys are dotted paths into the rule document. They are mapped back
//! to local field keys so the editor can show server and client errors in the
//! same [`FieldErrors`] map.

use std::collections::BTreeMap;

use serde_json::Value;

use super::fields::{Field, FieldErrors};

/// Message used when the response carries no usable message.
pub const DEFAULT_SAVE_ERROR: &str = "Failed to save rule.";

/// A parsed API error response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerError {
    pub message: String,
    /// Dotted path → message, as sent by the server.
    pub details: BTreeMap<String, String>,
}

impl ServerError {
    /// Details re-keyed to local field names.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        merge_server_details(&mut errors, &self.details);
        errors
    }
}

/// Extract message and details from an API error body.
///
/// Accepts both `{"error": {"message", "details"}}` and the flat
/// `{"message", "details"}` shape. Non-string detail values are rendered as
/// JSON; arrays of strings are joined with `"; "`.
pub fn parse_server_error(body: &Value) -> ServerError {
    let nested = body.get("error").filter(|e| e.is_object());
    let scope = nested.unwrap_or(body);

    let message = scope
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_SAVE_ERROR)
        .to_string();

    let details = scope
        .get("details")
        .or_else(|| body.get("details"))
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(path, value)| (path.clone(), detail_message(value)))
                .collect()
        })
        .unwrap_or_default();

    ServerError { message, details }
}

fn detail_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Map a dotted server path to the local error-map key.
///
/// The last segment is the key, except `version` and `operator`, which are
/// qualified by their enclosing target section, and `target`, which is the
/// target pair as a whole.
///
/// # Examples
///
/// ```
/// use deptrack_core::validation::server_errors::field_key_for_path;
/// assert_eq!(field_key_for_path("compliance.deadline"), "deadline");
/// assert_eq!(
///     field_key_for_path("ruleDefinition.target.dependencyTarget.version"),
///     "dependencyVersion"
/// );
/// ```
pub fn field_key_for_path(path: &str) -> String {
    let mut segments = path.rsplit('.');
    let last = segments.next().unwrap_or(path);
    let parent = segments.next();

    let field = match (parent, last) {
        (Some("runtimeTarget"), "version") => Some(Field::RuntimeVersion),
        (Some("runtimeTarget"), "operator") => Some(Field::RuntimeOperator),
        (Some("dependencyTarget"), "version") => Some(Field::DependencyVersion),
        (Some("dependencyTarget"), "operator") => Some(Field::DependencyOperator),
        (_, "target" | "runtimeTarget" | "dependencyTarget") => Some(Field::Targets),
        _ => Field::from_key(last),
    };

    // Paths that name no local field keep their last segment as the key.
    field.map_or_else(|| last.to_string(), |f| f.as_str().to_string())
}

/// Merge server details into a local error map. Server messages win over
/// local ones for the same field.
pub fn merge_server_details(local: &mut FieldErrors, details: &BTreeMap<String, String>) {
    for (path, message) in details {
        local.set(field_key_for_path(path), message.clone());
    }
}
