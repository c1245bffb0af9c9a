//! Field keys and the field-error map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A form field that can carry a validation message.
///
/// Keys match the editor's field names, so server-side errors can be merged
/// into the same map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Description,
    Status,
    Language,
    Deadline,
    Severity,
    RuntimeType,
    RuntimeVersion,
    RuntimeOperator,
    Artefact,
    DependencyVersion,
    DependencyOperator,
    /// The target pair as a whole (exclusivity and presence).
    Targets,
}

impl Field {
    /// All fields, in the order the validator evaluates them.
    pub const ALL: [Field; 13] = [
        Field::Name,
        Field::Description,
        Field::Status,
        Field::Language,
        Field::Deadline,
        Field::Severity,
        Field::RuntimeType,
        Field::RuntimeVersion,
        Field::RuntimeOperator,
        Field::Artefact,
        Field::DependencyVersion,
        Field::DependencyOperator,
        Field::Targets,
    ];

    /// Key used in the error map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Status => "status",
            Self::Language => "language",
            Self::Deadline => "deadline",
            Self::Severity => "severity",
            Self::RuntimeType => "runtimeType",
            Self::RuntimeVersion => "runtimeVersion",
            Self::RuntimeOperator => "runtimeOperator",
            Self::Artefact => "artefact",
            Self::DependencyVersion => "dependencyVersion",
            Self::DependencyOperator => "dependencyOperator",
            Self::Targets => "targets",
        }
    }

    /// Human-readable label, used in "X is required" messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Status => "Status",
            Self::Language => "Language",
            Self::Deadline => "Deadline",
            Self::Severity => "Severity",
            Self::RuntimeType => "Runtime type",
            Self::RuntimeVersion | Self::DependencyVersion => "Version",
            Self::RuntimeOperator | Self::DependencyOperator => "Operator",
            Self::Artefact => "Artefact",
            Self::Targets => "Target",
        }
    }

    /// Look up a field by its error-map key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }

    pub fn required_message(&self) -> String {
        format!("{} is required", self.label())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field key → message map.
///
/// Ordered by key so repeated validation of the same draft renders the same
/// way. Locally produced errors keep the first message per field; server
/// errors overwrite (see [`FieldErrors::set`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless the field already has one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0
            .entry(field.as_str().to_string())
            .or_insert_with(|| message.into());
    }

    /// Record a message under a raw key, replacing any existing message.
    pub fn set(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(field.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
