//! Fuzzy filter over a component's dependency list.
//!
//! The query is split into lowercase terms; a dependency matches when every
//! term occurs somewhere in its artefact, version or type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single resolved dependency of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub artefact: String,
    #[serde(default)]
    pub version: String,
    /// Packaging or scope reported by the build manager (`jar`, `npm`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Dependency {
    fn haystack(&self) -> String {
        format!("{} {} {}", self.artefact, self.version, self.kind).to_lowercase()
    }
}

/// Split a query into lowercase search terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// True when every term occurs in the dependency's searchable text.
pub fn matches_terms(dependency: &Dependency, terms: &[String]) -> bool {
    let haystack = dependency.haystack();
    terms.iter().all(|term| haystack.contains(term.as_str()))
}

/// Keep the dependencies matching `query`, in their original order.
///
/// A blank query keeps everything.
pub fn filter_dependencies<'a>(dependencies: &'a [Dependency], query: &str) -> Vec<&'a Dependency> {
    let terms = query_terms(query);
    dependencies
        .iter()
        .filter(|dep| matches_terms(dep, &terms))
        .collect()
}

/// Parse a JSON array of dependencies.
pub fn parse_dependencies(json: &str) -> Result<Vec<Dependency>, CoreError> {
    Ok(serde_json::from_str(json)?)
}

/// "shown / total" counter displayed above a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl FilterSummary {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.shown, self.total)
    }
}
