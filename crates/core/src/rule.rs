//! Compliance rule model.
//!
//! Two shapes live here. [`RuleDraft`] mirrors the rule editor: every field
//! may be blank and both target sections stay resident so the user can switch
//! between them. [`Rule`] is the typed record handed to the persistence API,
//! produced only by [`RuleDraft::finalize`], and carries exactly one
//! [`Target`].

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::validation::{validate, Field, FieldErrors, NO_TARGET_MESSAGE};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Publication state of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Draft,
    Active,
    Archived,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
        }
    }
}

/// Language / framework scope a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    Java,
    Python,
    Nodejs,
    React,
    Vue,
    Angular,
    Javascript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "JAVA",
            Self::Python => "PYTHON",
            Self::Nodejs => "NODEJS",
            Self::React => "REACT",
            Self::Vue => "VUE",
            Self::Angular => "ANGULAR",
            Self::Javascript => "JAVASCRIPT",
        }
    }
}

/// Runtime a runtime target constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeType {
    Jdk,
    Python,
    Node,
}

impl RuntimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jdk => "JDK",
            Self::Python => "PYTHON",
            Self::Node => "NODE",
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version comparison operator of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Tilde,
    Caret,
}

impl Operator {
    /// Short comparison symbol used when a target is displayed.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Tilde => "~",
            Self::Caret => "^",
        }
    }
}

/// Compliance severity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// A rule as edited in the form. Blank strings and missing keys both mean
/// "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<RuleStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_definition: RuleDefinitionDraft,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compliance: ComplianceDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinitionDraft {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub language: Option<Language>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: TargetDraft,
}

/// Both target sections, kept side by side for editing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime_target: RuntimeTargetDraft,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependency_target: DependencyTargetDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeTargetDraft {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub runtime_type: Option<RuntimeType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub operator: Option<Operator>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyTargetDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub artefact: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub operator: Option<Operator>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDraft {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub severity: Option<Severity>,
}

/// Which target section(s) of a draft carry data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSelection<'a> {
    Unset,
    Runtime(&'a RuntimeTargetDraft),
    Dependency(&'a DependencyTargetDraft),
    Both,
}

impl RuntimeTargetDraft {
    /// True when any of the three fields has been filled in.
    pub fn is_populated(&self) -> bool {
        self.runtime_type.is_some() || !self.version.trim().is_empty() || self.operator.is_some()
    }
}

impl DependencyTargetDraft {
    /// True when any of the three fields has been filled in.
    pub fn is_populated(&self) -> bool {
        !self.artefact.trim().is_empty()
            || !self.version.trim().is_empty()
            || self.operator.is_some()
    }
}

impl TargetDraft {
    /// Collapse the two resident sections into a single variant.
    pub fn selection(&self) -> TargetSelection<'_> {
        match (
            self.runtime_target.is_populated(),
            self.dependency_target.is_populated(),
        ) {
            (false, false) => TargetSelection::Unset,
            (true, false) => TargetSelection::Runtime(&self.runtime_target),
            (false, true) => TargetSelection::Dependency(&self.dependency_target),
            (true, true) => TargetSelection::Both,
        }
    }
}

impl RuleDraft {
    /// A fresh editor draft: `DRAFT` status, `MEDIUM` severity and a deadline
    /// of today (UTC). Everything else is blank.
    pub fn new() -> Self {
        Self {
            status: Some(RuleStatus::Draft),
            compliance: ComplianceDraft {
                deadline: Some(Utc::now().date_naive()),
                severity: Some(Severity::Medium),
            },
            ..Self::default()
        }
    }

    /// Parse a draft from its JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the draft and convert it into a submittable [`Rule`].
    ///
    /// Always applies the strict target policy: a rule without a target is
    /// never submittable.
    pub fn finalize(&self) -> Result<Rule, FieldErrors> {
        validate(self)?;
        self.to_rule().ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.insert(Field::Targets, NO_TARGET_MESSAGE);
            errors
        })
    }

    fn to_rule(&self) -> Option<Rule> {
        let target = match self.rule_definition.target.selection() {
            TargetSelection::Runtime(runtime) => Target::Runtime(RuntimeTarget {
                runtime_type: runtime.runtime_type?,
                version: runtime.version.trim().to_string(),
                operator: runtime.operator?,
            }),
            TargetSelection::Dependency(dependency) => Target::Dependency(DependencyTarget {
                artefact: dependency.artefact.trim().to_string(),
                version: dependency.version.trim().to_string(),
                operator: dependency.operator?,
            }),
            TargetSelection::Unset | TargetSelection::Both => return None,
        };

        Some(Rule {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status?,
            rule_definition: RuleDefinition {
                language: self.rule_definition.language?,
                target,
            },
            compliance: Compliance {
                deadline: self.compliance.deadline?,
                severity: self.compliance.severity?,
            },
        })
    }
}

/// Treat `null` like a missing key for text fields and nested sections.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat `null`, missing and blank strings as `None` for enum and date fields.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let de: serde::de::value::StringDeserializer<D::Error> =
                value.to_string().into_deserializer();
            T::deserialize(de).map(Some)
        }
    }
}

// ---------------------------------------------------------------------------
// Typed rule
// ---------------------------------------------------------------------------

/// A validated rule, ready for the create/update API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    pub description: String,
    pub status: RuleStatus,
    pub rule_definition: RuleDefinition,
    pub compliance: Compliance,
}

impl Rule {
    /// Parse an editor draft and finalize it in one step.
    ///
    /// Malformed JSON is a [`CoreError::Parse`]; a draft that fails
    /// validation is a [`CoreError::Validation`] carrying every field error.
    pub fn from_draft_json(json: &str) -> Result<Self, CoreError> {
        Ok(RuleDraft::from_json(json)?.finalize()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub language: Language,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    pub deadline: NaiveDate,
    pub severity: Severity,
}

/// The single condition a rule checks.
///
/// Serializes as `{"runtimeTarget": {...}}` or `{"dependencyTarget": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "runtimeTarget")]
    Runtime(RuntimeTarget),
    #[serde(rename = "dependencyTarget")]
    Dependency(DependencyTarget),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeTarget {
    pub runtime_type: RuntimeType,
    pub version: String,
    pub operator: Operator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyTarget {
    pub artefact: String,
    pub version: String,
    pub operator: Operator,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime(t) => write!(f, "{} {} {}", t.runtime_type, t.operator.symbol(), t.version),
            Self::Dependency(t) => write!(f, "{} {} {}", t.artefact, t.operator.symbol(), t.version),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn runtime_draft() -> RuleDraft {
        let mut draft = RuleDraft::new();
        draft.name = "JDK 11 baseline".to_string();
        draft.description = "All services must run on JDK 11 or newer".to_string();
        draft.rule_definition.language = Some(Language::Java);
        draft.rule_definition.target.runtime_target = RuntimeTargetDraft {
            runtime_type: Some(RuntimeType::Jdk),
            version: "11.0.1".to_string(),
            operator: Some(Operator::GreaterEqual),
        };
        draft
    }

    // -- editor defaults -----------------------------------------------------

    #[test]
    fn new_draft_carries_editor_defaults() {
        let draft = RuleDraft::new();
        assert_eq!(draft.status, Some(RuleStatus::Draft));
        assert_eq!(draft.compliance.severity, Some(Severity::Medium));
        assert_eq!(draft.compliance.deadline, Some(Utc::now().date_naive()));
        assert!(draft.name.is_empty());
        assert_eq!(draft.rule_definition.target.selection(), TargetSelection::Unset);
    }

    // -- deserialization -----------------------------------------------------

    #[test]
    fn blank_enum_and_date_fields_deserialize_as_none() {
        let draft: RuleDraft = serde_json::from_value(json!({
            "name": "x",
            "status": "",
            "ruleDefinition": {
                "language": "  ",
                "target": {
                    "runtimeTarget": {"runtimeType": "", "version": "", "operator": null}
                }
            },
            "compliance": {"deadline": "", "severity": ""}
        }))
        .unwrap();

        assert_eq!(draft.status, None);
        assert_eq!(draft.rule_definition.language, None);
        assert_eq!(draft.compliance.deadline, None);
        assert_eq!(draft.compliance.severity, None);
        assert!(!draft.rule_definition.target.runtime_target.is_populated());
    }

    #[test]
    fn wire_names_deserialize_into_enums() {
        let draft: RuleDraft = serde_json::from_value(json!({
            "status": "ACTIVE",
            "ruleDefinition": {
                "language": "NODEJS",
                "target": {
                    "dependencyTarget": {"artefact": "lodash", "version": "4.17.21", "operator": "NOT_EQUAL"}
                }
            },
            "compliance": {"deadline": "2026-12-31", "severity": "CRITICAL"}
        }))
        .unwrap();

        assert_eq!(draft.status, Some(RuleStatus::Active));
        assert_eq!(draft.rule_definition.language, Some(Language::Nodejs));
        assert_eq!(
            draft.rule_definition.target.dependency_target.operator,
            Some(Operator::NotEqual)
        );
        assert_eq!(
            draft.compliance.deadline,
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
    }

    #[test]
    fn unknown_enum_value_is_a_parse_error() {
        let result = RuleDraft::from_json(r#"{"status": "PUBLISHED"}"#);
        assert_matches!(result, Err(CoreError::Parse(_)));
    }

    #[test]
    fn null_text_and_sections_deserialize_as_blank() {
        let draft = RuleDraft::from_json(
            r#"{"name": null, "description": null, "ruleDefinition": {"target":
                {"runtimeTarget": null, "dependencyTarget": {"artefact": null, "version": null}}}}"#,
        )
        .unwrap();
        assert!(draft.name.is_empty());
        assert!(draft.description.is_empty());
        assert_eq!(draft.rule_definition.target, TargetDraft::default());
    }

    #[test]
    fn null_top_level_sections_deserialize_as_blank() {
        let draft =
            RuleDraft::from_json(r#"{"ruleDefinition": null, "compliance": null}"#).unwrap();
        assert_eq!(draft, RuleDraft::default());
    }

    #[test]
    fn draft_json_with_errors_is_a_validation_error() {
        let result = Rule::from_draft_json(r#"{"name": "ab"}"#);
        assert_matches!(result, Err(CoreError::Validation(errors)) => {
            assert_eq!(errors.get("name"), Some("Name must be between 3 and 100 characters"));
        });
    }

    // -- selection -----------------------------------------------------------

    #[test]
    fn operator_alone_populates_a_target() {
        let mut target = TargetDraft::default();
        target.dependency_target.operator = Some(Operator::Caret);
        assert_matches!(target.selection(), TargetSelection::Dependency(_));
    }

    #[test]
    fn whitespace_version_does_not_populate_a_target() {
        let mut target = TargetDraft::default();
        target.runtime_target.version = "   ".to_string();
        assert_eq!(target.selection(), TargetSelection::Unset);
    }

    #[test]
    fn both_sections_populated_selects_both() {
        let mut target = TargetDraft::default();
        target.runtime_target.runtime_type = Some(RuntimeType::Python);
        target.dependency_target.artefact = "requests".to_string();
        assert_eq!(target.selection(), TargetSelection::Both);
    }

    // -- finalize ------------------------------------------------------------

    #[test]
    fn finalize_produces_runtime_target_and_trims_text() {
        let mut draft = runtime_draft();
        draft.name = "  JDK 11 baseline ".to_string();
        draft.rule_definition.target.runtime_target.version = " 11.0.1 ".to_string();

        let rule = draft.finalize().unwrap();
        assert_eq!(rule.name, "JDK 11 baseline");
        assert_eq!(
            rule.rule_definition.target,
            Target::Runtime(RuntimeTarget {
                runtime_type: RuntimeType::Jdk,
                version: "11.0.1".to_string(),
                operator: Operator::GreaterEqual,
            })
        );
    }

    #[test]
    fn finalize_rejects_invalid_draft_with_field_errors() {
        let mut draft = runtime_draft();
        draft.name.clear();
        let errors = draft.finalize().unwrap_err();
        assert_eq!(errors.get(Field::Name.as_str()), Some("Name is required"));
    }

    #[test]
    fn finalized_rule_serializes_with_single_target_key() {
        let rule = runtime_draft().finalize().unwrap();
        let value = serde_json::to_value(&rule).unwrap();
        let target = &value["ruleDefinition"]["target"];

        assert_eq!(target["runtimeTarget"]["runtimeType"], "JDK");
        assert_eq!(target["runtimeTarget"]["operator"], "GREATER_EQUAL");
        assert!(target.get("dependencyTarget").is_none());
        assert_eq!(value["compliance"]["severity"], "MEDIUM");
    }

    // -- display -------------------------------------------------------------

    #[test]
    fn target_display_uses_operator_symbol() {
        let runtime = Target::Runtime(RuntimeTarget {
            runtime_type: RuntimeType::Jdk,
            version: "17".to_string(),
            operator: Operator::GreaterEqual,
        });
        let dependency = Target::Dependency(DependencyTarget {
            artefact: "log4j-core".to_string(),
            version: "2.17.1".to_string(),
            operator: Operator::NotEqual,
        });

        assert_eq!(runtime.to_string(), "JDK >= 17");
        assert_eq!(dependency.to_string(), "log4j-core != 2.17.1");
    }
}
