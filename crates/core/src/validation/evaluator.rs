//! Rule-definition validator -- pure logic, no I/O.
//!
//! Checks run in a fixed order: mandatory scalars, length bounds, then the
//! target guards. Every violated constraint is reported, not just the first.

use serde::{Deserialize, Serialize};
use validator::ValidateLength;

use super::fields::{Field, FieldErrors};
use super::version::{is_valid_version, INVALID_VERSION_MESSAGE};
use crate::rule::{DependencyTargetDraft, RuleDraft, RuntimeTargetDraft, TargetSelection};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const NAME_MIN_LENGTH: u64 = 3;
pub const NAME_MAX_LENGTH: u64 = 100;
pub const DESCRIPTION_MAX_LENGTH: u64 = 1000;

pub const BOTH_TARGETS_MESSAGE: &str =
    "Cannot set both Runtime and Dependency targets simultaneously.";

pub const NO_TARGET_MESSAGE: &str =
    "At least one target (Runtime or Dependency) must be specified correctly.";

pub const OPERATOR_REQUIRED_MESSAGE: &str = "Operator is required when a version is specified";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do with a draft whose target sections are both empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UntouchedTargetPolicy {
    /// Report a `targets` error. Used on submit.
    #[default]
    Reject,
    /// Stay silent until a target section has data. Suits as-you-type
    /// validation where a blank form should not light up red.
    Defer,
}

impl UntouchedTargetPolicy {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "reject" => Ok(Self::Reject),
            "defer" => Ok(Self::Defer),
            _ => Err(format!(
                "Invalid untouched target policy '{s}'. Must be one of: reject, defer"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Defer => "defer",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub untouched_targets: UntouchedTargetPolicy,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate a draft with the default (submit) configuration.
pub fn validate(rule: &RuleDraft) -> Result<(), FieldErrors> {
    validate_with(rule, &ValidatorConfig::default())
}

/// Validate a draft, returning every field problem at once.
pub fn validate_with(rule: &RuleDraft, config: &ValidatorConfig) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_scalars(rule, &mut errors);
    check_lengths(rule, &mut errors);
    check_targets(rule, config, &mut errors);
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Scalar fields
// ---------------------------------------------------------------------------

fn check_scalars(rule: &RuleDraft, errors: &mut FieldErrors) {
    let present = [
        (Field::Name, !rule.name.trim().is_empty()),
        (Field::Status, rule.status.is_some()),
        (Field::Description, !rule.description.trim().is_empty()),
        (Field::Language, rule.rule_definition.language.is_some()),
        (Field::Deadline, rule.compliance.deadline.is_some()),
        (Field::Severity, rule.compliance.severity.is_some()),
    ];
    for (field, is_present) in present {
        if !is_present {
            errors.insert(field, field.required_message());
        }
    }
}

/// Length bounds apply only to fields that are present; absence has already
/// been reported.
fn check_lengths(rule: &RuleDraft, errors: &mut FieldErrors) {
    let name = rule.name.trim();
    if !name.is_empty() && !name.validate_length(Some(NAME_MIN_LENGTH), Some(NAME_MAX_LENGTH), None)
    {
        errors.insert(
            Field::Name,
            format!("Name must be between {NAME_MIN_LENGTH} and {NAME_MAX_LENGTH} characters"),
        );
    }

    let description = rule.description.trim();
    if !description.is_empty()
        && !description.validate_length(None, Some(DESCRIPTION_MAX_LENGTH), None)
    {
        errors.insert(
            Field::Description,
            format!("Description must be at most {DESCRIPTION_MAX_LENGTH} characters"),
        );
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// The guard inputs shared by both target kinds: a subject (runtime type or
/// artefact), a version and an operator.
struct TargetGuards<'a> {
    subject: Field,
    subject_present: bool,
    version_field: Field,
    version: &'a str,
    operator_field: Field,
    operator_present: bool,
}

impl<'a> From<&'a RuntimeTargetDraft> for TargetGuards<'a> {
    fn from(t: &'a RuntimeTargetDraft) -> Self {
        Self {
            subject: Field::RuntimeType,
            subject_present: t.runtime_type.is_some(),
            version_field: Field::RuntimeVersion,
            version: t.version.trim(),
            operator_field: Field::RuntimeOperator,
            operator_present: t.operator.is_some(),
        }
    }
}

impl<'a> From<&'a DependencyTargetDraft> for TargetGuards<'a> {
    fn from(t: &'a DependencyTargetDraft) -> Self {
        Self {
            subject: Field::Artefact,
            subject_present: !t.artefact.trim().is_empty(),
            version_field: Field::DependencyVersion,
            version: t.version.trim(),
            operator_field: Field::DependencyOperator,
            operator_present: t.operator.is_some(),
        }
    }
}

fn check_targets(rule: &RuleDraft, config: &ValidatorConfig, errors: &mut FieldErrors) {
    match rule.rule_definition.target.selection() {
        TargetSelection::Runtime(runtime) => {
            check_target_guards(&TargetGuards::from(runtime), errors)
        }
        TargetSelection::Dependency(dependency) => {
            check_target_guards(&TargetGuards::from(dependency), errors)
        }
        // Per-field target errors are suppressed: the user has to pick one
        // section before its contents matter.
        TargetSelection::Both => errors.insert(Field::Targets, BOTH_TARGETS_MESSAGE),
        TargetSelection::Unset => match config.untouched_targets {
            UntouchedTargetPolicy::Reject => errors.insert(Field::Targets, NO_TARGET_MESSAGE),
            UntouchedTargetPolicy::Defer => {}
        },
    }
}

fn check_target_guards(guards: &TargetGuards<'_>, errors: &mut FieldErrors) {
    if !guards.subject_present {
        errors.insert(guards.subject, guards.subject.required_message());
    }

    if guards.version.is_empty() {
        errors.insert(guards.version_field, guards.version_field.required_message());
        return;
    }
    if !is_valid_version(guards.version) {
        errors.insert(guards.version_field, INVALID_VERSION_MESSAGE);
    }
    // A version, even a malformed one, makes the operator mandatory.
    if !guards.operator_present {
        errors.insert(guards.operator_field, OPERATOR_REQUIRED_MESSAGE);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
