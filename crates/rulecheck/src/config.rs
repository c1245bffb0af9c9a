use anyhow::{anyhow, Context};
use deptrack_core::validation::{UntouchedTargetPolicy, ValidatorConfig};

/// How reports are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format '{s}'. Must be one of: text, json")),
        }
    }
}

/// Checker configuration loaded from environment variables.
///
/// All fields have defaults, so an empty environment is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCheckConfig {
    pub validator: ValidatorConfig,
    pub output: OutputFormat,
}

impl RuleCheckConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                       | Default  |
    /// |-------------------------------|----------|
    /// | `RULECHECK_UNTOUCHED_TARGETS` | `reject` |
    /// | `RULECHECK_OUTPUT`            | `text`   |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let untouched_targets = match lookup("RULECHECK_UNTOUCHED_TARGETS") {
            Some(raw) => UntouchedTargetPolicy::from_str_value(raw.trim().to_lowercase().as_str())
                .map_err(|e| anyhow!(e))
                .context("RULECHECK_UNTOUCHED_TARGETS")?,
            None => UntouchedTargetPolicy::default(),
        };

        let output = match lookup("RULECHECK_OUTPUT") {
            Some(raw) => OutputFormat::from_str_value(raw.trim().to_lowercase().as_str())
                .map_err(|e| anyhow!(e))
                .context("RULECHECK_OUTPUT")?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            validator: ValidatorConfig { untouched_targets },
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = RuleCheckConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, RuleCheckConfig::default());
        assert_eq!(config.validator.untouched_targets, UntouchedTargetPolicy::Reject);
    }

    #[test]
    fn values_are_case_insensitive() {
        let config = RuleCheckConfig::from_lookup(lookup_from(&[
            ("RULECHECK_UNTOUCHED_TARGETS", "Defer"),
            ("RULECHECK_OUTPUT", " JSON "),
        ]))
        .unwrap();
        assert_eq!(config.validator.untouched_targets, UntouchedTargetPolicy::Defer);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn invalid_value_names_the_variable() {
        let err = RuleCheckConfig::from_lookup(lookup_from(&[("RULECHECK_OUTPUT", "yaml")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("RULECHECK_OUTPUT"));
    }
}
