use crate::error::{LintError, Result};
use crate::violation::Severity;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUILTIN_CONFIG: &str = include_str!("../resources/rules-config.yaml");

/// Per-run configuration: which rule sets run, rule overrides, naming conventions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Enabled rule sets
    #[serde(default)]
    pub rule_sets: Vec<String>,

    /// Overrides keyed by rule id
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,

    #[serde(default)]
    pub case_checker: CaseCheckerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOverride {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseCheckerConfig {
    /// Convention label → regex, in declaration order
    #[serde(default)]
    pub cases: IndexMap<String, String>,

    #[serde(default)]
    pub property_names: CaseCheckConfig,

    #[serde(default)]
    pub query_parameter_names: CaseCheckConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseCheckConfig {
    /// Accepted convention labels
    #[serde(default)]
    pub allow: Vec<String>,

    /// Patterns that always pass
    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl RulesConfig {
    /// The configuration shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CONFIG)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| LintError::Configuration(format!("invalid rules configuration: {}", e)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LintError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn with_rule_sets<I, S>(mut self, rule_sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_sets = rule_sets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_override(mut self, rule_id: impl Into<String>, rule_override: RuleOverride) -> Self {
        self.rules.insert(rule_id.into(), rule_override);
        self
    }

    pub fn is_rule_set_enabled(&self, rule_set: &str) -> bool {
        self.rule_sets.iter().any(|r| r == rule_set)
    }

    pub fn override_for(&self, rule_id: &str) -> Option<&RuleOverride> {
        self.rules.get(rule_id)
    }
}
