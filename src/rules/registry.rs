use super::{BUILTIN_RULES, Rule, RuleDeclaration, RuleEnv};
use crate::case_checker::CaseChecker;
use crate::config::RulesConfig;
use crate::error::{LintError, Result};
use crate::violation::Severity;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// A discovered rule with its configuration applied
pub struct ActiveRule {
    pub declaration: RuleDeclaration,
    pub enabled: bool,
    /// Overrides every check's declared severity when set
    pub severity_override: Option<Severity>,
    pub instance: Box<dyn Rule>,
}

impl ActiveRule {
    pub fn id(&self) -> &'static str {
        self.declaration.id
    }

    /// Severity reported for this rule: the override, else the declared default
    pub fn severity(&self) -> Severity {
        self.severity_override.unwrap_or(self.declaration.severity)
    }

    /// Severity reported for one of its checks
    pub fn check_severity(&self, declared: Severity) -> Severity {
        self.severity_override.unwrap_or(declared)
    }
}

impl std::fmt::Debug for ActiveRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveRule")
            .field("declaration", &self.declaration)
            .field("enabled", &self.enabled)
            .field("severity_override", &self.severity_override)
            .finish()
    }
}

/// Rules of the enabled rule sets, keyed by rule id
#[derive(Debug)]
pub struct Registry {
    rules: BTreeMap<&'static str, ActiveRule>,
}

impl Registry {
    /// Discover the built-in rules
    pub fn discover(config: &RulesConfig) -> Result<Self> {
        Self::discover_from(BUILTIN_RULES, config)
    }

    /// Discover rules from an explicit declaration table.
    ///
    /// Fails on duplicate ids, before anything is checked. Overrides naming
    /// rules outside the enabled rule sets are ignored with a warning.
    pub fn discover_from(declarations: &[RuleDeclaration], config: &RulesConfig) -> Result<Self> {
        let mut per_set: HashSet<(&str, &str)> = HashSet::new();
        for declaration in declarations {
            if !per_set.insert((declaration.rule_set.id, declaration.id)) {
                return Err(LintError::DuplicateRule {
                    rule_set: declaration.rule_set.id.to_string(),
                    id: declaration.id.to_string(),
                });
            }
        }

        for rule_set in &config.rule_sets {
            if !declarations.iter().any(|d| d.rule_set.id == rule_set.as_str()) {
                tracing::warn!(rule_set = %rule_set, "Enabled rule set has no rules");
            }
        }

        let env = RuleEnv {
            config: Arc::new(config.clone()),
            case_checker: Arc::new(CaseChecker::from_config(&config.case_checker)?),
        };

        let mut rules: BTreeMap<&'static str, ActiveRule> = BTreeMap::new();
        for declaration in declarations
            .iter()
            .filter(|d| config.is_rule_set_enabled(d.rule_set.id))
        {
            if let Some(existing) = rules.get(declaration.id) {
                return Err(LintError::Configuration(format!(
                    "rule id '{}' is declared by both '{}' and '{}'",
                    declaration.id, existing.declaration.rule_set.id, declaration.rule_set.id
                )));
            }

            let rule_override = config.override_for(declaration.id);
            let active = ActiveRule {
                declaration: *declaration,
                enabled: rule_override.and_then(|o| o.enabled).unwrap_or(true),
                severity_override: rule_override.and_then(|o| o.severity),
                instance: (declaration.factory)(&env)?,
            };
            tracing::debug!(
                rule = declaration.id,
                rule_set = declaration.rule_set.id,
                enabled = active.enabled,
                severity = %active.severity(),
                "Discovered rule"
            );
            rules.insert(declaration.id, active);
        }

        for rule_id in config.rules.keys() {
            if !rules.contains_key(rule_id.as_str()) {
                tracing::warn!(rule = %rule_id, "Override for unknown or disabled rule ignored");
            }
        }

        Ok(Self { rules })
    }

    pub fn get(&self, rule_id: &str) -> Option<&ActiveRule> {
        self.rules.get(rule_id)
    }

    /// All discovered rules, by id
    pub fn iter(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.values()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.values().filter(|r| r.enabled)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleOverride;
    use crate::rules::{Check, RuleSet, ewerk, zalando};

    const TEST_SET: RuleSet = RuleSet {
        id: "test",
        url: "https://example.com/guidelines",
        anchors_rules: false,
    };

    struct Noop;

    impl Rule for Noop {
        fn checks(&self) -> Vec<Check<'_>> {
            vec![Check::new("noop", Severity::Hint, |_| Ok(vec![]))]
        }
    }

    fn noop(_env: &RuleEnv) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Noop))
    }

    fn declaration(id: &'static str) -> RuleDeclaration {
        RuleDeclaration {
            rule_set: &TEST_SET,
            id,
            severity: Severity::May,
            title: "Test rule",
            factory: noop,
        }
    }

    #[test]
    fn test_discover_builtin_rules() {
        let config = RulesConfig::builtin().unwrap();
        let registry = Registry::discover(&config).unwrap();

        assert_eq!(registry.len(), BUILTIN_RULES.len());
        assert!(registry.get("104").unwrap().enabled);
        assert!(!registry.get("130").unwrap().enabled);
        assert_eq!(registry.get("001").unwrap().severity(), Severity::Must);
    }

    #[test]
    fn test_only_enabled_rule_sets_are_discovered() {
        let config = RulesConfig::builtin().unwrap().with_rule_sets(["ewerk"]);
        let registry = Registry::discover(&config).unwrap();

        let ids: Vec<&str> = registry.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["001", "002"]);
    }

    #[test]
    fn test_overrides_are_looked_up_not_written() {
        let config = RulesConfig::builtin()
            .unwrap()
            .with_override(
                "001",
                RuleOverride {
                    enabled: None,
                    severity: Some(Severity::Hint),
                },
            )
            .with_override(
                "104",
                RuleOverride {
                    enabled: Some(false),
                    severity: None,
                },
            );
        let registry = Registry::discover(&config).unwrap();

        let rule = registry.get("001").unwrap();
        assert_eq!(rule.severity(), Severity::Hint);
        assert_eq!(rule.check_severity(Severity::Must), Severity::Hint);
        assert_eq!(ewerk::CAMEL_CASE_IN_PROP_NAME.severity, Severity::Must);

        assert!(!registry.get("104").unwrap().enabled);
        assert_eq!(registry.enabled().filter(|r| r.id() == "104").count(), 0);
        assert_eq!(zalando::SECURE_WITH_OAUTH2.severity, Severity::Must);
    }

    #[test]
    fn test_duplicate_rule_id_in_rule_set_fails() {
        let config = RulesConfig::default().with_rule_sets(["test"]);
        let declarations = [declaration("X1"), declaration("X2"), declaration("X1")];

        match Registry::discover_from(&declarations, &config) {
            Err(LintError::DuplicateRule { rule_set, id }) => {
                assert_eq!(rule_set, "test");
                assert_eq!(id, "X1");
            }
            other => panic!("expected duplicate rule error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_override_is_ignored() {
        let config = RulesConfig::default()
            .with_rule_sets(["test"])
            .with_override(
                "does-not-exist",
                RuleOverride {
                    enabled: Some(false),
                    severity: None,
                },
            );
        let registry = Registry::discover_from(&[declaration("X1")], &config).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("X1").unwrap().enabled);
        assert_eq!(registry.get("X1").unwrap().severity(), Severity::May);
    }
}
