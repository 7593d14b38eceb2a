use super::load_config;
use crate::Result;
use crate::rules::{BUILTIN_RULE_SETS, BUILTIN_RULES, Registry, RuleDeclaration};
use colored::*;
use std::path::Path;

/// One line of the rule listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleListing {
    pub rule_set: &'static str,
    pub id: &'static str,
    pub severity: String,
    pub enabled: bool,
    pub title: &'static str,
    pub url: String,
}

/// Every built-in rule, grouped by rule set, with the effective state under `registry`
pub fn list_rules(registry: &Registry) -> Vec<RuleListing> {
    BUILTIN_RULE_SETS
        .iter()
        .flat_map(|rule_set| {
            BUILTIN_RULES
                .iter()
                .filter(move |declaration| declaration.rule_set.id == rule_set.id)
        })
        .map(|declaration| listing(declaration, registry))
        .collect()
}

fn listing(declaration: &RuleDeclaration, registry: &Registry) -> RuleListing {
    let active = registry
        .get(declaration.id)
        .filter(|rule| rule.declaration.rule_set.id == declaration.rule_set.id);

    RuleListing {
        rule_set: declaration.rule_set.id,
        id: declaration.id,
        severity: active
            .map(|rule| rule.severity())
            .unwrap_or(declaration.severity)
            .to_string(),
        enabled: active.is_some_and(|rule| rule.enabled),
        title: declaration.title,
        url: declaration.url(),
    }
}

pub fn execute_rules(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = Registry::discover(&config)?;
    let listings = list_rules(&registry);

    println!("{}", format!("Rules ({}):", listings.len()).bold());
    for rule_set in BUILTIN_RULE_SETS {
        let set_state = if config.is_rule_set_enabled(rule_set.id) {
            "enabled".green()
        } else {
            "disabled".bright_black()
        };
        println!();
        println!("  {} [{}] {}", rule_set.id.bright_cyan().bold(), set_state, rule_set.url.bright_black());

        for rule in listings.iter().filter(|r| r.rule_set == rule_set.id) {
            let state = if rule.enabled {
                "enabled".green()
            } else {
                "disabled".bright_black()
            };
            println!(
                "    {} {} [{}] {}",
                rule.id.bold(),
                rule.severity.yellow(),
                state,
                rule.title
            );
            println!("      {}", rule.url.bright_black());
        }
    }

    Ok(())
}
