//! Rule API, rule sets, and the table of built-in rules.
//!
//! Rules are registered explicitly in [`BUILTIN_RULES`]: each entry carries
//! the rule's metadata and a factory. The [`registry`] turns the table plus a
//! [`RulesConfig`] into the set of rules that run.

pub mod corefiling;
pub mod ewerk;
pub mod registry;
pub mod zalando;

pub use registry::{ActiveRule, Registry};

use crate::case_checker::CaseChecker;
use crate::config::RulesConfig;
use crate::context::Context;
use crate::error::Result;
use crate::violation::{Finding, Severity};
use std::fmt;
use std::sync::Arc;

/// A named collection of rules sharing one documentation source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub id: &'static str,
    pub url: &'static str,
    /// Whether rule documentation is addressed by a `#<rule id>` fragment
    pub anchors_rules: bool,
}

impl RuleSet {
    /// Documentation link for one of this set's rules
    pub fn url(&self, rule_id: &str) -> String {
        if self.anchors_rules {
            format!("{}#{}", self.url, rule_id)
        } else {
            self.url.to_string()
        }
    }
}

/// What a check closure returns
pub type CheckResult = anyhow::Result<Vec<Finding>>;

/// One independently severity-tagged check of a rule
pub struct Check<'r> {
    pub name: &'static str,
    pub severity: Severity,
    run: Box<dyn Fn(&Context<'_>) -> CheckResult + Send + Sync + 'r>,
}

impl<'r> Check<'r> {
    pub fn new(
        name: &'static str,
        severity: Severity,
        run: impl Fn(&Context<'_>) -> CheckResult + Send + Sync + 'r,
    ) -> Self {
        Self {
            name,
            severity,
            run: Box::new(run),
        }
    }

    pub fn run(&self, context: &Context<'_>) -> CheckResult {
        (self.run)(context)
    }
}

impl fmt::Debug for Check<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .finish()
    }
}

/// A unit of guideline logic
pub trait Rule: Send + Sync {
    fn checks(&self) -> Vec<Check<'_>>;
}

/// What a rule factory gets to build its instance
#[derive(Debug, Clone)]
pub struct RuleEnv {
    pub config: Arc<RulesConfig>,
    pub case_checker: Arc<CaseChecker>,
}

/// Static metadata plus factory for one rule
#[derive(Clone, Copy)]
pub struct RuleDeclaration {
    pub rule_set: &'static RuleSet,
    pub id: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub factory: fn(&RuleEnv) -> Result<Box<dyn Rule>>,
}

impl RuleDeclaration {
    pub fn url(&self) -> String {
        self.rule_set.url(self.id)
    }
}

impl fmt::Debug for RuleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDeclaration")
            .field("rule_set", &self.rule_set.id)
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("title", &self.title)
            .finish()
    }
}

pub static BUILTIN_RULES: &[RuleDeclaration] = &[
    zalando::SECURE_WITH_OAUTH2,
    zalando::SNAKE_CASE_FOR_QUERY_PARAMS,
    ewerk::CAMEL_CASE_IN_PROP_NAME,
    ewerk::CAMEL_CASE_FOR_QUERY_PARAMS,
    corefiling::COLLECTIONS_RETURN_TOTAL_ITEMS,
];

pub static BUILTIN_RULE_SETS: &[&RuleSet] = &[&zalando::RULE_SET, &ewerk::RULE_SET, &corefiling::RULE_SET];
