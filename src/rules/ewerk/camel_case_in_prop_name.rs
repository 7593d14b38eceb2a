use crate::case_checker::CaseChecker;
use crate::context::Context;
use crate::error::Result;
use crate::rules::{Check, Rule, RuleEnv};
use crate::violation::{Finding, Severity};
use std::sync::Arc;

const DESCRIPTION: &str = "Property name has to be camelCase";

/// Uses the configured `property_names` check (camelCase, `_links` whitelisted by default).
pub struct CamelCaseInPropNameRule {
    checker: Arc<CaseChecker>,
}

impl CamelCaseInPropNameRule {
    pub fn create(env: &RuleEnv) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self::new(env.case_checker.clone())))
    }

    pub fn new(checker: Arc<CaseChecker>) -> Self {
        Self { checker }
    }

    pub fn check_property_names(&self, context: &Context<'_>) -> Vec<Finding> {
        self.checker
            .check_property_names(context)
            .into_iter()
            .map(|finding| finding.reworded(DESCRIPTION))
            .collect()
    }
}

impl Rule for CamelCaseInPropNameRule {
    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("property_names", Severity::Must, |context| {
            Ok(self.check_property_names(context))
        })]
    }
}
