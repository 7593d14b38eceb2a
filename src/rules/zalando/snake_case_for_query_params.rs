use crate::case_checker::{CaseCheck, CaseChecker};
use crate::context::Context;
use crate::error::Result;
use crate::rules::{Check, Rule, RuleEnv};
use crate::violation::{Finding, Severity};
use std::sync::Arc;

const DESCRIPTION: &str = "Query parameter has to be snake_case";

pub struct SnakeCaseForQueryParamsRule {
    checker: Arc<CaseChecker>,
    check: CaseCheck,
}

impl SnakeCaseForQueryParamsRule {
    pub fn create(env: &RuleEnv) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self::new(env.case_checker.clone())?))
    }

    pub fn new(checker: Arc<CaseChecker>) -> Result<Self> {
        let check = checker.case_check(&["snake_case"], &[] as &[&str])?;
        Ok(Self { checker, check })
    }

    pub fn check_query_parameter(&self, context: &Context<'_>) -> Vec<Finding> {
        self.checker
            .check_names(&self.check, context.query_parameter_names())
            .into_iter()
            .map(|finding| finding.reworded(DESCRIPTION))
            .collect()
    }
}

impl Rule for SnakeCaseForQueryParamsRule {
    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("query_parameter", Severity::Must, |context| {
            Ok(self.check_query_parameter(context))
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::loader::parse_document;

    fn rule() -> SnakeCaseForQueryParamsRule {
        let config = RulesConfig::builtin().unwrap();
        let checker = CaseChecker::from_config(&config.case_checker).unwrap();
        SnakeCaseForQueryParamsRule::new(Arc::new(checker)).unwrap()
    }

    fn api_document(name: &str) -> String {
        format!(
            r#"
openapi: 3.0.1
paths:
  /article:
    get:
      parameters:
        - name: {}
          in: query
"#,
            name
        )
    }

    #[test]
    fn test_camel_case_query_parameter_is_reported() {
        let doc = parse_document(&api_document("filterExpensiveArticles")).unwrap();
        let ctx = Context::new(&doc).unwrap();

        let findings = rule().check_query_parameter(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].description, DESCRIPTION);
        assert_eq!(findings[0].pointer.to_string(), "/paths/~1article/get/parameters/0");
    }

    #[test]
    fn test_snake_case_query_parameter_is_accepted() {
        let doc = parse_document(&api_document("filter_expensive_articles")).unwrap();
        let ctx = Context::new(&doc).unwrap();
        assert!(rule().check_query_parameter(&ctx).is_empty());
    }
}
