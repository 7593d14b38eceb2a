//! Naming convention checks shared by the case rules.
//!
//! A [`CaseChecker`] knows an ordered set of named conventions
//! (`camelCase → regex`, ...). A [`CaseCheck`] selects which of them are
//! acceptable for one kind of identifier and which names are always fine.
//! Names are matched against whole patterns, case-sensitively.

use crate::config::{CaseCheckConfig, CaseCheckerConfig};
use crate::context::{Context, Located};
use crate::error::{LintError, Result};
use crate::violation::Finding;
use indexmap::IndexMap;
use regex::Regex;

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| LintError::Configuration(format!("invalid pattern '{}': {}", pattern, e)))
}

#[derive(Debug, Clone)]
struct Convention {
    label: String,
    pattern: Regex,
}

/// Acceptance rules for one kind of identifier
#[derive(Debug, Clone, Default)]
pub struct CaseCheck {
    allow: Vec<Convention>,
    whitelist: Vec<Regex>,
}

impl CaseCheck {
    fn accepts(&self, name: &str) -> bool {
        if self.whitelist.iter().any(|w| w.is_match(name)) {
            return true;
        }
        !name.is_empty() && self.allow.iter().any(|c| c.pattern.is_match(name))
    }

    fn expected(&self) -> String {
        if self.allow.is_empty() {
            return "any configured naming convention (none configured)".to_string();
        }
        self.allow
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaseChecker {
    cases: Vec<Convention>,
    property_names: CaseCheck,
    query_parameter_names: CaseCheck,
}

impl CaseChecker {
    /// Build a checker from `label → pattern` pairs, kept in the given order.
    pub fn new<I, K, V>(cases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut seen: IndexMap<String, Regex> = IndexMap::new();
        for (label, pattern) in cases {
            let label = label.into();
            if seen.contains_key(&label) {
                return Err(LintError::Configuration(format!(
                    "naming convention '{}' is declared twice",
                    label
                )));
            }
            let pattern = anchored(pattern.as_ref())?;
            seen.insert(label, pattern);
        }

        Ok(Self {
            cases: seen
                .into_iter()
                .map(|(label, pattern)| Convention { label, pattern })
                .collect(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &CaseCheckerConfig) -> Result<Self> {
        let mut checker = Self::new(config.cases.iter().map(|(k, v)| (k.clone(), v.clone())))?;
        checker.property_names = checker.case_check_from(&config.property_names)?;
        checker.query_parameter_names = checker.case_check_from(&config.query_parameter_names)?;
        Ok(checker)
    }

    fn case_check_from(&self, config: &CaseCheckConfig) -> Result<CaseCheck> {
        self.case_check(&config.allow, &config.whitelist)
    }

    /// Select accepted conventions by label and add whitelist patterns.
    /// Unknown labels are skipped with a warning, which only makes the check stricter.
    pub fn case_check<A, W>(&self, allow: &[A], whitelist: &[W]) -> Result<CaseCheck>
    where
        A: AsRef<str>,
        W: AsRef<str>,
    {
        let mut conventions = vec![];
        for label in allow {
            match self.cases.iter().find(|c| c.label == label.as_ref()) {
                Some(convention) => conventions.push(convention.clone()),
                None => tracing::warn!(label = label.as_ref(), "Unknown naming convention ignored"),
            }
        }

        Ok(CaseCheck {
            allow: conventions,
            whitelist: whitelist
                .iter()
                .map(|w| anchored(w.as_ref()))
                .collect::<Result<_>>()?,
        })
    }

    pub fn property_names(&self) -> &CaseCheck {
        &self.property_names
    }

    pub fn query_parameter_names(&self) -> &CaseCheck {
        &self.query_parameter_names
    }

    /// Label of the first declared convention `name` matches
    pub fn classify(&self, name: &str) -> Option<&str> {
        if name.is_empty() {
            return None;
        }
        self.cases
            .iter()
            .find(|c| c.pattern.is_match(name))
            .map(|c| c.label.as_str())
    }

    /// One finding per name that is neither whitelisted nor in an accepted convention.
    pub fn check_names<'n>(
        &self,
        check: &CaseCheck,
        names: impl IntoIterator<Item = Located<&'n str>>,
    ) -> Vec<Finding> {
        names
            .into_iter()
            .filter(|name| !check.accepts(name.value))
            .map(|name| {
                let mut description = format!("'{}' does not match {}", name.value, check.expected());
                if let Some(label) = self.classify(name.value) {
                    description.push_str(&format!(" (looks like {})", label));
                }
                Finding::new(description, name.pointer)
            })
            .collect()
    }

    pub fn check_property_names(&self, context: &Context<'_>) -> Vec<Finding> {
        self.check_names(&self.property_names, context.property_names())
    }

    pub fn check_query_parameter_names(&self, context: &Context<'_>) -> Vec<Finding> {
        self.check_names(&self.query_parameter_names, context.query_parameter_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;
    use crate::pointer::JsonPointer;

    const CAMEL_CASE: &str = "[a-z][a-z0-9]*(?:[A-Z0-9]+[a-z0-9]*)*";
    const SNAKE_CASE: &str = "[a-z][a-z0-9]*(?:_[a-z0-9]+)*";

    fn checker() -> CaseChecker {
        CaseChecker::new([("camelCase", CAMEL_CASE), ("snake_case", SNAKE_CASE)]).unwrap()
    }

    fn name(value: &str) -> Located<&str> {
        Located::new(value, JsonPointer::root().child("names").child(value))
    }

    #[test]
    fn test_accepts_matching_and_whitelisted_names() {
        let checker = checker();
        let check = checker.case_check(&["camelCase"], &["_links"]).unwrap();

        let findings = checker.check_names(
            &check,
            vec![name("rightPropLookSo"), name("_links"), name("wrong_prop_here")],
        );

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pointer.to_string(), "/names/wrong_prop_here");
        assert_eq!(
            findings[0].description,
            "'wrong_prop_here' does not match camelCase (looks like snake_case)"
        );
    }

    #[test]
    fn test_match_is_full_string() {
        let checker = checker();
        let check = checker.case_check(&["snake_case"], &[] as &[&str]).unwrap();
        assert_eq!(checker.check_names(&check, vec![name("ok_name-not")]).len(), 1);
        assert!(checker.check_names(&check, vec![name("ok_name")]).is_empty());
    }

    #[test]
    fn test_acceptance_is_a_union() {
        let checker = checker();
        let check = checker
            .case_check(&["camelCase", "snake_case"], &[] as &[&str])
            .unwrap();
        let findings = checker.check_names(&check, vec![name("camelName"), name("snake_name"), name("Pascal")]);

        assert_eq!(findings.len(), 1);
        assert!(findings[0].description.contains("camelCase or snake_case"));
    }

    #[test]
    fn test_empty_name_is_rejected_unless_whitelisted() {
        let checker = CaseChecker::new([("anything", ".*")]).unwrap();
        let check = checker.case_check(&["anything"], &[] as &[&str]).unwrap();
        assert_eq!(checker.check_names(&check, vec![name("")]).len(), 1);

        let check = checker.case_check(&["anything"], &[""]).unwrap();
        assert!(checker.check_names(&check, vec![name("")]).is_empty());
    }

    #[test]
    fn test_empty_configuration_accepts_nothing() {
        let checker = CaseChecker::new(Vec::<(String, String)>::new()).unwrap();
        let check = checker.case_check(&["camelCase"], &[] as &[&str]).unwrap();
        let findings = checker.check_names(&check, vec![name("fine"), name("alsoFine")]);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_at_most_one_finding_per_name() {
        let checker = checker();
        let check = checker.case_check(&["camelCase"], &["x.*"]).unwrap();
        let names = ["", "a", "A", "a_b", "aB", "xyz", "_", "9"];
        for n in names {
            assert!(checker.check_names(&check, vec![name(n)]).len() <= 1, "{}", n);
        }
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert!(CaseChecker::new([("broken", "[a-")]).is_err());
        assert!(CaseChecker::new([("dup", "a"), ("dup", "b")]).is_err());
        assert!(checker().case_check(&["camelCase"], &["(unclosed"]).is_err());
    }

    #[test]
    fn test_check_property_names_from_context() {
        let config: CaseCheckerConfig = serde_yaml::from_str(&format!(
            "cases:\n  camelCase: '{}'\nproperty_names:\n  allow: [camelCase]\n  whitelist: [_links]\n",
            CAMEL_CASE
        ))
        .unwrap();
        let checker = CaseChecker::from_config(&config).unwrap();

        let doc = parse_document(
            r#"
openapi: '3.0.1'
components:
  schemas:
    article:
      properties:
        wrong_prop_here:
          type: String
        _links:
          type: String
        rightPropLookSo:
          type: String
"#,
        )
        .unwrap();
        let ctx = Context::new(&doc).unwrap();
        let findings = checker.check_property_names(&ctx);

        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].pointer.to_string(),
            "/components/schemas/article/properties/wrong_prop_here"
        );
    }
}
