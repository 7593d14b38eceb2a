use crate::context::{Context, SchemeKind};
use crate::error::Result;
use crate::rules::{Check, Rule, RuleEnv};
use crate::violation::{Finding, Severity};
use std::collections::HashSet;

/// Every API is secured by OAuth2, nothing else, and only with declared scopes.
#[derive(Debug, Default)]
pub struct SecureWithOAuth2Rule;

impl SecureWithOAuth2Rule {
    pub fn create(_env: &RuleEnv) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self))
    }

    pub fn check_security_schemes_oauth2_is_used(&self, context: &Context<'_>) -> Option<Finding> {
        let has_oauth2 = context
            .security_schemes()
            .iter()
            .any(|scheme| scheme.value.kind == SchemeKind::OAuth2);

        (!has_oauth2).then(|| {
            Finding::new(
                "API has to be secured by OAuth2",
                context.security_schemes_pointer(),
            )
        })
    }

    pub fn check_security_schemes_only_oauth2_is_used(&self, context: &Context<'_>) -> Option<Finding> {
        let has_other = context
            .security_schemes()
            .iter()
            .any(|scheme| scheme.value.kind != SchemeKind::OAuth2);

        has_other.then(|| {
            Finding::new(
                "Only OAuth2 is allowed to secure the API",
                context.security_schemes_pointer(),
            )
        })
    }

    /// Scopes requested by security requirements must be declared by their scheme.
    /// Only the OpenAPI 3 security model is checked.
    pub fn check_used_scopes_are_specified(&self, context: &Context<'_>) -> Vec<Finding> {
        if !context.is_openapi3() {
            return vec![];
        }

        let schemes = context.security_schemes();
        let mut reported = HashSet::new();
        let mut findings = vec![];

        for operation in context.operations() {
            for requirement in context.security_requirements_for(&operation) {
                let scheme = schemes
                    .iter()
                    .find(|s| s.value.name == requirement.value.scheme);
                if matches!(scheme, Some(s) if s.value.kind != SchemeKind::OAuth2) {
                    continue;
                }

                for scope in &requirement.value.scopes {
                    let declared = scheme.is_some_and(|s| s.value.declares_scope(scope.value));
                    if !declared && reported.insert(scope.pointer.clone()) {
                        findings.push(Finding::new(
                            format!(
                                "The scope '{}/{}' is not specified in the security schemes",
                                requirement.value.scheme, scope.value
                            ),
                            scope.pointer.clone(),
                        ));
                    }
                }
            }
        }
        findings
    }
}

impl Rule for SecureWithOAuth2Rule {
    fn checks(&self) -> Vec<Check<'_>> {
        vec![
            Check::new("oauth2_is_used", Severity::Must, |context| {
                Ok(self.check_security_schemes_oauth2_is_used(context).into_iter().collect())
            }),
            Check::new("only_oauth2_is_used", Severity::Must, |context| {
                Ok(self
                    .check_security_schemes_only_oauth2_is_used(context)
                    .into_iter()
                    .collect())
            }),
            Check::new("used_scopes_are_specified", Severity::Must, |context| {
                Ok(self.check_used_scopes_are_specified(context))
            }),
        ]
    }
}
