//! Zalando RESTful API guidelines

mod secure_with_oauth2;
mod snake_case_for_query_params;

pub use secure_with_oauth2::SecureWithOAuth2Rule;
pub use snake_case_for_query_params::SnakeCaseForQueryParamsRule;

use super::{RuleDeclaration, RuleSet};
use crate::violation::Severity;

pub const RULE_SET: RuleSet = RuleSet {
    id: "zalando",
    url: "https://opensource.zalando.com/restful-api-guidelines/",
    anchors_rules: true,
};

pub const SECURE_WITH_OAUTH2: RuleDeclaration = RuleDeclaration {
    rule_set: &RULE_SET,
    id: "104",
    severity: Severity::Must,
    title: "Secure Endpoints with OAuth 2.0",
    factory: SecureWithOAuth2Rule::create,
};

pub const SNAKE_CASE_FOR_QUERY_PARAMS: RuleDeclaration = RuleDeclaration {
    rule_set: &RULE_SET,
    id: "130",
    severity: Severity::Must,
    title: "Use snake_case (never camelCase) for Query Parameters",
    factory: SnakeCaseForQueryParamsRule::create,
};
