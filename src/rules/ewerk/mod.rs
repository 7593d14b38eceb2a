//! eWerk REST API guidelines

mod camel_case_for_query_params;
mod camel_case_in_prop_name;

pub use camel_case_for_query_params::CamelCaseForQueryParamsRule;
pub use camel_case_in_prop_name::CamelCaseInPropNameRule;

use super::{RuleDeclaration, RuleSet};
use crate::violation::Severity;

pub const RULE_SET: RuleSet = RuleSet {
    id: "ewerk",
    url: "https://confluence.it.ewerk.com/display/CUD/REST+APIs",
    anchors_rules: false,
};

pub const CAMEL_CASE_IN_PROP_NAME: RuleDeclaration = RuleDeclaration {
    rule_set: &RULE_SET,
    id: "001",
    severity: Severity::Must,
    title: "Property Names Must be ASCII camelCase",
    factory: CamelCaseInPropNameRule::create,
};

pub const CAMEL_CASE_FOR_QUERY_PARAMS: RuleDeclaration = RuleDeclaration {
    rule_set: &RULE_SET,
    id: "002",
    severity: Severity::Must,
    title: "Use camelCase (never snake_case) for Query Parameters",
    factory: CamelCaseForQueryParamsRule::create,
};
