//! CoreFiling collection guidelines

mod collections_return_total_items;

pub use collections_return_total_items::CollectionsReturnTotalItemsRule;

use super::{RuleDeclaration, RuleSet};
use crate::violation::Severity;

pub const RULE_SET: RuleSet = RuleSet {
    id: "corefiling",
    url: "https://www.corefiling.com/",
    anchors_rules: false,
};

pub const COLLECTIONS_RETURN_TOTAL_ITEMS: RuleDeclaration = RuleDeclaration {
    rule_set: &RULE_SET,
    id: "collections-total-items",
    severity: Severity::Should,
    title: "Collections Return a Total-Items Header",
    factory: CollectionsReturnTotalItemsRule::create,
};
