use crate::context::Context;
use crate::error::Result;
use crate::pointer::JsonPointer;
use crate::rules::{Check, Rule, RuleEnv};
use crate::violation::{Finding, Severity};
use serde_json::Value;

const HEADER: &str = "Total-Items";

/// Successful GET responses returning an array must carry an int32 `Total-Items` header.
#[derive(Debug, Default)]
pub struct CollectionsReturnTotalItemsRule;

impl CollectionsReturnTotalItemsRule {
    pub fn create(_env: &RuleEnv) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self))
    }

    pub fn check_total_items_header(&self, context: &Context<'_>) -> Vec<Finding> {
        let mut findings = vec![];

        for operation in context.operations() {
            if operation.value.method != "get" {
                continue;
            }
            for response in context.responses_for(&operation) {
                if !response.value.is_success() {
                    continue;
                }
                let Some(schema) = response.value.schema else {
                    continue;
                };
                if !is_array(context, schema) {
                    continue;
                }

                let declared = response.value.header(HEADER).is_some_and(|header| {
                    header.type_ == Some("integer") && header.format == Some("int32")
                });
                if !declared {
                    findings.push(Finding::new(
                        format!(
                            "{} GET response {} headers: does not include an int32 format integer {} header",
                            operation.value.path, response.value.status, HEADER
                        ),
                        response.pointer.clone(),
                    ));
                }
            }
        }
        findings
    }
}

fn is_array<'a>(context: &Context<'a>, schema: &'a Value) -> bool {
    let schema = match context.follow_ref(schema, JsonPointer::root()) {
        Some(resolved) => resolved.value,
        None => return false,
    };
    schema.get("type").and_then(Value::as_str) == Some("array")
}

impl Rule for CollectionsReturnTotalItemsRule {
    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("total_items_header", Severity::Should, |context| {
            Ok(self.check_total_items_header(context))
        })]
    }
}
