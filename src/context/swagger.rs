use super::views::{Header, Located, Operation, Response, Schema, SchemeKind, SecurityScheme};
use super::{Family, follow_ref};
use crate::pointer::JsonPointer;
use serde_json::Value;

/// Swagger 2.0 document
#[derive(Debug, Clone, Copy)]
pub struct SwaggerContext<'a> {
    document: &'a Value,
}

impl<'a> SwaggerContext<'a> {
    pub(super) fn new(document: &'a Value) -> Self {
        Self { document }
    }

    fn responses(&self, operation: &Located<Operation<'a>>) -> Vec<(&'a str, Located<&'a Value>)> {
        let Some(responses) = operation.value.node.get("responses").and_then(Value::as_object) else {
            return vec![];
        };
        let responses_pointer = operation.pointer.child("responses");
        responses
            .iter()
            .filter_map(|(status, node)| {
                follow_ref(self.document, node, responses_pointer.child(status))
                    .map(|response| (status.as_str(), response))
            })
            .collect()
    }

    /// `in: body` parameters declared on the path item or the operation.
    fn body_parameters(&self, operation: &Located<Operation<'a>>) -> Vec<Located<&'a Value>> {
        let path_pointer = JsonPointer::root().child("paths").child(operation.value.path);
        let owners = [
            (path_pointer.resolve(self.document), path_pointer.clone()),
            (Some(operation.value.node), operation.pointer.clone()),
        ];

        let mut bodies = vec![];
        for (owner, pointer) in owners {
            let Some(list) = owner.and_then(|o| o.get("parameters")).and_then(Value::as_array) else {
                continue;
            };
            for (index, node) in list.iter().enumerate() {
                if let Some(parameter) = follow_ref(self.document, node, pointer.child("parameters").child(index))
                    && parameter.value.get("in").and_then(Value::as_str) == Some("body")
                {
                    bodies.push(parameter);
                }
            }
        }
        bodies
    }
}

impl<'a> Family<'a> for SwaggerContext<'a> {
    fn document(&self) -> &'a Value {
        self.document
    }

    fn security_schemes_pointer(&self) -> JsonPointer {
        JsonPointer::root().child("securityDefinitions")
    }

    fn security_schemes(&self) -> Vec<Located<SecurityScheme<'a>>> {
        let Some(definitions) = self.document.get("securityDefinitions").and_then(Value::as_object) else {
            return vec![];
        };
        let container = self.security_schemes_pointer();

        definitions
            .iter()
            .filter_map(|(name, node)| {
                let kind = node.get("type").and_then(Value::as_str)?;
                let scopes: Vec<&'a str> = node
                    .get("scopes")
                    .and_then(Value::as_object)
                    .map(|scopes| scopes.keys().map(String::as_str).collect())
                    .unwrap_or_default();

                Some(Located::new(
                    SecurityScheme {
                        name,
                        kind: SchemeKind::parse(kind),
                        scopes,
                        node,
                    },
                    container.child(name),
                ))
            })
            .collect()
    }

    fn named_schemas(&self) -> Vec<Located<Schema<'a>>> {
        let Some(definitions) = self.document.get("definitions").and_then(Value::as_object) else {
            return vec![];
        };
        let container = JsonPointer::root().child("definitions");
        definitions
            .iter()
            .map(|(name, node)| {
                Located::new(
                    Schema {
                        name: Some(name.as_str()),
                        node,
                    },
                    container.child(name),
                )
            })
            .collect()
    }

    fn body_schemas(&self, operation: &Located<Operation<'a>>) -> Vec<Located<&'a Value>> {
        let owners = self
            .body_parameters(operation)
            .into_iter()
            .chain(self.responses(operation).into_iter().map(|(_, r)| r));

        owners
            .filter_map(|owner| {
                let schema = owner.value.get("schema").filter(|s| s.is_object())?;
                Some(Located::new(schema, owner.pointer.child("schema")))
            })
            .collect()
    }

    fn responses_for(&self, operation: &Located<Operation<'a>>) -> Vec<Located<Response<'a>>> {
        self.responses(operation)
            .into_iter()
            .map(|(status, response)| {
                let headers: Vec<Header<'a>> = response
                    .value
                    .get("headers")
                    .and_then(Value::as_object)
                    .map(|headers| {
                        headers
                            .iter()
                            .map(|(name, node)| Header {
                                name,
                                type_: node.get("type").and_then(Value::as_str),
                                format: node.get("format").and_then(Value::as_str),
                                node,
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                Located::new(
                    Response {
                        status,
                        node: response.value,
                        schema: response.value.get("schema").filter(|s| s.is_object()),
                        headers,
                    },
                    response.pointer,
                )
            })
            .collect()
    }
}
