use super::views::{Header, Located, Operation, Response, Schema, SchemeKind, SecurityScheme};
use super::{Family, follow_ref};
use crate::pointer::JsonPointer;
use serde_json::{Map, Value};

/// OpenAPI 3.x document
#[derive(Debug, Clone, Copy)]
pub struct OpenApiContext<'a> {
    document: &'a Value,
}

impl<'a> OpenApiContext<'a> {
    pub(super) fn new(document: &'a Value) -> Self {
        Self { document }
    }

    fn components_pointer() -> JsonPointer {
        JsonPointer::root().child("components")
    }

    fn component(&self, kind: &str) -> Option<&'a Map<String, Value>> {
        self.document
            .get("components")
            .and_then(|c| c.get(kind))
            .and_then(Value::as_object)
    }

    /// `content/<media>/schema` entries of a request body or response.
    fn content_schemas(
        owner: &'a Value,
        owner_pointer: &JsonPointer,
    ) -> Vec<(&'a str, Located<&'a Value>)> {
        let Some(content) = owner.get("content").and_then(Value::as_object) else {
            return vec![];
        };
        content
            .iter()
            .filter_map(|(media, media_type)| {
                let schema = media_type.get("schema").filter(|s| s.is_object())?;
                Some((
                    media.as_str(),
                    Located::new(
                        schema,
                        owner_pointer.child("content").child(media).child("schema"),
                    ),
                ))
            })
            .collect()
    }

    fn response_list(&self, operation: &Located<Operation<'a>>) -> Vec<(&'a str, Located<&'a Value>)> {
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
}

impl<'a> Family<'a> for OpenApiContext<'a> {
    fn document(&self) -> &'a Value {
        self.document
    }

    fn security_schemes_pointer(&self) -> JsonPointer {
        Self::components_pointer().child("securitySchemes")
    }

    fn security_schemes(&self) -> Vec<Located<SecurityScheme<'a>>> {
        let Some(schemes) = self.component("securitySchemes") else {
            return vec![];
        };
        let container = self.security_schemes_pointer();

        schemes
            .iter()
            .filter_map(|(name, node)| {
                let located = follow_ref(self.document, node, container.child(name))?;
                let kind = located.value.get("type").and_then(Value::as_str)?;

                let mut scopes: Vec<&'a str> = vec![];
                if let Some(flows) = located.value.get("flows").and_then(Value::as_object) {
                    for flow in flows.values() {
                        let declared = flow.get("scopes").and_then(Value::as_object);
                        for scope in declared.into_iter().flat_map(|s| s.keys()) {
                            if !scopes.contains(&scope.as_str()) {
                                scopes.push(scope);
                            }
                        }
                    }
                }

                Some(Located::new(
                    SecurityScheme {
                        name,
                        kind: SchemeKind::parse(kind),
                        scopes,
                        node: located.value,
                    },
                    located.pointer,
                ))
            })
            .collect()
    }

    fn named_schemas(&self) -> Vec<Located<Schema<'a>>> {
        let Some(schemas) = self.component("schemas") else {
            return vec![];
        };
        let container = Self::components_pointer().child("schemas");
        schemas
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
        let mut schemas = vec![];

        if let Some(body) = operation.value.node.get("requestBody")
            && let Some(body) = follow_ref(self.document, body, operation.pointer.child("requestBody"))
        {
            schemas.extend(
                Self::content_schemas(body.value, &body.pointer)
                    .into_iter()
                    .map(|(_, schema)| schema),
            );
        }

        for (_, response) in self.response_list(operation) {
            schemas.extend(
                Self::content_schemas(response.value, &response.pointer)
                    .into_iter()
                    .map(|(_, schema)| schema),
            );
        }
        schemas
    }

    fn responses_for(&self, operation: &Located<Operation<'a>>) -> Vec<Located<Response<'a>>> {
        self.response_list(operation)
            .into_iter()
            .map(|(status, response)| {
                let bodies = Self::content_schemas(response.value, &response.pointer);
                let schema = bodies
                    .iter()
                    .find(|(media, _)| *media == "application/json")
                    .or_else(|| bodies.first())
                    .map(|(_, body)| body.value);

                let headers_pointer = response.pointer.child("headers");
                let headers: Vec<Header<'a>> = response
                    .value
                    .get("headers")
                    .and_then(Value::as_object)
                    .map(|headers| {
                        headers
                            .iter()
                            .filter_map(|(name, node)| {
                                let header = follow_ref(self.document, node, headers_pointer.child(name))?;
                                let schema = header.value.get("schema");
                                Some(Header {
                                    name,
                                    type_: schema.and_then(|s| s.get("type")).and_then(Value::as_str),
                                    format: schema.and_then(|s| s.get("format")).and_then(Value::as_str),
                                    node: header.value,
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                Located::new(
                    Response {
                        status,
                        node: response.value,
                        schema,
                        headers,
                    },
                    response.pointer,
                )
            })
            .collect()
    }
}
