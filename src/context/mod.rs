//! Schema-family agnostic queries over a parsed API document.
//!
//! A [`Context`] is built once per run. Rules ask it for paths, operations,
//! parameters, schemas and security data without caring whether the document
//! is Swagger 2.0 or OpenAPI 3; each answer comes with the [`JsonPointer`] at
//! which it was found.

mod openapi;
mod swagger;
mod views;

pub use openapi::OpenApiContext;
pub use swagger::SwaggerContext;
pub use views::{
    Header, Located, Operation, Parameter, PathItem, Response, Schema, SchemeKind,
    SecurityRequirement, SecurityScheme, SpecVersion,
};

use crate::error::{LintError, Result};
use crate::pointer::JsonPointer;
use serde_json::Value;
use std::collections::HashSet;

pub(crate) const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Per-family half of the query surface.
trait Family<'a> {
    fn document(&self) -> &'a Value;
    fn security_schemes_pointer(&self) -> JsonPointer;
    fn security_schemes(&self) -> Vec<Located<SecurityScheme<'a>>>;
    fn named_schemas(&self) -> Vec<Located<Schema<'a>>>;
    fn body_schemas(&self, operation: &Located<Operation<'a>>) -> Vec<Located<&'a Value>>;
    fn responses_for(&self, operation: &Located<Operation<'a>>) -> Vec<Located<Response<'a>>>;
}

/// Parsed document, tagged by schema family
#[derive(Debug, Clone, Copy)]
pub enum Context<'a> {
    Swagger(SwaggerContext<'a>),
    OpenApi(OpenApiContext<'a>),
}

impl<'a> Context<'a> {
    /// Detect the schema family and check the top-level shape.
    pub fn new(document: &'a Value) -> Result<Self> {
        let root = document.as_object().ok_or_else(|| {
            LintError::MalformedDocument("document root is not a mapping".to_string())
        })?;

        let context = match (root.get("openapi"), root.get("swagger")) {
            (Some(v), _) if is_openapi_3(v) => Context::OpenApi(OpenApiContext::new(document)),
            (None, Some(v)) if is_swagger_2(v) => Context::Swagger(SwaggerContext::new(document)),
            (Some(v), _) => {
                return Err(LintError::MalformedDocument(format!(
                    "unsupported openapi version: {}",
                    v
                )));
            }
            (None, Some(v)) => {
                return Err(LintError::MalformedDocument(format!(
                    "unsupported swagger version: {}",
                    v
                )));
            }
            (None, None) => {
                return Err(LintError::MalformedDocument(
                    "neither an 'openapi' nor a 'swagger' version field is present".to_string(),
                ));
            }
        };

        let containers: &[&str] = match context {
            Context::OpenApi(_) => &["paths", "components"],
            Context::Swagger(_) => &["paths", "definitions", "securityDefinitions", "parameters"],
        };
        for key in containers {
            if let Some(value) = root.get(*key)
                && !value.is_object()
                && !value.is_null()
            {
                return Err(LintError::MalformedDocument(format!(
                    "'{}' must be a mapping",
                    key
                )));
            }
        }

        tracing::debug!(version = %context.version(), "Context built");
        Ok(context)
    }

    fn family(&self) -> &dyn Family<'a> {
        match self {
            Context::Swagger(swagger) => swagger,
            Context::OpenApi(openapi) => openapi,
        }
    }

    pub fn version(&self) -> SpecVersion {
        match self {
            Context::Swagger(_) => SpecVersion::Swagger2,
            Context::OpenApi(_) => SpecVersion::OpenApi3,
        }
    }

    pub fn is_openapi3(&self) -> bool {
        self.version() == SpecVersion::OpenApi3
    }

    /// The parsed tree every pointer resolves against
    pub fn document(&self) -> &'a Value {
        self.family().document()
    }

    pub fn resolve(&self, pointer: &JsonPointer) -> Option<&'a Value> {
        pointer.resolve(self.document())
    }

    pub fn paths(&self) -> Vec<Located<PathItem<'a>>> {
        let root = JsonPointer::root().child("paths");
        let Some(paths) = self.document().get("paths").and_then(Value::as_object) else {
            return vec![];
        };

        paths
            .iter()
            .filter(|(_, node)| node.is_object())
            .map(|(path, node)| Located::new(PathItem { path, node }, root.child(path)))
            .collect()
    }

    pub fn operations(&self) -> Vec<Located<Operation<'a>>> {
        let mut operations = vec![];
        for item in self.paths() {
            for method in HTTP_METHODS {
                if let Some(node) = item.value.node.get(method).filter(|n| n.is_object()) {
                    operations.push(Located::new(
                        Operation {
                            path: item.value.path,
                            method,
                            node,
                        },
                        item.pointer.child(method),
                    ));
                }
            }
        }
        operations
    }

    /// Path-level and operation-level parameters of `operation`; operation-level
    /// wins on the same name and location. Local `$ref`s are followed.
    pub fn parameters_for(&self, operation: &Located<Operation<'a>>) -> Vec<Located<Parameter<'a>>> {
        let path_item_pointer = JsonPointer::root().child("paths").child(operation.value.path);
        let path_level = path_item_pointer
            .resolve(self.document())
            .map(|item| self.parameter_list(item, &path_item_pointer))
            .unwrap_or_default();
        let operation_level = self.parameter_list(operation.value.node, &operation.pointer);

        let mut parameters: Vec<Located<Parameter<'a>>> = path_level
            .into_iter()
            .filter(|inherited| {
                !operation_level.iter().any(|own| {
                    own.value.name == inherited.value.name
                        && own.value.location == inherited.value.location
                })
            })
            .collect();
        parameters.extend(operation_level);
        parameters
    }

    fn parameter_list(&self, owner: &'a Value, owner_pointer: &JsonPointer) -> Vec<Located<Parameter<'a>>> {
        let Some(list) = owner.get("parameters").and_then(Value::as_array) else {
            return vec![];
        };

        list.iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let located = self.follow_ref(node, owner_pointer.child("parameters").child(index))?;
                let name = located.value.get("name")?.as_str()?;
                let location = located.value.get("in")?.as_str()?;
                Some(Located::new(
                    Parameter {
                        name,
                        location,
                        node: located.value,
                    },
                    located.pointer,
                ))
            })
            .collect()
    }

    /// Every query parameter used by some operation, each location reported once.
    pub fn query_parameters(&self) -> Vec<Located<Parameter<'a>>> {
        let mut seen = HashSet::new();
        self.operations()
            .iter()
            .flat_map(|operation| self.parameters_for(operation))
            .filter(|parameter| parameter.value.location == "query")
            .filter(|parameter| seen.insert(parameter.pointer.clone()))
            .collect()
    }

    /// Names of all query parameters, located at the parameter object.
    pub fn query_parameter_names(&self) -> Vec<Located<&'a str>> {
        self.query_parameters()
            .into_iter()
            .map(|parameter| parameter.map(|p| p.name))
            .collect()
    }

    pub fn responses_for(&self, operation: &Located<Operation<'a>>) -> Vec<Located<Response<'a>>> {
        self.family().responses_for(operation)
    }

    /// Named schema definitions followed by inline request/response schemas.
    pub fn schemas(&self) -> Vec<Located<Schema<'a>>> {
        let mut schemas = self.family().named_schemas();
        let mut seen: HashSet<JsonPointer> = schemas.iter().map(|s| s.pointer.clone()).collect();

        for operation in self.operations() {
            for body in self.family().body_schemas(&operation) {
                if seen.insert(body.pointer.clone()) {
                    schemas.push(body.map(|node| Schema { name: None, node }));
                }
            }
        }
        schemas
    }

    /// Every property name declared by any schema, located at `.../properties/<name>`.
    pub fn property_names(&self) -> Vec<Located<&'a str>> {
        let mut names = vec![];
        for schema in self.schemas() {
            collect_properties(schema.value.node, &schema.pointer, &mut names);
        }
        names
    }

    /// Pointer of the security scheme container, whether or not it exists.
    pub fn security_schemes_pointer(&self) -> JsonPointer {
        self.family().security_schemes_pointer()
    }

    pub fn security_schemes(&self) -> Vec<Located<SecurityScheme<'a>>> {
        self.family().security_schemes()
    }

    /// Requirements that apply to `operation`: its own `security` when present
    /// (even if empty), otherwise the document-level one.
    pub fn security_requirements_for(
        &self,
        operation: &Located<Operation<'a>>,
    ) -> Vec<Located<SecurityRequirement<'a>>> {
        let (list, pointer) = match operation.value.node.get("security") {
            Some(own) => (own, operation.pointer.child("security")),
            None => match self.document().get("security") {
                Some(global) => (global, JsonPointer::root().child("security")),
                None => return vec![],
            },
        };
        let Some(list) = list.as_array() else {
            return vec![];
        };

        let mut requirements = vec![];
        for (index, entry) in list.iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                continue;
            };
            for (scheme, node) in entry {
                let scheme_pointer = pointer.child(index).child(scheme);
                let scopes: Vec<Located<&'a str>> = node
                    .as_array()
                    .map(|scopes| {
                        scopes
                            .iter()
                            .enumerate()
                            .filter_map(|(i, scope)| {
                                scope
                                    .as_str()
                                    .map(|s| Located::new(s, scheme_pointer.child(i)))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                requirements.push(Located::new(
                    SecurityRequirement {
                        scheme,
                        scopes,
                        node,
                    },
                    scheme_pointer,
                ));
            }
        }
        requirements
    }

    /// Follow a local `$ref` (`#/...`) to its target; plain nodes are returned as-is.
    pub fn follow_ref(&self, node: &'a Value, pointer: JsonPointer) -> Option<Located<&'a Value>> {
        follow_ref(self.document(), node, pointer)
    }
}

/// Follow local `$ref`s until a plain node is reached. External, dangling
/// and cyclic references yield `None`.
pub(crate) fn follow_ref<'a>(
    document: &'a Value,
    node: &'a Value,
    pointer: JsonPointer,
) -> Option<Located<&'a Value>> {
    let mut current = Located::new(node, pointer);
    let mut visited = HashSet::new();

    while let Some(reference) = current.value.get("$ref").and_then(Value::as_str) {
        let Some(fragment) = reference.strip_prefix('#') else {
            tracing::debug!(reference, "Skipping external reference");
            return None;
        };
        if !visited.insert(fragment) {
            tracing::debug!(reference, "Skipping cyclic reference");
            return None;
        }
        let Some(target) = fragment.parse::<JsonPointer>().ok() else {
            tracing::debug!(reference, "Skipping malformed reference");
            return None;
        };
        let Some(resolved) = target.resolve(document) else {
            tracing::debug!(reference, "Skipping dangling reference");
            return None;
        };
        current = Located::new(resolved, target);
    }
    Some(current)
}

/// `3.x` as a string, or an unquoted YAML number such as `3.0`
fn is_openapi_3(version: &Value) -> bool {
    match version {
        Value::String(v) => v.starts_with("3."),
        Value::Number(n) => n.as_f64().is_some_and(|v| v.trunc() == 3.0),
        _ => false,
    }
}

fn is_swagger_2(version: &Value) -> bool {
    match version {
        Value::String(v) => v == "2.0",
        Value::Number(n) => n.as_f64() == Some(2.0),
        _ => false,
    }
}

/// Walk a schema collecting property names; `$ref` nodes are not followed.
fn collect_properties<'a>(node: &'a Value, pointer: &JsonPointer, out: &mut Vec<Located<&'a str>>) {
    if !node.is_object() || node.get("$ref").is_some() {
        return;
    }

    if let Some(properties) = node.get("properties").and_then(Value::as_object) {
        let properties_pointer = pointer.child("properties");
        for (name, property) in properties {
            let property_pointer = properties_pointer.child(name);
            out.push(Located::new(name.as_str(), property_pointer.clone()));
            collect_properties(property, &property_pointer, out);
        }
    }

    match node.get("items") {
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                collect_properties(item, &pointer.child("items").child(index), out);
            }
        }
        Some(items) => collect_properties(items, &pointer.child("items"), out),
        None => {}
    }

    for combinator in ["allOf", "anyOf", "oneOf"] {
        if let Some(parts) = node.get(combinator).and_then(Value::as_array) {
            for (index, part) in parts.iter().enumerate() {
                collect_properties(part, &pointer.child(combinator).child(index), out);
            }
        }
    }

    if let Some(additional) = node.get("additionalProperties").filter(|v| v.is_object()) {
        collect_properties(additional, &pointer.child("additionalProperties"), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;

    fn document(yaml: &str) -> Value {
        parse_document(yaml).unwrap()
    }

    /// Every located node must be exactly what its pointer resolves to.
    fn assert_faithful<T>(doc: &Value, items: &[Located<T>], node: impl Fn(&T) -> &Value) {
        for item in items {
            let resolved = doc.pointer(&item.pointer.to_string());
            assert_eq!(resolved, Some(node(&item.value)), "pointer {}", item.pointer);
        }
    }

    const OPENAPI: &str = r#"
openapi: 3.0.1
security:
  - oauth2: [read]
paths:
  /article:
    parameters:
      - name: tenant
        in: query
      - name: limit
        in: query
    get:
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
        - $ref: '#/components/parameters/Sort'
        - name: id
          in: header
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  items:
                    type: array
                    items:
                      $ref: '#/components/schemas/article'
    post:
      security:
        - oauth2:
            - write
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/article'
      responses:
        '201':
          description: created
components:
  parameters:
    Sort:
      name: sort_by
      in: query
  schemas:
    article:
      properties:
        title:
          type: string
        author:
          allOf:
            - properties:
                first_name:
                  type: string
  securitySchemes:
    oauth2:
      type: oauth2
      flows:
        clientCredentials:
          tokenUrl: https://example.com/token
          scopes:
            read: read
        authorizationCode:
          authorizationUrl: https://example.com/auth
          tokenUrl: https://example.com/token
          scopes:
            read: read
            write: write
    key:
      type: apiKey
      in: header
      name: X-Key
"#;

    #[test]
    fn test_detects_versions() {
        let doc = document("openapi: 3.1.0\n");
        assert_eq!(Context::new(&doc).unwrap().version(), SpecVersion::OpenApi3);

        let doc = document("swagger: '2.0'\n");
        assert_eq!(Context::new(&doc).unwrap().version(), SpecVersion::Swagger2);

        let doc = document("swagger: 2.0\n");
        assert_eq!(Context::new(&doc).unwrap().version(), SpecVersion::Swagger2);

        for yaml in ["openapi: 3.0\n", "openapi: 3.1\n"] {
            let doc = document(yaml);
            assert_eq!(Context::new(&doc).unwrap().version(), SpecVersion::OpenApi3, "{}", yaml);
        }
    }

    #[test]
    fn test_rejects_malformed_documents() {
        for yaml in [
            "- just\n- a list\n",
            "info:\n  title: nothing\n",
            "openapi: 2.5.0\n",
            "openapi: 2.5\n",
            "swagger: '1.2'\n",
            "openapi: 3.0.0\npaths: [a, b]\n",
            "swagger: '2.0'\ndefinitions: 42\n",
        ] {
            let doc = document(yaml);
            assert!(
                matches!(Context::new(&doc), Err(LintError::MalformedDocument(_))),
                "accepted: {}",
                yaml
            );
        }
    }

    #[test]
    fn test_operations_in_method_order() {
        let doc = document(OPENAPI);
        let ctx = Context::new(&doc).unwrap();
        let operations = ctx.operations();

        let methods: Vec<&str> = operations.iter().map(|o| o.value.method).collect();
        assert_eq!(methods, vec!["get", "post"]);
        assert_eq!(operations[0].pointer.to_string(), "/paths/~1article/get");
        assert_faithful(&doc, &operations, |o| o.node);
    }

    #[test]
    fn test_parameters_merge_and_resolve_refs() {
        let doc = document(OPENAPI);
        let ctx = Context::new(&doc).unwrap();
        let get = &ctx.operations()[0];
        let parameters = ctx.parameters_for(get);

        let names: Vec<&str> = parameters.iter().map(|p| p.value.name).collect();
        assert_eq!(names, vec!["tenant", "limit", "sort_by", "id"]);
        assert_eq!(parameters[1].pointer.to_string(), "/paths/~1article/get/parameters/0");
        assert_eq!(parameters[2].pointer.to_string(), "/components/parameters/Sort");
        assert_faithful(&doc, &parameters, |p| p.node);
    }

    #[test]
    fn test_query_parameter_names_are_reported_once() {
        let doc = document(OPENAPI);
        let ctx = Context::new(&doc).unwrap();
        let names: Vec<String> = ctx
            .query_parameter_names()
            .iter()
            .map(|n| format!("{}@{}", n.value, n.pointer))
            .collect();

        assert_eq!(
            names,
            vec![
                "tenant@/paths/~1article/parameters/0",
                "limit@/paths/~1article/get/parameters/0",
                "sort_by@/components/parameters/Sort",
                "limit@/paths/~1article/parameters/1",
            ]
        );
    }

    #[test]
    fn test_property_names_walk_nested_schemas() {
        let doc = document(OPENAPI);
        let ctx = Context::new(&doc).unwrap();
        let names = ctx.property_names();

        let rendered: Vec<String> = names.iter().map(|n| n.pointer.to_string()).collect();
        assert!(rendered.contains(&"/components/schemas/article/properties/title".to_string()));
        assert!(rendered.contains(
            &"/components/schemas/article/properties/author/allOf/0/properties/first_name"
                .to_string()
        ));
        assert!(rendered.contains(
            &"/paths/~1article/get/responses/200/content/application~1json/schema/properties/items"
                .to_string()
        ));

        for name in &names {
            assert!(doc.pointer(&name.pointer.to_string()).is_some());
            assert_eq!(
                name.pointer.last(),
                Some(&crate::pointer::Token::Name(name.value.to_string()))
            );
        }
    }

    #[test]
    fn test_security_schemes_union_flow_scopes() {
        let doc = document(OPENAPI);
        let ctx = Context::new(&doc).unwrap();
        let schemes = ctx.security_schemes();

        assert_eq!(schemes.len(), 2);
        assert_eq!(schemes[0].value.kind, SchemeKind::OAuth2);
        assert_eq!(schemes[0].value.scopes, vec!["read", "write"]);
        assert_eq!(schemes[1].value.kind, SchemeKind::ApiKey);
        assert_eq!(ctx.security_schemes_pointer().to_string(), "/components/securitySchemes");
        assert_faithful(&doc, &schemes, |s| s.node);
    }

    #[test]
    fn test_operation_security_overrides_document_security() {
        let doc = document(OPENAPI);
        let ctx = Context::new(&doc).unwrap();
        let operations = ctx.operations();

        let inherited = ctx.security_requirements_for(&operations[0]);
        assert_eq!(inherited.len(), 1);
        assert_eq!(inherited[0].pointer.to_string(), "/security/0/oauth2");
        assert_eq!(inherited[0].value.scopes[0].value, "read");

        let own = ctx.security_requirements_for(&operations[1]);
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].value.scopes.len(), 1);
        assert_eq!(own[0].value.scopes[0].value, "write");
        assert_eq!(
            own[0].value.scopes[0].pointer.to_string(),
            "/paths/~1article/post/security/0/oauth2/0"
        );
        assert_faithful(&doc, &own, |r| r.node);
    }

    #[test]
    fn test_empty_operation_security_disables_inheritance() {
        let doc = document(
            r#"
openapi: 3.0.1
security:
  - oauth2: [read]
paths:
  /health:
    get:
      security: []
"#,
        );
        let ctx = Context::new(&doc).unwrap();
        let operation = &ctx.operations()[0];
        assert!(ctx.security_requirements_for(operation).is_empty());
    }

    #[test]
    fn test_follow_ref_chains_and_cycles() {
        let doc = document(
            r#"
openapi: 3.0.1
paths:
  /items:
    get:
      parameters:
        - $ref: '#/components/parameters/Alias'
        - $ref: '#/components/parameters/Loop'
        - $ref: '#/components/parameters/Missing'
components:
  parameters:
    Alias:
      $ref: '#/components/parameters/PageSize'
    PageSize:
      name: page_size
      in: query
    Loop:
      $ref: '#/components/parameters/Loop'
"#,
        );
        let ctx = Context::new(&doc).unwrap();

        let names = ctx.query_parameter_names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].value, "page_size");
        assert_eq!(names[0].pointer.to_string(), "/components/parameters/PageSize");

        let looping = &doc["components"]["parameters"]["Loop"];
        assert!(ctx.follow_ref(looping, JsonPointer::root()).is_none());
    }

    #[test]
    fn test_empty_document_yields_empty_views() {
        let doc = document("openapi: 3.0.1\n");
        let ctx = Context::new(&doc).unwrap();

        assert!(ctx.paths().is_empty());
        assert!(ctx.operations().is_empty());
        assert!(ctx.schemas().is_empty());
        assert!(ctx.property_names().is_empty());
        assert!(ctx.security_schemes().is_empty());
        assert!(ctx.query_parameter_names().is_empty());
    }
}
