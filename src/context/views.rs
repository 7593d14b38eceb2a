//! Read-only views handed out by [`Context`](super::Context). Every view keeps
//! the node it was derived from so callers can check it against its pointer.

use crate::pointer::JsonPointer;
use serde_json::Value;
use std::fmt;

/// A value together with the place it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub value: T,
    pub pointer: JsonPointer,
}

impl<T> Located<T> {
    pub fn new(value: T, pointer: JsonPointer) -> Self {
        Self { value, pointer }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Located<U> {
        Located {
            value: f(self.value),
            pointer: self.pointer,
        }
    }
}

/// Schema family of the document behind a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// Swagger 2.0
    Swagger2,
    /// OpenAPI 3.x
    OpenApi3,
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::Swagger2 => write!(f, "Swagger 2.0"),
            SpecVersion::OpenApi3 => write!(f, "OpenAPI 3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathItem<'a> {
    pub path: &'a str,
    pub node: &'a Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operation<'a> {
    pub path: &'a str,
    /// Lower-case HTTP method as written in the document
    pub method: &'static str,
    pub node: &'a Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter<'a> {
    pub name: &'a str,
    /// The `in` field: query, path, header, cookie, body or formData
    pub location: &'a str,
    pub node: &'a Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub type_: Option<&'a str>,
    pub format: Option<&'a str>,
    pub node: &'a Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response<'a> {
    pub status: &'a str,
    pub node: &'a Value,
    /// Body schema; for OpenAPI 3 the `application/json` one if present, else the first
    pub schema: Option<&'a Value>,
    pub headers: Vec<Header<'a>>,
}

impl<'a> Response<'a> {
    pub fn header(&self, name: &str) -> Option<&Header<'a>> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
    }

    pub fn is_success(&self) -> bool {
        self.status.starts_with('2')
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema<'a> {
    /// Set for named definitions, `None` for inline body schemas
    pub name: Option<&'a str>,
    pub node: &'a Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeKind {
    OAuth2,
    ApiKey,
    Http,
    Basic,
    OpenIdConnect,
    MutualTls,
    Other(String),
}

impl SchemeKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "oauth2" => SchemeKind::OAuth2,
            "apiKey" => SchemeKind::ApiKey,
            "http" => SchemeKind::Http,
            "basic" => SchemeKind::Basic,
            "openIdConnect" => SchemeKind::OpenIdConnect,
            "mutualTLS" => SchemeKind::MutualTls,
            other => SchemeKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityScheme<'a> {
    pub name: &'a str,
    pub kind: SchemeKind,
    /// Declared OAuth2 scopes (all flows)
    pub scopes: Vec<&'a str>,
    pub node: &'a Value,
}

impl SecurityScheme<'_> {
    pub fn declares_scope(&self, scope: &str) -> bool {
        self.scopes.contains(&scope)
    }
}

/// One `scheme: [scopes]` entry of a security requirement object
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRequirement<'a> {
    pub scheme: &'a str,
    pub scopes: Vec<Located<&'a str>>,
    pub node: &'a Value,
}
