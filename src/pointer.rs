//! Structural locations inside a parsed document, rendered as JSON Pointers
//! (RFC 6901), e.g. `/paths/~1article/post/security/0/oauth2/0`.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One step of a [`JsonPointer`].
///
/// Tokens compare by their unescaped segment text, so `Name("0")` and
/// `Index(0)` are the same step.
#[derive(Debug, Clone)]
pub enum Token {
    Name(String),
    Index(usize),
}

impl Token {
    /// Unescaped segment text
    pub fn segment(&self) -> Cow<'_, str> {
        match self {
            Token::Name(name) => Cow::Borrowed(name),
            Token::Index(index) => Cow::Owned(index.to_string()),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Index(a), Token::Index(b)) => a == b,
            _ => self.segment() == other.segment(),
        }
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segment().hash(state);
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segment().cmp(&other.segment())
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Token::Name(name.to_string())
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Token::Name(name)
    }
}

impl From<&String> for Token {
    fn from(name: &String) -> Self {
        Token::Name(name.clone())
    }
}

impl From<usize> for Token {
    fn from(index: usize) -> Self {
        Token::Index(index)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => f.write_str(&name.replace('~', "~0").replace('/', "~1")),
            Token::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Immutable path from the document root to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPointer {
    tokens: Vec<Token>,
}

impl JsonPointer {
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new pointer with `token` appended; `self` is left untouched.
    pub fn child(&self, token: impl Into<Token>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The last token, if any.
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Walk `document` along this pointer.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.tokens
            .iter()
            .try_fold(document, |node, token| match (node, token) {
                (Value::Object(map), Token::Name(name)) => map.get(name),
                (Value::Object(map), Token::Index(index)) => map.get(&index.to_string()),
                (Value::Array(items), Token::Index(index)) => items.get(*index),
                (Value::Array(items), Token::Name(name)) => {
                    name.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            })
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = crate::LintError;

    /// Parses the textual form. Purely numeric segments become indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let rest = s.strip_prefix('/').ok_or_else(|| {
            crate::LintError::Configuration(format!("JSON pointer must start with '/': {}", s))
        })?;

        let tokens = rest
            .split('/')
            .map(|segment| {
                let name = segment.replace("~1", "/").replace("~0", "~");
                match name.parse::<usize>() {
                    Ok(index) if index.to_string() == name => Token::Index(index),
                    _ => Token::Name(name),
                }
            })
            .collect();

        Ok(Self { tokens })
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(JsonPointer::root().to_string(), "");
        assert!(JsonPointer::root().is_root());
    }

    #[test]
    fn test_child_escapes_separators() {
        let pointer = JsonPointer::root()
            .child("paths")
            .child("/article")
            .child("post")
            .child("security")
            .child(0)
            .child("oauth2")
            .child(0);

        assert_eq!(pointer.to_string(), "/paths/~1article/post/security/0/oauth2/0");
        assert_eq!(JsonPointer::root().child("a~b").to_string(), "/a~0b");
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = JsonPointer::root().child("components");
        let _child = parent.child("schemas");
        assert_eq!(parent.to_string(), "/components");
    }

    #[test]
    fn test_parse_unescapes() {
        let pointer: JsonPointer = "/paths/~1a~0b/get".parse().unwrap();
        assert_eq!(pointer, JsonPointer::root().child("paths").child("/a~b").child("get"));
        assert!("paths".parse::<JsonPointer>().is_err());
    }

    #[test]
    fn test_resolve_matches_serde_json() {
        let document = json!({
            "paths": {"/article": {"get": {"parameters": [{"name": "q", "in": "query"}]}}},
            "responses": {"200": {"description": "ok"}}
        });

        let param = JsonPointer::root()
            .child("paths")
            .child("/article")
            .child("get")
            .child("parameters")
            .child(0);
        assert_eq!(param.resolve(&document), document.pointer(&param.to_string()));
        assert_eq!(param.resolve(&document).unwrap()["name"], "q");

        let numeric_key: JsonPointer = "/responses/200".parse().unwrap();
        assert_eq!(numeric_key.resolve(&document).unwrap()["description"], "ok");

        let missing = JsonPointer::root().child("components");
        assert!(missing.resolve(&document).is_none());
    }

    #[test]
    fn test_equality_follows_rendered_path() {
        use std::collections::HashSet;

        let by_index = JsonPointer::root().child("parameters").child(0);
        let by_name = JsonPointer::root().child("parameters").child("0");
        assert_eq!(by_index, by_name);
        assert_eq!(by_index.to_string(), by_name.to_string());

        let mut seen = HashSet::new();
        assert!(seen.insert(by_index));
        assert!(!seen.insert(by_name));

        assert_ne!(
            JsonPointer::root().child("00"),
            JsonPointer::root().child(0)
        );
    }
}
