use crate::error::Result;
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

/// Load an API document (YAML or JSON) from a file
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Loaded document");
    parse_document(&content)
}

/// Parse document text into the tree the linter works on
pub fn parse_document(content: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_json(yaml))
}

/// Convert a YAML tree into a JSON tree, keeping mapping order.
/// Non-string keys are stringified (`200:` becomes `"200"`), tags are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_to_string(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
