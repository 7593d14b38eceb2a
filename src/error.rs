use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Duplicate rule id '{id}' in rule set '{rule_set}'")]
    DuplicateRule { rule_set: String, id: String },

    #[error("Rule '{rule_id}' failed: {message}")]
    RuleExecution { rule_id: String, message: String },

    #[error("Validation exceeded its budget of {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LintError>;
