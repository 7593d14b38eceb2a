use crate::pointer::JsonPointer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Guideline strength. Declared weakest first so `Must` is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Hint,
    May,
    Should,
    Must,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Must => write!(f, "MUST"),
            Severity::Should => write!(f, "SHOULD"),
            Severity::May => write!(f, "MAY"),
            Severity::Hint => write!(f, "HINT"),
        }
    }
}

/// What a check reports: a description and where it applies.
/// The engine turns each finding into a [`Violation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub description: String,
    pub pointer: JsonPointer,
}

impl Finding {
    pub fn new(description: impl Into<String>, pointer: JsonPointer) -> Self {
        Self {
            description: description.into(),
            pointer,
        }
    }

    /// Same location, different wording.
    pub fn reworded(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            pointer: self.pointer,
        }
    }
}

/// One reported guideline breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    rule_id: String,
    severity: Severity,
    description: String,
    pointer: JsonPointer,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        pointer: JsonPointer,
    ) -> Self {
        let description = description.into();
        debug_assert!(!description.is_empty(), "violation without description");
        Self {
            rule_id: rule_id.into(),
            severity,
            description,
            pointer,
        }
    }

    pub fn from_finding(rule_id: &str, severity: Severity, finding: Finding) -> Self {
        Self::new(rule_id, severity, finding.description, finding.pointer)
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity, self.rule_id, self.pointer, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Must > Severity::Should);
        assert!(Severity::Should > Severity::May);
        assert!(Severity::May > Severity::Hint);
    }

    #[test]
    fn test_violation_serializes_with_pointer_text() {
        let violation = Violation::new(
            "104",
            Severity::Must,
            "API has to be secured by OAuth2",
            JsonPointer::root().child("components").child("securitySchemes"),
        );

        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["ruleId"], "104");
        assert_eq!(json["severity"], "MUST");
        assert_eq!(json["pointer"], "/components/securitySchemes");
    }
}
