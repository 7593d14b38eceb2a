use crate::error::Result;
use crate::violation::{Severity, Violation};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

/// Final, ordered outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    /// Sort by severity (strongest first), pointer text, rule id, then
    /// description; drop entries equal in rule id, pointer and description.
    pub fn from_violations(mut violations: Vec<Violation>) -> Self {
        violations.sort_by_cached_key(|v| {
            (
                Reverse(v.severity()),
                v.pointer().to_string(),
                v.rule_id().to_string(),
                v.description().to_string(),
            )
        });

        let mut seen = HashSet::new();
        violations.retain(|v| {
            seen.insert((
                v.rule_id().to_string(),
                v.pointer().to_string(),
                v.description().to_string(),
            ))
        });

        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_must(&self) -> bool {
        self.violations.iter().any(|v| v.severity() == Severity::Must)
    }

    pub fn count_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.severity()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
