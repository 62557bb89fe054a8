//! Architectural decisions logged against a project.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An architectural decision. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// `dec_` followed by 8 hex characters.
    pub id: String,
    pub decision: String,
    pub reasoning: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Input for recording a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDecision {
    pub decision: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl NewDecision {
    pub fn new(decision: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            decision: decision.into(),
            reasoning: reasoning.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Decision {
    pub fn new(id: String, input: NewDecision, timestamp: Timestamp) -> Self {
        Self {
            id,
            decision: input.decision,
            reasoning: input.reasoning,
            timestamp,
            tags: input.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_default_to_empty() {
        let json = r#"{"id":"dec_0011aabb","decision":"Use JWT","reasoning":"stateless","timestamp":"2024-01-01T00:00:00"}"#;
        let decision: Decision = serde_json::from_str(json).unwrap();
        assert!(decision.tags.is_empty());
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let input = NewDecision::new("Use JWT", "stateless").with_tags(["auth", "security", "auth"]);
        assert_eq!(input.tags.len(), 2);
    }
}
