//! Project objectives and their completion lifecycle.

use crate::{ParseTagError, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Progress of an objective. Moves forward only, ending at `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ObjectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveStatus::Pending => "pending",
            ObjectiveStatus::InProgress => "in_progress",
            ObjectiveStatus::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            ObjectiveStatus::Completed => true,
            ObjectiveStatus::Pending | ObjectiveStatus::InProgress => false,
        }
    }
}

impl FromStr for ObjectiveStatus {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ObjectiveStatus::Pending),
            "in_progress" => Ok(ObjectiveStatus::InProgress),
            "completed" => Ok(ObjectiveStatus::Completed),
            _ => Err(ParseTagError::new(
                "objective status",
                s,
                "pending, in_progress, completed",
            )),
        }
    }
}

impl fmt::Display for ObjectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Objective priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseTagError::new("priority", s, "low, medium, high")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trackable goal within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// `obj_` followed by 8 hex characters.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub priority: Priority,
}

/// Input for adding an objective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewObjective {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

impl NewObjective {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl Objective {
    pub fn new(id: String, input: NewObjective, created_at: Timestamp) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            created_at,
            completed_at: None,
            status: ObjectiveStatus::Pending,
            priority: input.priority,
        }
    }

    /// Mark as completed at `now`.
    ///
    /// Returns `false` and leaves the objective untouched if it was already
    /// completed.
    pub fn complete(&mut self, now: Timestamp) -> bool {
        if self.status.is_completed() {
            return false;
        }
        self.status = ObjectiveStatus::Completed;
        self.completed_at = Some(now);
        true
    }
}
