//! Read-only projections handed to downstream consumers.
//!
//! [`ContextExport`] is the bounded per-project view an agent receives, and
//! [`StoreSummary`] is the store-wide overview. Neither holds references into
//! the store.

use crate::{Objective, ObjectiveStatus, Priority, ProjectRecord, ProjectStatus, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// How many decisions a context export carries.
pub const RECENT_DECISIONS_LIMIT: usize = 10;

/// Context for one project. Serializes as `{}` when the project is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextExport {
    #[serde(flatten)]
    pub context: Option<ProjectContext>,
}

impl ContextExport {
    pub fn empty() -> Self {
        Self { context: None }
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_none()
    }
}

impl From<&ProjectRecord> for ContextExport {
    fn from(record: &ProjectRecord) -> Self {
        Self {
            context: Some(ProjectContext::from(record)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub project: ProjectBrief,
    pub recent_decisions: Vec<DecisionBrief>,
    pub pending_objectives: Vec<ObjectiveBrief>,
    pub statistics: ContextStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBrief {
    pub id: String,
    pub name: String,
    pub description: String,
    pub root_path: PathBuf,
    pub status: ProjectStatus,
    pub last_active: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBrief {
    pub decision: String,
    pub reasoning: String,
    pub timestamp: Timestamp,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBrief {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ObjectiveStatus,
    pub priority: Priority,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextStatistics {
    pub total_decisions: usize,
    pub total_objectives: usize,
    pub completed_objectives: usize,
    pub watch_directories: usize,
}

impl From<&Objective> for ObjectiveBrief {
    fn from(o: &Objective) -> Self {
        Self {
            id: o.id.clone(),
            title: o.title.clone(),
            description: o.description.clone(),
            status: o.status,
            priority: o.priority,
            created_at: o.created_at.clone(),
        }
    }
}

impl From<&ProjectRecord> for ProjectContext {
    fn from(record: &ProjectRecord) -> Self {
        let recent_decisions = record
            .recent_decisions(RECENT_DECISIONS_LIMIT)
            .into_iter()
            .map(|d| DecisionBrief {
                decision: d.decision.clone(),
                reasoning: d.reasoning.clone(),
                timestamp: d.timestamp.clone(),
                tags: d.tags.clone(),
            })
            .collect();

        Self {
            project: ProjectBrief {
                id: record.project_id.clone(),
                name: record.name.clone(),
                description: record.description.clone(),
                root_path: record.root_path.clone(),
                status: record.status,
                last_active: record.last_active.clone(),
            },
            recent_decisions,
            pending_objectives: record.pending_objectives().map(ObjectiveBrief::from).collect(),
            statistics: ContextStatistics {
                total_decisions: record.decisions.len(),
                total_objectives: record.objectives.len(),
                completed_objectives: record.completed_objective_count(),
                watch_directories: record.watch_dirs.len(),
            },
        }
    }
}

/// Store-wide overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub paused_projects: usize,
    pub archived_projects: usize,
    pub focused_project: Option<String>,
    pub projects: Vec<ProjectRow>,
}

/// One compact line per project in a [`StoreSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub last_active: Timestamp,
    pub objectives_pending: usize,
    pub total_decisions: usize,
}

impl From<&ProjectRecord> for ProjectRow {
    fn from(record: &ProjectRecord) -> Self {
        Self {
            id: record.project_id.clone(),
            name: record.name.clone(),
            status: record.status,
            last_active: record.last_active.clone(),
            objectives_pending: record.pending_objectives().count(),
            total_decisions: record.decisions.len(),
        }
    }
}

impl StoreSummary {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a ProjectRecord>,
        focused_project: Option<String>,
    ) -> Self {
        let mut summary = Self {
            total_projects: 0,
            active_projects: 0,
            paused_projects: 0,
            archived_projects: 0,
            focused_project,
            projects: Vec::new(),
        };

        for record in records {
            summary.total_projects += 1;
            match record.status {
                ProjectStatus::Active => summary.active_projects += 1,
                ProjectStatus::Paused => summary.paused_projects += 1,
                ProjectStatus::Archived => summary.archived_projects += 1,
            }
            summary.projects.push(ProjectRow::from(record));
        }

        summary
    }
}
