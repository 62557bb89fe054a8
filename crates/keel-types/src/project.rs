//! Project records and lifecycle status.

use crate::{Decision, Objective, ParseTagError, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Extensions watched when a project does not specify its own.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] =
    &[".py", ".js", ".jsx", ".ts", ".tsx", ".md", ".json", ".yaml"];

pub fn default_file_extensions() -> BTreeSet<String> {
    DEFAULT_FILE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Paused,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "paused" => Ok(ProjectStatus::Paused),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(ParseTagError::new(
                "project status",
                s,
                "active, paused, archived",
            )),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub root_path: PathBuf,
    /// Directories to watch. `None` means just `root_path`.
    #[serde(default)]
    pub watch_dirs: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            watch_dirs: None,
            description: None,
        }
    }

    pub fn watch_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.watch_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A tracked project. Persisted as one JSON file per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// `proj_` followed by 12 hex characters. Never changes.
    pub project_id: String,
    pub name: String,
    pub root_path: PathBuf,
    pub watch_dirs: Vec<PathBuf>,
    pub status: ProjectStatus,
    pub created_at: Timestamp,
    /// Re-stamped on every mutation.
    pub last_active: Timestamp,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_file_extensions")]
    pub file_extensions: BTreeSet<String>,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ProjectRecord {
    /// Build a fresh active record, filling every default.
    pub fn new(project_id: String, input: NewProject, now: Timestamp) -> Self {
        let watch_dirs = input
            .watch_dirs
            .unwrap_or_else(|| vec![input.root_path.clone()]);

        Self {
            project_id,
            name: input.name,
            root_path: input.root_path,
            watch_dirs,
            status: ProjectStatus::Active,
            created_at: now.clone(),
            last_active: now,
            description: input.description.unwrap_or_default(),
            file_extensions: default_file_extensions(),
            decisions: Vec::new(),
            objectives: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.last_active = now;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ProjectStatus::Active)
    }

    pub fn objective_mut(&mut self, objective_id: &str) -> Option<&mut Objective> {
        self.objectives.iter_mut().find(|o| o.id == objective_id)
    }

    /// Objectives that are not yet completed.
    pub fn pending_objectives(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter().filter(|o| !o.status.is_completed())
    }

    pub fn completed_objective_count(&self) -> usize {
        self.objectives
            .iter()
            .filter(|o| o.status.is_completed())
            .count()
    }

    /// Decisions ordered newest first, at most `limit` of them.
    pub fn recent_decisions(&self, limit: usize) -> Vec<&Decision> {
        let mut decisions: Vec<&Decision> = self.decisions.iter().collect();
        decisions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        decisions.truncate(limit);
        decisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewDecision, NewObjective, ObjectiveStatus, Priority};
    use proptest::prelude::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::from(s)
    }

    fn sample_record() -> ProjectRecord {
        ProjectRecord::new(
            "proj_0123456789ab".into(),
            NewProject::new("Alpha", "/tmp/alpha"),
            ts("2024-01-01T00:00:00.000000Z"),
        )
    }

    #[test]
    fn test_new_fills_defaults() {
        let record = sample_record();
        assert_eq!(record.status, ProjectStatus::Active);
        assert_eq!(record.watch_dirs, vec![PathBuf::from("/tmp/alpha")]);
        assert_eq!(record.file_extensions.len(), DEFAULT_FILE_EXTENSIONS.len());
        assert!(record.file_extensions.contains(".tsx"));
        assert_eq!(record.created_at, record.last_active);
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_explicit_watch_dirs_kept_in_order() {
        let record = ProjectRecord::new(
            "proj_0123456789ab".into(),
            NewProject::new("Alpha", "/tmp/alpha").watch_dirs(["/tmp/alpha/src", "/tmp/alpha/docs"]),
            ts("2024-01-01T00:00:00.000000Z"),
        );
        assert_eq!(
            record.watch_dirs,
            vec![PathBuf::from("/tmp/alpha/src"), PathBuf::from("/tmp/alpha/docs")]
        );
    }

    #[test]
    fn test_status_serializes_as_lowercase_tag() {
        let mut record = sample_record();
        record.status = ProjectStatus::Archived;
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "archived");
        assert_eq!(value["root_path"], "/tmp/alpha");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Paused".parse::<ProjectStatus>().unwrap(), ProjectStatus::Paused);
        assert!("deleted".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_minimal_file_loads_with_defaults() {
        let json = r#"{
            "project_id": "proj_aaaaaaaaaaaa",
            "name": "Legacy",
            "root_path": "/srv/legacy",
            "watch_dirs": ["/srv/legacy"],
            "status": "paused",
            "created_at": "2024-03-01T10:00:00.000001",
            "last_active": "2024-03-02T10:00:00.000001"
        }"#;
        let record: ProjectRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, ProjectStatus::Paused);
        assert_eq!(record.file_extensions, default_file_extensions());
        assert!(record.decisions.is_empty());
        assert!(record.metadata.is_empty());
    }

    #[test]
    fn test_recent_decisions_newest_first() {
        let mut record = sample_record();
        for (i, stamp) in ["2024-01-03", "2024-01-01", "2024-01-02"].iter().enumerate() {
            record.decisions.push(Decision::new(
                format!("dec_0000000{}", i),
                NewDecision::new(format!("d{}", i), "r"),
                ts(stamp),
            ));
        }
        let recent: Vec<&str> = record.recent_decisions(2).iter().map(|d| d.decision.as_str()).collect();
        assert_eq!(recent, vec!["d0", "d2"]);
    }

    #[test]
    fn test_objective_counts() {
        let mut record = sample_record();
        record.objectives.push(Objective::new("obj_1".into(), NewObjective::new("a"), ts("t1")));
        record.objectives.push(Objective::new("obj_2".into(), NewObjective::new("b"), ts("t2")));
        record.objective_mut("obj_2").unwrap().complete(ts("t3"));
        assert_eq!(record.completed_objective_count(), 1);
        assert_eq!(record.pending_objectives().count(), 1);
        assert!(record.objective_mut("obj_9").is_none());
    }

    fn status_strategy() -> impl Strategy<Value = ProjectStatus> {
        prop_oneof![
            Just(ProjectStatus::Active),
            Just(ProjectStatus::Paused),
            Just(ProjectStatus::Archived),
        ]
    }

    fn objective_strategy() -> impl Strategy<Value = Objective> {
        (
            "[a-f0-9]{8}",
            ".*",
            prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)],
            any::<bool>(),
        )
            .prop_map(|(id, title, priority, done)| {
                let mut obj = Objective::new(
                    format!("obj_{}", id),
                    NewObjective::new(title).priority(priority),
                    ts("2024-01-01T00:00:00.000000Z"),
                );
                if done {
                    obj.complete(ts("2024-01-02T00:00:00.000000Z"));
                }
                obj
            })
    }

    proptest! {
        #[test]
        fn prop_record_json_roundtrip(
            name in ".*",
            description in ".*",
            status in status_strategy(),
            tags in proptest::collection::btree_set("[a-z]{1,8}", 0..4),
            objectives in proptest::collection::vec(objective_strategy(), 0..4),
            note in any::<i64>(),
        ) {
            let mut record = ProjectRecord::new(
                "proj_0123456789ab".into(),
                NewProject::new(name, "/tmp/p").description(description),
                ts("2024-01-01T00:00:00.000000Z"),
            );
            record.status = status;
            record.decisions.push(Decision::new(
                "dec_0a0b0c0d".into(),
                NewDecision::new("d", "r").with_tags(tags),
                ts("2024-01-01T00:00:01.000000Z"),
            ));
            record.objectives = objectives;
            record.metadata.insert("note".into(), serde_json::json!(note));

            let json = serde_json::to_string_pretty(&record).unwrap();
            let back: ProjectRecord = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, record);
        }
    }
}
