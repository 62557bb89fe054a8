//! The project store: an in-memory cache over [`RecordFiles`].
//!
//! Every record lives in two places: the cache map used for reads, and its
//! JSON file, which is authoritative. Every mutating call updates the cache
//! and then writes the full record through to its file before returning. If
//! the write fails, the error is returned and the cache stays ahead of disk
//! until a later successful save of the same record.

use crate::{
    normalize_path, path_within, Clock, IdSource, KeelError, RandomIds, RecordFiles, Result,
    SystemClock,
};
use keel_types::{
    ContextExport, Decision, NewDecision, NewObjective, NewProject, Objective, ProjectRecord,
    ProjectStatus, StoreSummary,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const PROJECT_ID_HEX: usize = 12;
const ENTRY_ID_HEX: usize = 8;

/// Name given to the project created from legacy watch directories.
const LEGACY_PROJECT_NAME: &str = "Legacy Import";

/// `~/.keel/projects`, or `./.keel/projects` when there is no home directory.
pub fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".keel")
        .join("projects")
}

/// Collaborators the store draws timestamps and ids from.
#[derive(Clone)]
pub struct StoreOptions {
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdSource>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIds),
        }
    }
}

/// Owns every project record and the focused-project pointer.
///
/// Not internally synchronized: mutations take `&mut self`, and a host that
/// shares the store across threads wraps it in a mutex.
pub struct ProjectStore {
    files: RecordFiles,
    projects: BTreeMap<String, ProjectRecord>,
    focused: Option<String>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
}

impl ProjectStore {
    /// Open the store at `dir` with the system clock and random ids.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(dir, StoreOptions::default())
    }

    /// Open the store at `dir`, creating the directory if needed, and load
    /// every record file in it.
    ///
    /// Files that cannot be read or parsed are logged and skipped. If at
    /// least one active project loaded, the first one becomes focused.
    pub fn open_with(dir: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let files = RecordFiles::open(dir)?;

        let mut projects = BTreeMap::new();
        for record in files.load_all()? {
            if let Some(previous) = projects.insert(record.project_id.clone(), record) {
                warn!(
                    target: "keel::load",
                    "Duplicate project id {} in {:?}, keeping the later file",
                    previous.project_id,
                    files.dir()
                );
            }
        }

        let focused = projects
            .values()
            .find(|p| p.is_active())
            .map(|p| p.project_id.clone());

        let store = Self {
            files,
            projects,
            focused,
            clock: options.clock,
            ids: options.ids,
        };

        info!(
            target: "keel::store",
            "Opened project store at {:?} ({} projects)",
            store.files.dir(),
            store.projects.len()
        );

        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        self.files.dir()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn fresh_id(&self, prefix: &str, len: usize, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = format!("{}_{}", prefix, self.ids.hex(len));
            if !taken(&id) {
                return id;
            }
            warn!(target: "keel::store", "Generated id {} already in use, retrying", id);
        }
    }

    fn not_found(project_id: &str) -> KeelError {
        KeelError::ProjectNotFound(project_id.to_string())
    }

    /// Apply `f` to a record, re-stamp it and write it through.
    fn mutate<T>(
        &mut self,
        project_id: &str,
        f: impl FnOnce(&mut ProjectRecord) -> T,
    ) -> Result<T> {
        let now = self.clock.now();
        let record = self
            .projects
            .get_mut(project_id)
            .ok_or_else(|| Self::not_found(project_id))?;
        let out = f(record);
        record.touch(now);
        self.files.write(record)?;
        Ok(out)
    }

    /// Create and persist a new active project.
    ///
    /// `root_path` and the watch directories are made absolute. The first
    /// project in an empty store becomes focused. A record that cannot be
    /// serialized is rejected without touching the cache; a failed write
    /// leaves it cached (and focused, if first) ahead of disk.
    pub fn create(&mut self, input: NewProject) -> Result<ProjectRecord> {
        let project_id = self.fresh_id("proj", PROJECT_ID_HEX, |id| {
            self.projects.contains_key(id) || self.files.path_for(id).exists()
        });

        let input = NewProject {
            root_path: normalize_path(&input.root_path),
            watch_dirs: input
                .watch_dirs
                .map(|dirs| dirs.iter().map(|d| normalize_path(d)).collect()),
            ..input
        };

        let record = ProjectRecord::new(project_id.clone(), input, self.clock.now());
        // A record that cannot be encoded never enters the cache
        let content = RecordFiles::encode(&record)?;

        self.projects.insert(project_id.clone(), record.clone());
        if self.projects.len() == 1 {
            self.focused = Some(project_id.clone());
        }
        self.files.write_encoded(&record, content)?;

        info!(target: "keel::store", "Created project: {} ({})", record.name, project_id);
        Ok(record)
    }

    pub fn get(&self, project_id: &str) -> Option<&ProjectRecord> {
        self.projects.get(project_id)
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// The focused project, if one is set and still present.
    pub fn get_focused(&self) -> Option<&ProjectRecord> {
        self.focused.as_deref().and_then(|id| self.projects.get(id))
    }

    /// Focus `project_id`. An unknown id leaves the current focus unchanged.
    pub fn set_focus(&mut self, project_id: &str) -> Result<()> {
        if !self.projects.contains_key(project_id) {
            return Err(Self::not_found(project_id));
        }
        self.focused = Some(project_id.to_string());
        let name = self.mutate(project_id, |p| p.name.clone())?;
        info!(target: "keel::store", "Focused on project: {}", name);
        Ok(())
    }

    pub fn update_status(&mut self, project_id: &str, status: ProjectStatus) -> Result<()> {
        let name = self.mutate(project_id, |p| {
            p.status = status;
            p.name.clone()
        })?;
        info!(target: "keel::store", "Updated project {} status to: {}", name, status);
        Ok(())
    }

    pub fn pause(&mut self, project_id: &str) -> Result<()> {
        self.update_status(project_id, ProjectStatus::Paused)
    }

    pub fn resume(&mut self, project_id: &str) -> Result<()> {
        self.update_status(project_id, ProjectStatus::Active)
    }

    pub fn archive(&mut self, project_id: &str) -> Result<()> {
        self.update_status(project_id, ProjectStatus::Archived)
    }

    /// Append a decision to a project and return it.
    pub fn add_decision(&mut self, project_id: &str, input: NewDecision) -> Result<Decision> {
        let record = self
            .projects
            .get(project_id)
            .ok_or_else(|| Self::not_found(project_id))?;
        let id = self.fresh_id("dec", ENTRY_ID_HEX, |id| {
            record.decisions.iter().any(|d| d.id == id)
        });

        let decision = Decision::new(id, input, self.clock.now());
        let name = self.mutate(project_id, |p| {
            p.decisions.push(decision.clone());
            p.name.clone()
        })?;

        info!(
            target: "keel::store",
            "Added decision to project {}: {}", name, decision.decision
        );
        Ok(decision)
    }

    /// Append a decision to the focused project.
    pub fn add_decision_to_focused(&mut self, input: NewDecision) -> Result<Decision> {
        let project_id = self
            .get_focused()
            .map(|p| p.project_id.clone())
            .ok_or(KeelError::NoFocusedProject)?;
        self.add_decision(&project_id, input)
    }

    /// Append a pending objective to a project and return it.
    pub fn add_objective(&mut self, project_id: &str, input: NewObjective) -> Result<Objective> {
        let record = self
            .projects
            .get(project_id)
            .ok_or_else(|| Self::not_found(project_id))?;
        let id = self.fresh_id("obj", ENTRY_ID_HEX, |id| {
            record.objectives.iter().any(|o| o.id == id)
        });

        let objective = Objective::new(id, input, self.clock.now());
        let name = self.mutate(project_id, |p| {
            p.objectives.push(objective.clone());
            p.name.clone()
        })?;

        info!(
            target: "keel::store",
            "Added objective to project {}: {}", name, objective.title
        );
        Ok(objective)
    }

    /// Mark an objective completed.
    ///
    /// Completing an objective that is already completed succeeds without
    /// touching the record or its file.
    pub fn complete_objective(&mut self, project_id: &str, objective_id: &str) -> Result<()> {
        let now = self.clock.now();
        let record = self
            .projects
            .get_mut(project_id)
            .ok_or_else(|| Self::not_found(project_id))?;
        let objective =
            record
                .objective_mut(objective_id)
                .ok_or_else(|| KeelError::ObjectiveNotFound {
                    project_id: project_id.to_string(),
                    objective_id: objective_id.to_string(),
                })?;

        let title = objective.title.clone();
        if !objective.complete(now.clone()) {
            info!(
                target: "keel::store",
                "Objective {} in project {} was already completed", objective_id, record.name
            );
            return Ok(());
        }

        record.touch(now);
        self.files.write(record)?;

        info!(
            target: "keel::store",
            "Completed objective in project {}: {}", record.name, title
        );
        Ok(())
    }

    /// All projects, in id order.
    pub fn list(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.projects.values()
    }

    pub fn list_active(&self) -> Vec<&ProjectRecord> {
        self.projects.values().filter(|p| p.is_active()).collect()
    }

    /// Union of the watch directories of every active project.
    pub fn all_watch_dirs(&self) -> BTreeSet<PathBuf> {
        self.list_active()
            .into_iter()
            .flat_map(|p| p.watch_dirs.iter().cloned())
            .collect()
    }

    /// The first active project watching a directory that contains `path`.
    pub fn project_for_path(&self, path: &Path) -> Option<&ProjectRecord> {
        let path = normalize_path(path);
        self.list_active()
            .into_iter()
            .find(|p| p.watch_dirs.iter().any(|dir| path_within(&path, dir)))
    }

    /// Bounded context for one project; empty if the id is unknown.
    pub fn export_context(&self, project_id: &str) -> ContextExport {
        self.projects
            .get(project_id)
            .map(ContextExport::from)
            .unwrap_or_else(ContextExport::empty)
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary::from_records(self.projects.values(), self.focused.clone())
    }

    /// Seed an empty store with a project covering `legacy_dirs`.
    ///
    /// Only directories that exist are used. The project is rooted at the
    /// parent of the first of them. Does nothing if the store already has
    /// projects or none of the directories exist.
    pub fn import_legacy(&mut self, legacy_dirs: &[PathBuf]) -> Result<Option<ProjectRecord>> {
        if !self.projects.is_empty() {
            return Ok(None);
        }

        let existing: Vec<PathBuf> = legacy_dirs
            .iter()
            .filter(|d| d.exists())
            .map(|d| normalize_path(d))
            .collect();
        let Some(first) = existing.first() else {
            return Ok(None);
        };

        info!(target: "keel::store", "Importing legacy watch directories as a project...");
        let root = first.parent().unwrap_or(first.as_path()).to_path_buf();
        let record = self.create(
            NewProject::new(LEGACY_PROJECT_NAME, root)
                .watch_dirs(existing)
                .description("Automatically imported from legacy watch directories"),
        )?;
        Ok(Some(record))
    }
}
