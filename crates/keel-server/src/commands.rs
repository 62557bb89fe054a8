//! Store subcommands for the `keel` binary.
//!
//! Each command runs one store operation and returns its result as JSON for
//! printing.

use anyhow::{anyhow, Result};
use clap::Subcommand;
use keel_core::{KeelError, ProjectStore};
use keel_types::{NewDecision, NewObjective, NewProject, Priority, ProjectRecord, ProjectStatus};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::debug;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Create a project
    Create {
        name: String,
        /// Project root directory
        root: PathBuf,
        /// Directory to watch (repeatable, defaults to the root)
        #[arg(long = "watch", value_name = "DIR")]
        watch: Vec<PathBuf>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a full project record
    Show { id: String },
    /// List projects
    List {
        /// Only active projects
        #[arg(long)]
        active: bool,
    },
    /// Focus a project
    Focus { id: String },
    /// Show the focused project
    Focused,
    /// Set a project's status (active, paused, archived)
    Status { id: String, status: ProjectStatus },
    Pause { id: String },
    Resume { id: String },
    Archive { id: String },
    /// Record a decision
    Decide {
        decision: String,
        reasoning: String,
        /// Target project (defaults to the focused one)
        #[arg(long)]
        project: Option<String>,
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// Add an objective
    Objective {
        id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Complete an objective
    Complete { id: String, objective_id: String },
    /// Export bounded context for a project
    Context { id: String },
    /// Counts by status and one row per project
    Summary,
    /// Union of watch directories across active projects
    WatchDirs,
    /// Find the active project watching a path
    Which { path: PathBuf },
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn require<'a>(store: &'a ProjectStore, id: &str) -> Result<&'a ProjectRecord> {
    store
        .get(id)
        .ok_or_else(|| anyhow!(KeelError::ProjectNotFound(id.to_string())))
}

/// Run one command against the store.
pub fn run(command: StoreCommand, store: &mut ProjectStore) -> Result<Value> {
    debug!(target: "keel::cli", "Running {:?}", command);

    match command {
        StoreCommand::Create {
            name,
            root,
            watch,
            description,
        } => {
            let mut input = NewProject::new(name, root);
            if !watch.is_empty() {
                input = input.watch_dirs(watch);
            }
            input.description = description;
            to_json(&store.create(input)?)
        }
        StoreCommand::Show { id } => to_json(require(store, &id)?),
        StoreCommand::List { active } => {
            let records: Vec<&ProjectRecord> = if active {
                store.list_active()
            } else {
                store.list().collect()
            };
            to_json(&records)
        }
        StoreCommand::Focus { id } => {
            store.set_focus(&id)?;
            Ok(json!({ "status": "Project focused", "project_id": id }))
        }
        StoreCommand::Focused => {
            let record = store.get_focused().ok_or(KeelError::NoFocusedProject)?;
            to_json(record)
        }
        StoreCommand::Status { id, status } => set_status(store, &id, status),
        StoreCommand::Pause { id } => set_status(store, &id, ProjectStatus::Paused),
        StoreCommand::Resume { id } => set_status(store, &id, ProjectStatus::Active),
        StoreCommand::Archive { id } => set_status(store, &id, ProjectStatus::Archived),
        StoreCommand::Decide {
            decision,
            reasoning,
            project,
            tags,
        } => {
            let input = NewDecision::new(decision, reasoning).with_tags(tags);
            let decision = match project {
                Some(id) => store.add_decision(&id, input)?,
                None => store.add_decision_to_focused(input)?,
            };
            to_json(&decision)
        }
        StoreCommand::Objective {
            id,
            title,
            description,
            priority,
        } => {
            let input = NewObjective::new(title)
                .description(description)
                .priority(priority);
            to_json(&store.add_objective(&id, input)?)
        }
        StoreCommand::Complete { id, objective_id } => {
            store.complete_objective(&id, &objective_id)?;
            Ok(json!({ "status": "Objective completed", "objective_id": objective_id }))
        }
        StoreCommand::Context { id } => to_json(&store.export_context(&id)),
        StoreCommand::Summary => to_json(&store.summary()),
        StoreCommand::WatchDirs => to_json(&store.all_watch_dirs()),
        StoreCommand::Which { path } => {
            let record = store
                .project_for_path(&path)
                .ok_or_else(|| anyhow!("No active project watches {}", path.display()))?;
            Ok(json!({ "project_id": record.project_id, "name": record.name }))
        }
    }
}

fn set_status(store: &mut ProjectStore, id: &str, status: ProjectStatus) -> Result<Value> {
    store.update_status(id, status)?;
    Ok(json!({ "status": "Project status updated", "project_id": id, "new_status": status }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: StoreCommand,
    }

    fn parse(args: &[&str]) -> StoreCommand {
        let mut argv = vec!["keel"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().command
    }

    fn create_test_store() -> (ProjectStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn create_project(store: &mut ProjectStore, name: &str) -> String {
        let value = run(parse(&["create", name, format!("/tmp/{}", name).as_str()]), store).unwrap();
        value["project_id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_parse_create_with_watch_dirs() {
        let command = parse(&["create", "Alpha", "/tmp/alpha", "--watch", "/tmp/alpha/src", "--watch", "/tmp/alpha/docs"]);
        assert_eq!(
            command,
            StoreCommand::Create {
                name: "Alpha".into(),
                root: "/tmp/alpha".into(),
                watch: vec!["/tmp/alpha/src".into(), "/tmp/alpha/docs".into()],
                description: None,
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let result = TestCli::try_parse_from(["keel", "status", "proj_x", "deleted"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_and_show() {
        let (mut store, _temp_dir) = create_test_store();
        let id = create_project(&mut store, "alpha");

        let shown = run(parse(&["show", id.as_str()]), &mut store).unwrap();
        assert_eq!(shown["name"], "alpha");
        assert_eq!(shown["status"], "active");
        assert_eq!(shown["watch_dirs"][0], "/tmp/alpha");
    }

    #[test]
    fn test_show_unknown_fails() {
        let (mut store, _temp_dir) = create_test_store();
        let err = run(parse(&["show", "proj_missing"]), &mut store).unwrap_err();
        assert!(err.to_string().contains("proj_missing"));
    }

    #[test]
    fn test_status_commands() {
        let (mut store, _temp_dir) = create_test_store();
        let id = create_project(&mut store, "alpha");

        let value = run(parse(&["pause", id.as_str()]), &mut store).unwrap();
        assert_eq!(value["new_status"], "paused");
        let active = run(parse(&["list", "--active"]), &mut store).unwrap();
        assert_eq!(active.as_array().unwrap().len(), 0);

        run(parse(&["status", id.as_str(), "active"]), &mut store).unwrap();
        let active = run(parse(&["list", "--active"]), &mut store).unwrap();
        assert_eq!(active.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_decide_defaults_to_focused() {
        let (mut store, _temp_dir) = create_test_store();
        let first = create_project(&mut store, "alpha");
        let second = create_project(&mut store, "beta");

        run(parse(&["focus", second.as_str()]), &mut store).unwrap();
        let decision = run(
            parse(&["decide", "Use JWT", "stateless", "--tag", "auth", "--tag", "security"]),
            &mut store,
        )
        .unwrap();
        assert_eq!(decision["tags"], json!(["auth", "security"]));
        assert_eq!(store.get(&second).unwrap().decisions.len(), 1);
        assert!(store.get(&first).unwrap().decisions.is_empty());
    }

    #[test]
    fn test_objective_lifecycle() {
        let (mut store, _temp_dir) = create_test_store();
        let id = create_project(&mut store, "alpha");

        let objective = run(parse(&["objective", id.as_str(), "Ship v1", "--priority", "high"]), &mut store).unwrap();
        assert_eq!(objective["priority"], "high");
        assert_eq!(objective["status"], "pending");
        let objective_id = objective["id"].as_str().unwrap().to_string();

        run(parse(&["complete", id.as_str(), objective_id.as_str()]), &mut store).unwrap();
        let summary = run(parse(&["summary"]), &mut store).unwrap();
        assert_eq!(summary["projects"][0]["objectives_pending"], 0);

        let context = run(parse(&["context", id.as_str()]), &mut store).unwrap();
        assert_eq!(context["statistics"]["completed_objectives"], 1);
    }

    #[test]
    fn test_context_unknown_is_empty_object() {
        let (mut store, _temp_dir) = create_test_store();
        let context = run(parse(&["context", "proj_missing"]), &mut store).unwrap();
        assert_eq!(context, json!({}));
    }

    #[test]
    fn test_which_and_watch_dirs() {
        let (mut store, _temp_dir) = create_test_store();
        let id = create_project(&mut store, "alpha");

        let dirs = run(parse(&["watch-dirs"]), &mut store).unwrap();
        assert_eq!(dirs, json!(["/tmp/alpha"]));

        let owner = run(parse(&["which", "/tmp/alpha/src/lib.rs"]), &mut store).unwrap();
        assert_eq!(owner["project_id"], id.as_str());
        assert!(run(parse(&["which", "/elsewhere"]), &mut store).is_err());
    }
}
