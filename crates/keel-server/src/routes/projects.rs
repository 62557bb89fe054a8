//! Project route handlers.

use super::{ApiError, StatusResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use keel_core::KeelError;
use keel_types::{
    ContextExport, NewObjective, NewProject, Objective, Priority, ProjectRecord, ProjectStatus,
    StoreSummary,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Counts by status plus one row per project.
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<StoreSummary> {
    Json(state.store().summary())
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root_path: String,
    #[serde(default)]
    pub watch_dirs: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let name = req.name.trim();
    let root_path = req.root_path.trim();
    if name.is_empty() || root_path.is_empty() {
        return Err(ApiError::BadRequest("Name and root_path required".to_string()));
    }

    let input = NewProject {
        name: name.to_string(),
        root_path: PathBuf::from(root_path),
        watch_dirs: req.watch_dirs,
        description: req.description,
    };
    let record = state.store().create(input)?;
    info!(target: "keel::api", "Created project {} via API", record.project_id);
    Ok(Json(record))
}

pub async fn list_active(State(state): State<Arc<AppState>>) -> Json<Vec<ProjectRecord>> {
    let store = state.store();
    Json(store.list_active().into_iter().cloned().collect())
}

pub async fn focused(State(state): State<Arc<AppState>>) -> Result<Json<ProjectRecord>, ApiError> {
    let store = state.store();
    let record = store.get_focused().ok_or(KeelError::NoFocusedProject)?;
    Ok(Json(record.clone()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let store = state.store();
    let record = store
        .get(&id)
        .ok_or_else(|| KeelError::ProjectNotFound(id.clone()))?;
    Ok(Json(record.clone()))
}

#[derive(Serialize)]
pub struct FocusResponse {
    pub status: &'static str,
    pub project_id: String,
}

pub async fn focus(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FocusResponse>, ApiError> {
    state.store().set_focus(&id)?;
    Ok(Json(FocusResponse {
        status: "Project focused",
        project_id: id,
    }))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub status: &'static str,
    pub new_status: ProjectStatus,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let status: ProjectStatus = req
        .status
        .parse()
        .map_err(|e: keel_types::ParseTagError| ApiError::BadRequest(e.to_string()))?;
    state.store().update_status(&id, status)?;
    Ok(Json(UpdateStatusResponse {
        status: "Project status updated",
        new_status: status,
    }))
}

#[derive(Deserialize)]
pub struct AddObjectiveRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
}

pub async fn add_objective(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddObjectiveRequest>,
) -> Result<Json<Objective>, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title required".to_string()));
    }
    let priority = match req.priority.as_deref() {
        Some(p) => p
            .parse::<Priority>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => Priority::default(),
    };

    let input = NewObjective::new(req.title)
        .description(req.description)
        .priority(priority);
    let objective = state.store().add_objective(&id, input)?;
    Ok(Json(objective))
}

pub async fn complete_objective(
    State(state): State<Arc<AppState>>,
    Path((id, objective_id)): Path<(String, String)>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.store().complete_objective(&id, &objective_id)?;
    Ok(Json(StatusResponse {
        status: "Objective completed",
    }))
}

/// Bounded context for an agent. Unknown projects are a 404 rather than `{}`.
pub async fn context(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContextExport>, ApiError> {
    let export = state.store().export_context(&id);
    if export.is_empty() {
        debug!(target: "keel::api", "Context requested for unknown project {}", id);
        return Err(KeelError::ProjectNotFound(id).into());
    }
    Ok(Json(export))
}

#[derive(Serialize)]
pub struct WatchDirsResponse {
    pub watch_dirs: Vec<PathBuf>,
}

pub async fn watch_dirs(State(state): State<Arc<AppState>>) -> Json<WatchDirsResponse> {
    Json(WatchDirsResponse {
        watch_dirs: state.store().all_watch_dirs().into_iter().collect(),
    })
}
