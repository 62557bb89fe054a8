//! Decision route handlers.

use super::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use keel_types::{Decision, NewDecision};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub decision: String,
    /// Older clients send the rationale as `context`.
    #[serde(default, alias = "context")]
    pub reasoning: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Only read by `POST /decision`; defaults to the focused project.
    #[serde(default)]
    pub project_id: Option<String>,
}

impl DecisionRequest {
    fn into_input(self) -> Result<(Option<String>, NewDecision), ApiError> {
        if self.decision.trim().is_empty() {
            return Err(ApiError::BadRequest("Decision required".to_string()));
        }
        let input = NewDecision {
            decision: self.decision,
            reasoning: self.reasoning,
            tags: self.tags,
        };
        Ok((self.project_id, input))
    }
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<Decision>, ApiError> {
    let (_, input) = req.into_input()?;
    let decision = state.store().add_decision(&id, input)?;
    Ok(Json(decision))
}

#[derive(Serialize)]
pub struct DecisionAddedResponse {
    pub status: &'static str,
    pub decision_id: String,
    pub project_id: String,
}

/// Record a decision against `project_id`, or the focused project when absent.
pub async fn add_to_focused(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<DecisionAddedResponse>, ApiError> {
    let (project_id, input) = req.into_input()?;

    let mut store = state.store();
    let (decision, project_id) = match project_id {
        Some(project_id) => (store.add_decision(&project_id, input)?, project_id),
        None => {
            let decision = store.add_decision_to_focused(input)?;
            let project_id = store.focused_id().unwrap_or_default().to_string();
            (decision, project_id)
        }
    };

    Ok(Json(DecisionAddedResponse {
        status: "Decision added",
        decision_id: decision.id,
        project_id,
    }))
}
