//! Axum route handlers for profile scores, plans, exports and customized directions.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::export::{export_profile, ProfileExport};
use crate::profile::plan::{generate_plan, ImplementationPlan};
use crate::profile::scoring::{summarize_profile, ProfileSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DirectionRequest {
    #[serde(default)]
    pub user_choice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DirectionResponse {
    pub phase_id: usize,
    pub section_id: String,
    pub user_choice: String,
    /// Configured payload, or an empty object when nothing matches.
    pub direction: Value,
}

/// GET /api/v1/sessions/:session_id/profile/scores
pub async fn handle_profile_scores(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ProfileSummary>, AppError> {
    let session = state.sessions.require(session_id).await?;
    let store = session.lock().await;
    Ok(Json(summarize_profile(&state.catalog, &store)))
}

/// GET /api/v1/sessions/:session_id/plan
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ImplementationPlan>, AppError> {
    let session = state.sessions.require(session_id).await?;
    let store = session.lock().await;
    Ok(Json(generate_plan(&state.catalog, &store)))
}

/// GET /api/v1/sessions/:session_id/profile/export
pub async fn handle_export_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ProfileExport>, AppError> {
    Ok(Json(build_export(&state, session_id).await?))
}

/// GET /api/v1/sessions/:session_id/profile/download
///
/// Same snapshot as the export, served as a JSON file attachment.
pub async fn handle_download_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let export = build_export(&state, session_id).await?;
    let body = serde_json::to_vec_pretty(&export).map_err(anyhow::Error::from)?;
    let disposition = format!("attachment; filename=\"{}\"", export.download_filename());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(body),
    ))
}

/// POST /api/v1/sessions/:session_id/direction/:phase_id/:section_id
pub async fn handle_customized_direction(
    State(state): State<AppState>,
    Path((session_id, phase_id, section_id)): Path<(Uuid, usize, String)>,
    Json(request): Json<DirectionRequest>,
) -> Result<Json<DirectionResponse>, AppError> {
    state.sessions.require(session_id).await?;

    let user_choice = request
        .user_choice
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("user_choice is required".to_string()))?;

    let direction = state
        .catalog
        .customized_direction(phase_id, &section_id, &user_choice)?
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    Ok(Json(DirectionResponse {
        phase_id,
        section_id,
        user_choice,
        direction,
    }))
}

async fn build_export(state: &AppState, session_id: Uuid) -> Result<ProfileExport, AppError> {
    let session = state.sessions.require(session_id).await?;
    let templates = state.templates.list_templates().await?;
    let store = session.lock().await;
    Ok(export_profile(&state.catalog, &store, &templates))
}
