//! Axum route handlers for the questionnaire and session lifecycle.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::questionnaire::models::Question;
use crate::questionnaire::responses::{BatchItem, ProgressReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<Question>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PhaseQuestionsResponse {
    pub phase_id: usize,
    pub questions: Vec<Question>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub additional_details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub question_id: String,
    pub progress: f64,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub responses: Vec<BatchItem>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub submitted_count: usize,
    pub total_count: usize,
    pub progress: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/config
pub async fn handle_get_config(State(state): State<AppState>) -> Json<Value> {
    Json(state.catalog.raw().clone())
}

/// GET /api/v1/questions
pub async fn handle_all_questions(State(state): State<AppState>) -> Json<QuestionListResponse> {
    let questions = state.catalog.all_questions().to_vec();
    Json(QuestionListResponse {
        total_count: questions.len(),
        questions,
    })
}

/// GET /api/v1/questions/phase/:phase_id
pub async fn handle_phase_questions(
    State(state): State<AppState>,
    Path(phase_id): Path<usize>,
) -> Result<Json<PhaseQuestionsResponse>, AppError> {
    let questions: Vec<Question> = state
        .catalog
        .questions_by_phase(phase_id)?
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(PhaseQuestionsResponse {
        phase_id,
        count: questions.len(),
        questions,
    }))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreatedResponse { session_id }))
}

/// DELETE /api/v1/sessions/:session_id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(session_id).await {
        return Err(AppError::NotFound(format!("Session {session_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:session_id/clear
///
/// Discards every answer but keeps the session id valid.
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.require(session_id).await?;
    session.lock().await.clear();
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:session_id/responses
pub async fn handle_submit_response(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let question_id = request.question_id.unwrap_or_default();
    let value = match request.response {
        Some(v) if !v.is_null() && !question_id.trim().is_empty() => v,
        _ => {
            return Err(AppError::Validation(
                "question_id and response are required".to_string(),
            ))
        }
    };

    let session = state.sessions.require(session_id).await?;
    let mut store = session.lock().await;
    let question_id = store
        .submit(&state.catalog, &question_id, value, request.additional_details)?
        .question_id
        .clone();

    Ok(Json(SubmitResponse {
        success: true,
        question_id,
        progress: store.progress(&state.catalog),
    }))
}

/// POST /api/v1/sessions/:session_id/responses/batch
///
/// Best-effort: invalid items are skipped and reflected in `submitted_count`.
pub async fn handle_submit_batch(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    if request.responses.is_empty() {
        return Err(AppError::Validation("responses array is required".to_string()));
    }

    let session = state.sessions.require(session_id).await?;
    let mut store = session.lock().await;
    let outcome = store.submit_batch(&state.catalog, request.responses);

    Ok(Json(BatchResponse {
        success: true,
        submitted_count: outcome.submitted_count,
        total_count: outcome.total_count,
        progress: store.progress(&state.catalog),
    }))
}

/// GET /api/v1/sessions/:session_id/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ProgressReport>, AppError> {
    let session = state.sessions.require(session_id).await?;
    let store = session.lock().await;
    Ok(Json(store.progress_report(&state.catalog)))
}
