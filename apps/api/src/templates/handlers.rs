//! Axum route handlers for the template catalog and recommendations.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::templates::matching::{match_breakdown, MatchBreakdown};
use crate::templates::models::Template;
use crate::templates::ranking::{rank_templates, Recommendation, MAX_RECOMMENDATIONS};
use crate::templates::source::{search, search_params, TemplateSearchParams};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
    /// Parameters derived from the session's answers, for display alongside the list.
    pub search_params: TemplateSearchParams,
}

#[derive(Debug, Serialize)]
pub struct TemplateScoreResponse {
    pub template_name: String,
    pub match_score: f64,
    pub breakdown: MatchBreakdown,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let templates = state.templates.list_templates().await?;
    Ok(Json(TemplateListResponse {
        count: templates.len(),
        templates,
    }))
}

/// POST /api/v1/templates/search
pub async fn handle_search_templates(
    State(state): State<AppState>,
    Json(params): Json<TemplateSearchParams>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let templates = search(state.templates.list_templates().await?, &params);
    Ok(Json(TemplateListResponse {
        count: templates.len(),
        templates,
    }))
}

/// GET /api/v1/sessions/:session_id/recommendations?limit=N
///
/// Ranks the full catalog against the session's answers. `limit` is capped at 10.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let session = state.sessions.require(session_id).await?;
    let templates = state.templates.list_templates().await?;
    let limit = query.limit.unwrap_or(MAX_RECOMMENDATIONS);

    let store = session.lock().await;
    let recommendations = rank_templates(&templates, &store, limit);
    Ok(Json(RecommendationsResponse {
        count: recommendations.len(),
        recommendations,
        search_params: search_params(&store),
    }))
}

/// GET /api/v1/sessions/:session_id/templates/:index/score
///
/// Match score and per-factor breakdown for one catalog entry (0-based index).
pub async fn handle_template_score(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<TemplateScoreResponse>, AppError> {
    let session = state.sessions.require(session_id).await?;
    let templates = state.templates.list_templates().await?;
    let template = templates
        .get(index)
        .ok_or_else(|| AppError::NotFound(format!("Template {index} not found")))?;

    let store = session.lock().await;
    let breakdown = match_breakdown(template, &store);
    Ok(Json(TemplateScoreResponse {
        template_name: template.name.clone(),
        match_score: breakdown.total(),
        breakdown,
    }))
}
