use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::questionnaire::catalog::CatalogError;
use crate::questionnaire::responses::ResponseError;
use crate::templates::source::TemplateSourceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Template source error: {0}")]
    TemplateSource(#[from] TemplateSourceError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::PhaseOutOfRange { .. } => AppError::OutOfRange(e.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<ResponseError> for AppError {
    fn from(e: ResponseError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::OutOfRange(msg) => (StatusCode::NOT_FOUND, "OUT_OF_RANGE", msg.clone()),
            AppError::TemplateSource(e) => {
                tracing::error!("Template source error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TEMPLATE_SOURCE_ERROR",
                    "The template catalog is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
