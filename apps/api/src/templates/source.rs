//! Template sources: where the recommendation engine gets its catalog from.
//!
//! `AppState` holds an `Arc<dyn TemplateSource>`. The default `StaticTemplateSource` serves
//! the embedded catalog or a JSON file named by `TEMPLATE_CATALOG_PATH`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::questionnaire::models::{
    COLOR_PREFERENCE_QUESTION, DESIGN_STYLE_QUESTION, SLIDE_COUNT_QUESTION,
};
use crate::questionnaire::responses::ResponseStore;
use crate::templates::models::Template;

const EMBEDDED_CATALOG: &str = include_str!("../../config/templates.json");

#[derive(Debug, Error)]
pub enum TemplateSourceError {
    #[error("Failed to read template catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed template catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<Template>, TemplateSourceError>;
}

/// A fixed, in-memory catalog.
#[derive(Debug, Clone)]
pub struct StaticTemplateSource {
    templates: Vec<Template>,
}

impl StaticTemplateSource {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn embedded() -> Result<Self, TemplateSourceError> {
        Ok(Self::new(serde_json::from_str(EMBEDDED_CATALOG)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateSourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TemplateSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let templates: Vec<Template> = serde_json::from_str(&text)?;
        info!("Loaded {} templates from {}", templates.len(), path.display());
        Ok(Self::new(templates))
    }
}

#[async_trait]
impl TemplateSource for StaticTemplateSource {
    async fn list_templates(&self) -> Result<Vec<Template>, TemplateSourceError> {
        Ok(self.templates.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateSearchParams {
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub color_schemes: Vec<String>,
    #[serde(default)]
    pub slide_count: Option<String>,
}

/// Derives search parameters from the session's answers.
pub fn search_params(store: &ResponseStore) -> TemplateSearchParams {
    let selections = |id: &str| -> Vec<String> {
        store
            .get(id)
            .map(|r| r.value.selections().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    };

    TemplateSearchParams {
        style: selections(DESIGN_STYLE_QUESTION)
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect(),
        color_schemes: selections(COLOR_PREFERENCE_QUESTION),
        slide_count: store
            .get(SLIDE_COUNT_QUESTION)
            .and_then(|r| r.value.as_text())
            .map(str::to_string),
    }
}

/// Keeps templates matching any requested style and any requested color scheme.
/// Slide count is informational only.
pub fn search(templates: Vec<Template>, params: &TemplateSearchParams) -> Vec<Template> {
    filter_by_color(filter_by_style(templates, &params.style), &params.color_schemes)
}

/// Keeps templates carrying any of `styles` (case-insensitive). No styles, no filtering.
pub fn filter_by_style(templates: Vec<Template>, styles: &[String]) -> Vec<Template> {
    if styles.is_empty() {
        return templates;
    }
    templates
        .into_iter()
        .filter(|t| styles.iter().any(|s| has_style(t, s)))
        .collect()
}

/// Keeps templates offering any of `color_schemes`. No schemes, no filtering.
pub fn filter_by_color(templates: Vec<Template>, color_schemes: &[String]) -> Vec<Template> {
    if color_schemes.is_empty() {
        return templates;
    }
    templates
        .into_iter()
        .filter(|t| color_schemes.iter().any(|c| has_color(t, c)))
        .collect()
}

fn has_style(template: &Template, style: &str) -> bool {
    let style = style.to_lowercase();
    template.style_tags.iter().any(|t| t.to_lowercase() == style)
}

fn has_color(template: &Template, color_scheme: &str) -> bool {
    template.color_schemes.iter().any(|c| c == color_scheme)
}
