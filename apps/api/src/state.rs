use std::sync::Arc;

use crate::questionnaire::catalog::QuestionCatalog;
use crate::sessions::SessionRegistry;
use crate::templates::source::TemplateSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and never mutated.
    pub catalog: Arc<QuestionCatalog>,
    /// Pluggable template catalog. Default: StaticTemplateSource.
    pub templates: Arc<dyn TemplateSource>,
    pub sessions: SessionRegistry,
}
