mod config;
mod errors;
mod profile;
mod questionnaire;
mod routes;
mod sessions;
mod state;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::questionnaire::catalog::QuestionCatalog;
use crate::routes::build_router;
use crate::sessions::SessionRegistry;
use crate::state::AppState;
use crate::templates::source::{StaticTemplateSource, TemplateSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Designer API v{}", env!("CARGO_PKG_VERSION"));

    // Questionnaire document is required; nothing runs without it.
    let catalog = QuestionCatalog::from_path(&config.questionnaire_path).with_context(|| {
        format!(
            "Failed to load questionnaire from {}",
            config.questionnaire_path.display()
        )
    })?;

    let templates: Arc<dyn TemplateSource> = match &config.template_catalog_path {
        Some(path) => Arc::new(StaticTemplateSource::from_path(path)?),
        None => {
            info!("Serving embedded template catalog");
            Arc::new(StaticTemplateSource::embedded()?)
        }
    };

    let state = AppState {
        catalog: Arc::new(catalog),
        templates,
        sessions: SessionRegistry::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
