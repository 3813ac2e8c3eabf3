use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Questionnaire configuration document (phases, questions, weights, roadmaps).
    pub questionnaire_path: PathBuf,
    /// Optional JSON template catalog. The embedded catalog is served when unset.
    pub template_catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            questionnaire_path: std::env::var("QUESTIONNAIRE_CONFIG_PATH")
                .unwrap_or_else(|_| "config/ppt_designer_system.json".to_string())
                .into(),
            template_catalog_path: std::env::var("TEMPLATE_CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
