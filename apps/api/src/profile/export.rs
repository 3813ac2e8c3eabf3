use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::profile::scoring::{compute_category_scores, CategoryScores};
use crate::questionnaire::catalog::QuestionCatalog;
use crate::questionnaire::responses::{ResponseStore, ResponseValue};
use crate::templates::models::Template;
use crate::templates::ranking::rank_templates;

pub const EXPORTED_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ExportedResponse {
    pub response: ResponseValue,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedRecommendation {
    pub name: String,
    pub url: String,
    pub score: f64,
}

/// Point-in-time snapshot of a session: answers, category scores and the top recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileExport {
    pub profile_id: String,
    pub created_at: DateTime<Utc>,
    pub responses: BTreeMap<String, ExportedResponse>,
    pub profile_scores: CategoryScores,
    pub recommendations: Vec<ExportedRecommendation>,
}

impl ProfileExport {
    pub fn download_filename(&self) -> String {
        format!("ppt_profile_{}.json", self.profile_id)
    }
}

pub fn export_profile(
    catalog: &QuestionCatalog,
    store: &ResponseStore,
    templates: &[Template],
) -> ProfileExport {
    let created_at = Utc::now();
    let suffix = Uuid::new_v4().simple().to_string();
    let profile_id = format!(
        "profile_{}_{}",
        created_at.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    );

    let responses = store
        .iter()
        .map(|r| {
            (
                r.question_id.clone(),
                ExportedResponse {
                    response: r.value.clone(),
                    details: r.additional_details.clone(),
                    timestamp: r.timestamp,
                },
            )
        })
        .collect();

    let recommendations = rank_templates(templates, store, EXPORTED_RECOMMENDATIONS)
        .into_iter()
        .map(|r| ExportedRecommendation {
            name: r.template_name,
            url: r.template_url,
            score: r.match_score,
        })
        .collect();

    ProfileExport {
        profile_id,
        created_at,
        responses,
        profile_scores: compute_category_scores(catalog, store),
        recommendations,
    }
}
