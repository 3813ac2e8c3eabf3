use serde::Serialize;

use crate::questionnaire::responses::ResponseStore;
use crate::templates::matching::compute_match_score;
use crate::templates::models::{Difficulty, Template};

pub const MAX_RECOMMENDATIONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub template_name: String,
    pub template_url: String,
    pub match_score: f64,
    pub style_tags: Vec<String>,
    pub color_schemes: Vec<String>,
    pub suitable_for: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub customization_difficulty: Difficulty,
    pub preview_image: Option<String>,
    pub slide_count: Option<String>,
    pub features: Vec<String>,
}

impl Recommendation {
    fn from_template(template: &Template, match_score: f64) -> Self {
        Self {
            template_name: template.name.clone(),
            template_url: template.url.clone(),
            match_score,
            style_tags: template.style_tags.clone(),
            color_schemes: template.color_schemes.clone(),
            suitable_for: template.suitable_for.clone(),
            pros: template.pros.clone(),
            cons: template.cons.clone(),
            customization_difficulty: template.difficulty,
            preview_image: template.preview_image.clone(),
            slide_count: template.slide_count.clone(),
            features: template.features.clone(),
        }
    }
}

/// Scores every template, sorts by match score descending and keeps the first
/// `min(limit, MAX_RECOMMENDATIONS)`. The sort is stable: equal scores keep catalog order.
pub fn rank_templates(
    templates: &[Template],
    store: &ResponseStore,
    limit: usize,
) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = templates
        .iter()
        .map(|t| Recommendation::from_template(t, compute_match_score(t, store)))
        .collect();

    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked.truncate(limit.min(MAX_RECOMMENDATIONS));
    ranked
}
