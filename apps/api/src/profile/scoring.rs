use std::collections::BTreeMap;

use serde::Serialize;

use crate::questionnaire::catalog::QuestionCatalog;
use crate::questionnaire::models::Category;
use crate::questionnaire::responses::ResponseStore;

/// Category score per bucket. Always carries all six categories.
pub type CategoryScores = BTreeMap<Category, f64>;

/// Section prefix (`q<phase>.<section>`) → scoring category.
const CATEGORY_PREFIXES: &[(&str, Category)] = &[
    ("q1.1", Category::ContentGoals),
    ("q1.2", Category::AudienceContext),
    ("q1.3", Category::DesignPreferences),
    ("q2.1", Category::DesignPreferences),
    ("q2.2", Category::TechnicalRequirements),
    ("q3.1", Category::ContentGoals),
    ("q3.2", Category::AudienceContext),
    ("q4.1", Category::TechnicalRequirements),
    ("q4.2", Category::TechnicalRequirements),
    ("q5.1", Category::TimelineResources),
    ("q5.2", Category::Scalability),
];

/// A single answer under-counts coverage of its category, so totals are doubled before capping.
const COVERAGE_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub scores: CategoryScores,
    pub total_score: f64,
    pub max_score: f64,
}

/// `q1.1.1` → `q1.1`. Ids with fewer than two segments are returned unchanged.
fn section_prefix(question_id: &str) -> &str {
    match question_id.match_indices('.').nth(1) {
        Some((i, _)) => &question_id[..i],
        None => question_id,
    }
}

pub fn category_for(question_id: &str) -> Option<Category> {
    let prefix = section_prefix(question_id);
    CATEGORY_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, c)| *c)
}

/// Folds answered responses into the six categories.
///
/// Each answered response whose section maps to a category and whose question exists in
/// the catalog adds `weight / 10`. Totals become `min(total * 2, category_max)`.
pub fn compute_category_scores(catalog: &QuestionCatalog, store: &ResponseStore) -> CategoryScores {
    let mut totals: CategoryScores = Category::ALL.iter().map(|c| (*c, 0.0)).collect();

    for response in store.iter() {
        let Some(category) = category_for(&response.question_id) else {
            continue;
        };
        let Some(question) = catalog.find_question(&response.question_id) else {
            continue;
        };
        if !response.value.is_answered() {
            continue;
        }
        if let Some(total) = totals.get_mut(&category) {
            *total += question.weight as f64 / 10.0;
        }
    }

    for (category, total) in totals.iter_mut() {
        let max = catalog.category_max(*category);
        *total = (*total * COVERAGE_MULTIPLIER).clamp(0.0, max);
    }

    totals
}

pub fn summarize_profile(catalog: &QuestionCatalog, store: &ResponseStore) -> ProfileSummary {
    let scores = compute_category_scores(catalog, store);
    let total_score: f64 = scores.values().sum();
    let max_score: f64 = catalog.category_maxima().values().sum();
    ProfileSummary {
        scores,
        total_score,
        max_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::catalog::tests::question;
    use crate::questionnaire::models::QuestionType;
    use crate::questionnaire::responses::ResponseValue;
    use serde_json::json;

    fn two_section_catalog() -> QuestionCatalog {
        QuestionCatalog::from_value(json!({
            "workflow_phases": [{
                "sections": [
                    { "strategic_questions": [question("q1.1.1", "single_choice", true, 8)] },
                    { "strategic_questions": [question("q1.2.1", "single_choice", true, 6)] }
                ]
            }],
            "scoring_system": { "weight_distribution": {
                "content_goals": 20,
                "audience_context": 20,
                "design_preferences": 20,
                "technical_requirements": 20,
                "timeline_resources": 20,
                "scalability": 20
            }}
        }))
        .unwrap()
    }

    #[test]
    fn test_section_prefix() {
        assert_eq!(section_prefix("q1.1.1"), "q1.1");
        assert_eq!(section_prefix("q5.2.10"), "q5.2");
        assert_eq!(section_prefix("q1.1"), "q1.1");
        assert_eq!(section_prefix("q1"), "q1");
    }

    #[test]
    fn test_category_for() {
        assert_eq!(category_for("q2.1.1"), Some(Category::DesignPreferences));
        assert_eq!(category_for("q5.2.1"), Some(Category::Scalability));
        assert_eq!(category_for("q6.1.1"), None);
        assert_eq!(category_for("free_text"), None);
    }

    #[test]
    fn test_single_answer_scores_doubled_weight() {
        let catalog = two_section_catalog();
        let mut store = ResponseStore::new();
        store.submit(&catalog, "q1.1.1", json!("교육"), None).unwrap();

        let scores = compute_category_scores(&catalog, &store);
        assert!((scores[&Category::ContentGoals] - 1.6).abs() < 1e-9);
        for c in Category::ALL.iter().filter(|c| **c != Category::ContentGoals) {
            assert_eq!(scores[c], 0.0);
        }
    }

    #[test]
    fn test_all_categories_present_when_empty() {
        let catalog = two_section_catalog();
        let scores = compute_category_scores(&catalog, &ResponseStore::new());
        assert_eq!(scores.len(), 6);
        assert!(scores.values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_falsy_answer_contributes_nothing() {
        let catalog = two_section_catalog();
        let mut store = ResponseStore::new();
        store.insert("q1.1.1", ResponseValue::Single(String::new()), None);
        store.insert("q1.2.1", ResponseValue::Multiple(vec![]), None);

        let scores = compute_category_scores(&catalog, &store);
        assert!(scores.values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_unknown_question_in_mapped_section_is_ignored() {
        let catalog = two_section_catalog();
        let mut store = ResponseStore::new();
        store.submit(&catalog, "q1.1.9", json!("x"), None).unwrap();

        let scores = compute_category_scores(&catalog, &store);
        assert_eq!(scores[&Category::ContentGoals], 0.0);
    }

    #[test]
    fn test_score_capped_at_category_max() {
        let catalog = QuestionCatalog::from_value(json!({
            "workflow_phases": [{ "sections": [{ "strategic_questions": [
                question("q5.2.1", "boolean", false, 30),
                question("q5.2.2", "boolean", false, 30)
            ]}]}],
            "scoring_system": { "weight_distribution": {
                "content_goals": 20,
                "audience_context": 20,
                "design_preferences": 20,
                "technical_requirements": 15,
                "timeline_resources": 15,
                "scalability": 10
            }}
        }))
        .unwrap();
        let mut store = ResponseStore::new();
        store.submit(&catalog, "q5.2.1", json!(true), None).unwrap();
        store.submit(&catalog, "q5.2.2", json!(true), None).unwrap();

        // (3.0 + 3.0) * 2 = 12 → capped at 10
        let scores = compute_category_scores(&catalog, &store);
        assert_eq!(scores[&Category::Scalability], 10.0);
    }

    #[test]
    fn test_bundled_questionnaire_scores_stay_within_bounds() {
        let catalog =
            QuestionCatalog::from_json_str(include_str!("../../config/ppt_designer_system.json"))
                .unwrap();
        let mut store = ResponseStore::new();
        for q in catalog.all_questions() {
            let value = match q.question_type {
                QuestionType::Boolean | QuestionType::BooleanWithDetails => json!(true),
                QuestionType::MultipleChoice => json!(["a", "b"]),
                _ => json!("answer"),
            };
            store.submit(&catalog, &q.question_id, value, None).unwrap();
        }

        let scores = compute_category_scores(&catalog, &store);
        for (category, score) in &scores {
            assert!(*score >= 0.0);
            assert!(*score <= catalog.category_max(*category), "{category:?} = {score}");
        }
    }

    #[test]
    fn test_summary_totals() {
        let catalog = two_section_catalog();
        let mut store = ResponseStore::new();
        store.submit(&catalog, "q1.1.1", json!("교육"), None).unwrap();
        store.submit(&catalog, "q1.2.1", json!("학생"), None).unwrap();

        let summary = summarize_profile(&catalog, &store);
        // 1.6 + 1.2
        assert!((summary.total_score - 2.8).abs() < 1e-9);
        assert_eq!(summary.max_score, 120.0);
    }
}
