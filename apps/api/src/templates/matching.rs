//! Template matching — scores one template against the session's current answers.
//!
//! Four independent all-or-nothing factors:
//! - style match (25): design-style answer in `style_tags`, case-insensitive
//! - color match (20): color answer in `color_schemes`
//! - functionality match (30): primary-goal answer in `suitable_for`
//! - technical compatibility (25): version answer in `compatible_versions`
//!
//! A missing or non-textual answer leaves its factor at 0. Multiple-choice answers trigger a
//! factor when any selection matches.

use serde::Serialize;

use crate::questionnaire::models::{
    COLOR_PREFERENCE_QUESTION, DESIGN_STYLE_QUESTION, PRIMARY_GOAL_QUESTION, VERSION_QUESTION,
};
use crate::questionnaire::responses::ResponseStore;
use crate::templates::models::Template;

pub const STYLE_MATCH_WEIGHT: f64 = 25.0;
pub const COLOR_MATCH_WEIGHT: f64 = 20.0;
pub const FUNCTIONALITY_MATCH_WEIGHT: f64 = 30.0;
pub const TECHNICAL_COMPATIBILITY_WEIGHT: f64 = 25.0;

pub const MAX_MATCH_SCORE: f64 = 100.0;

/// Per-factor contribution, each either 0 or the factor's full weight.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct MatchBreakdown {
    pub style_match: f64,
    pub color_match: f64,
    pub functionality_match: f64,
    pub technical_compatibility: f64,
}

impl MatchBreakdown {
    /// Sum of triggered factors, capped at 100.
    pub fn total(&self) -> f64 {
        (self.style_match + self.color_match + self.functionality_match + self.technical_compatibility)
            .clamp(0.0, MAX_MATCH_SCORE)
    }
}

pub fn match_breakdown(template: &Template, store: &ResponseStore) -> MatchBreakdown {
    let factor = |triggered: bool, weight: f64| if triggered { weight } else { 0.0 };

    MatchBreakdown {
        style_match: factor(
            answer_in(store, DESIGN_STYLE_QUESTION, &template.style_tags, true),
            STYLE_MATCH_WEIGHT,
        ),
        color_match: factor(
            answer_in(store, COLOR_PREFERENCE_QUESTION, &template.color_schemes, false),
            COLOR_MATCH_WEIGHT,
        ),
        functionality_match: factor(
            answer_in(store, PRIMARY_GOAL_QUESTION, &template.suitable_for, false),
            FUNCTIONALITY_MATCH_WEIGHT,
        ),
        technical_compatibility: factor(
            answer_in(store, VERSION_QUESTION, &template.compatible_versions, false),
            TECHNICAL_COMPATIBILITY_WEIGHT,
        ),
    }
}

pub fn compute_match_score(template: &Template, store: &ResponseStore) -> f64 {
    match_breakdown(template, store).total()
}

fn answer_in(store: &ResponseStore, question_id: &str, tags: &[String], ignore_case: bool) -> bool {
    let Some(response) = store.get(question_id) else {
        return false;
    };
    response.value.selections().into_iter().any(|answer| {
        tags.iter().any(|tag| {
            if ignore_case {
                tag.to_lowercase() == answer.to_lowercase()
            } else {
                tag == answer
            }
        })
    })
}
