use serde::Serialize;
use tracing::debug;

use crate::questionnaire::catalog::QuestionCatalog;
use crate::questionnaire::models::{EXPERIENCE_QUESTION, TIMELINE_QUESTION};
use crate::questionnaire::responses::ResponseStore;

pub const DEFAULT_TIMELINE: &str = "1주";
pub const DEFAULT_EXPERIENCE_LEVEL: &str = "중급자";
pub const DEFAULT_CUSTOMIZATION_LEVEL: &str = "moderate";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimelineBucket {
    Tight,
    Standard,
    Extended,
}

/// Timeline answer literal → bucket.
const TIMELINE_BUCKETS: &[(&str, TimelineBucket)] = &[
    ("1일", TimelineBucket::Tight),
    ("1주", TimelineBucket::Standard),
    ("1개월", TimelineBucket::Extended),
];

impl TimelineBucket {
    /// Unrecognized answers fall back to the standard bucket.
    pub fn from_answer(answer: Option<&str>) -> Self {
        answer
            .and_then(|a| {
                TIMELINE_BUCKETS
                    .iter()
                    .find(|(literal, _)| *literal == a)
                    .map(|(_, bucket)| *bucket)
            })
            .unwrap_or(TimelineBucket::Standard)
    }

    pub fn roadmap_key(&self) -> &'static str {
        match self {
            TimelineBucket::Tight => "tight_timeline_1day",
            TimelineBucket::Standard => "standard_timeline_1week",
            TimelineBucket::Extended => "extended_timeline_1month",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImplementationPlan {
    pub timeline: String,
    pub timeline_bucket: TimelineBucket,
    /// Reported as answered; it does not change the selected roadmap.
    pub experience_level: String,
    pub phases: Vec<String>,
    pub resources_needed: Vec<String>,
    pub customization_level: String,
}

pub fn generate_plan(catalog: &QuestionCatalog, store: &ResponseStore) -> ImplementationPlan {
    let answer = |id: &str| store.get(id).and_then(|r| r.value.as_text());

    let timeline_answer = answer(TIMELINE_QUESTION);
    let bucket = TimelineBucket::from_answer(timeline_answer);
    let roadmap = catalog.roadmap(bucket.roadmap_key());
    if roadmap.is_none() {
        debug!("No roadmap configured for {}", bucket.roadmap_key());
    }

    ImplementationPlan {
        timeline: timeline_answer.unwrap_or(DEFAULT_TIMELINE).to_string(),
        timeline_bucket: bucket,
        experience_level: answer(EXPERIENCE_QUESTION)
            .unwrap_or(DEFAULT_EXPERIENCE_LEVEL)
            .to_string(),
        phases: roadmap.map(|r| r.steps.clone()).unwrap_or_default(),
        resources_needed: roadmap.map(|r| r.resources.clone()).unwrap_or_default(),
        customization_level: roadmap
            .and_then(|r| r.customization_level.clone())
            .unwrap_or_else(|| DEFAULT_CUSTOMIZATION_LEVEL.to_string()),
    }
}
