use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Designated question ids
// ────────────────────────────────────────────────────────────────────────────

/// Primary goal of the presentation (drives the functionality match factor).
pub const PRIMARY_GOAL_QUESTION: &str = "q1.1.1";
/// Preferred color scheme.
pub const COLOR_PREFERENCE_QUESTION: &str = "q1.3.2";
/// Preferred design style.
pub const DESIGN_STYLE_QUESTION: &str = "q2.1.1";
/// PowerPoint version in use.
pub const VERSION_QUESTION: &str = "q2.2.1";
/// Expected slide count, only used to build search parameters.
pub const SLIDE_COUNT_QUESTION: &str = "q3.1.1";
/// Desired completion timeline.
pub const TIMELINE_QUESTION: &str = "q5.1.1";
/// Self-reported PowerPoint experience level.
pub const EXPERIENCE_QUESTION: &str = "q5.1.2";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Text,
    Boolean,
    BooleanWithDetails,
}

/// A single strategic question. Ids are dotted `q<phase>.<section>.<index>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub required: bool,
    pub weight: u32,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// The six fixed profile scoring buckets, in reporting order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ContentGoals,
    AudienceContext,
    DesignPreferences,
    TechnicalRequirements,
    TimelineResources,
    Scalability,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::ContentGoals,
        Category::AudienceContext,
        Category::DesignPreferences,
        Category::TechnicalRequirements,
        Category::TimelineResources,
        Category::Scalability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ContentGoals => "content_goals",
            Category::AudienceContext => "audience_context",
            Category::DesignPreferences => "design_preferences",
            Category::TechnicalRequirements => "technical_requirements",
            Category::TimelineResources => "timeline_resources",
            Category::Scalability => "scalability",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub workflow_phases: Vec<Phase>,
    pub scoring_system: ScoringSystem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default)]
    pub phase_id: Option<u32>,
    #[serde(default)]
    pub phase_name: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub strategic_questions: Vec<Question>,
    /// User choice literal → free-form direction payload.
    #[serde(default)]
    pub customized_directions: HashMap<String, Value>,
    /// Roadmap key (e.g. `standard_timeline_1week`) → roadmap.
    #[serde(default)]
    pub implementation_roadmaps: HashMap<String, Roadmap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub steps: Vec<String>,
    /// Accepts either a single string or a list in the document.
    #[serde(default, deserialize_with = "one_or_many")]
    pub resources: Vec<String>,
    #[serde(default)]
    pub customization_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSystem {
    /// Category name → maximum score. Validated against [`Category::ALL`] at load.
    pub weight_distribution: HashMap<String, f64>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => vec![],
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}
