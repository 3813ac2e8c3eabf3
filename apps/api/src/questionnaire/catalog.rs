//! Question catalog — the immutable questionnaire loaded once from the configuration document.
//!
//! Loading is all-or-nothing: an unreadable file, malformed JSON, duplicate question ids or an
//! incomplete category weight table abort startup. After that every lookup is infallible
//! except phase indexing, which reports `PhaseOutOfRange`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::questionnaire::models::{Category, ConfigDocument, Phase, Question, Roadmap};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read configuration document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate question id '{0}' in configuration document")]
    DuplicateQuestion(String),

    #[error("weight_distribution is missing category '{0}'")]
    MissingCategoryMax(&'static str),

    #[error("weight_distribution has invalid maximum {max} for '{category}'")]
    InvalidCategoryMax { category: &'static str, max: f64 },

    #[error("Phase {phase} is out of range (loaded phases: 1..={loaded})")]
    PhaseOutOfRange { phase: usize, loaded: usize },
}

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    raw: Value,
    document: ConfigDocument,
    /// All questions flattened in document order.
    questions: Vec<Question>,
    index: HashMap<String, usize>,
    category_max: BTreeMap<Category, f64>,
}

impl QuestionCatalog {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&text)?;
        info!(
            "Loaded questionnaire from {}: {} phases, {} questions",
            path.display(),
            catalog.phase_count(),
            catalog.questions.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self, CatalogError> {
        let document: ConfigDocument = serde_json::from_value(raw.clone())?;

        let questions: Vec<Question> = document
            .workflow_phases
            .iter()
            .flat_map(|p| p.sections.iter())
            .flat_map(|s| s.strategic_questions.iter().cloned())
            .collect();

        let mut index = HashMap::with_capacity(questions.len());
        for (i, q) in questions.iter().enumerate() {
            if index.insert(q.question_id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateQuestion(q.question_id.clone()));
            }
        }

        let mut category_max = BTreeMap::new();
        for category in Category::ALL {
            let max = *document
                .scoring_system
                .weight_distribution
                .get(category.as_str())
                .ok_or(CatalogError::MissingCategoryMax(category.as_str()))?;
            if !max.is_finite() || max < 0.0 {
                return Err(CatalogError::InvalidCategoryMax {
                    category: category.as_str(),
                    max,
                });
            }
            category_max.insert(category, max);
        }

        Ok(Self {
            raw,
            document,
            questions,
            index,
            category_max,
        })
    }

    /// The document exactly as loaded.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn phase_count(&self) -> usize {
        self.document.workflow_phases.len()
    }

    pub fn all_questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions of one phase in document order. `phase` is 1-based.
    pub fn questions_by_phase(&self, phase: usize) -> Result<Vec<&Question>, CatalogError> {
        let p = self.phase(phase)?;
        Ok(p.sections
            .iter()
            .flat_map(|s| s.strategic_questions.iter())
            .collect())
    }

    pub fn find_question(&self, question_id: &str) -> Option<&Question> {
        self.index.get(question_id).map(|&i| &self.questions[i])
    }

    pub fn required_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.required)
    }

    pub fn category_max(&self, category: Category) -> f64 {
        self.category_max.get(&category).copied().unwrap_or(0.0)
    }

    pub fn category_maxima(&self) -> &BTreeMap<Category, f64> {
        &self.category_max
    }

    /// Configured direction payload for a user choice within a section.
    /// `Ok(None)` when the section or the choice is not configured.
    pub fn customized_direction(
        &self,
        phase: usize,
        section_id: &str,
        user_choice: &str,
    ) -> Result<Option<&Value>, CatalogError> {
        let p = self.phase(phase)?;
        Ok(p.sections
            .iter()
            .find(|s| s.section_id.as_deref() == Some(section_id))
            .and_then(|s| s.customized_directions.get(user_choice)))
    }

    /// First roadmap registered under `key`, searching sections in document order.
    pub fn roadmap(&self, key: &str) -> Option<&Roadmap> {
        self.document
            .workflow_phases
            .iter()
            .flat_map(|p| p.sections.iter())
            .find_map(|s| s.implementation_roadmaps.get(key))
    }

    fn phase(&self, phase: usize) -> Result<&Phase, CatalogError> {
        phase
            .checked_sub(1)
            .and_then(|i| self.document.workflow_phases.get(i))
            .ok_or(CatalogError::PhaseOutOfRange {
                phase,
                loaded: self.phase_count(),
            })
    }
}
