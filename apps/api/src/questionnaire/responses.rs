//! Per-session response store.
//!
//! Answers are keyed by question id with last-write-wins semantics. The store is tolerant:
//! ids that the catalog does not define are still stored (their value shape is inferred from
//! the JSON), they simply never contribute to category scores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::questionnaire::catalog::QuestionCatalog;
use crate::questionnaire::models::QuestionType;

#[derive(Debug, Error, PartialEq)]
pub enum ResponseError {
    #[error("question_id must not be empty")]
    EmptyQuestionId,

    #[error("response value is missing for '{0}'")]
    MissingValue(String),

    #[error("'{question_id}' expects a {expected} answer")]
    TypeMismatch {
        question_id: String,
        expected: &'static str,
    },

    #[error("unsupported response value for '{0}'")]
    UnsupportedValue(String),
}

/// A stored answer, shaped by the question type it answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Text(String),
    Boolean(bool),
    Single(String),
    Multiple(Vec<String>),
}

impl ResponseValue {
    /// Converts a submitted JSON value using the question's declared type when known,
    /// otherwise inferring the shape from the JSON itself.
    pub fn from_json(
        question_id: &str,
        value: Value,
        declared: Option<QuestionType>,
    ) -> Result<Self, ResponseError> {
        let mismatch = |expected: &'static str| ResponseError::TypeMismatch {
            question_id: question_id.to_string(),
            expected,
        };

        match (declared, value) {
            (_, Value::Null) => Err(ResponseError::MissingValue(question_id.to_string())),

            (Some(QuestionType::Text), Value::String(s)) => Ok(ResponseValue::Text(s)),
            (Some(QuestionType::SingleChoice), Value::String(s)) => Ok(ResponseValue::Single(s)),
            (Some(QuestionType::MultipleChoice), Value::String(s)) => {
                Ok(ResponseValue::Multiple(vec![s]))
            }
            (Some(QuestionType::MultipleChoice), Value::Array(items)) => {
                string_list(items).map(ResponseValue::Multiple).ok_or_else(|| mismatch("list of strings"))
            }
            (
                Some(QuestionType::Boolean | QuestionType::BooleanWithDetails),
                Value::Bool(b),
            ) => Ok(ResponseValue::Boolean(b)),
            (Some(QuestionType::MultipleChoice), _) => Err(mismatch("list of strings")),
            (Some(QuestionType::Boolean | QuestionType::BooleanWithDetails), _) => {
                Err(mismatch("boolean"))
            }
            (Some(QuestionType::Text | QuestionType::SingleChoice), _) => Err(mismatch("string")),

            (None, Value::String(s)) => Ok(ResponseValue::Text(s)),
            (None, Value::Bool(b)) => Ok(ResponseValue::Boolean(b)),
            (None, Value::Number(n)) => Ok(ResponseValue::Text(n.to_string())),
            (None, Value::Array(items)) => string_list(items)
                .map(ResponseValue::Multiple)
                .ok_or_else(|| ResponseError::UnsupportedValue(question_id.to_string())),
            (None, Value::Object(_)) => {
                Err(ResponseError::UnsupportedValue(question_id.to_string()))
            }
        }
    }

    /// Whether the answer counts toward category scores: non-empty text,
    /// `true`, or at least one selection.
    pub fn is_answered(&self) -> bool {
        match self {
            ResponseValue::Text(s) | ResponseValue::Single(s) => !s.is_empty(),
            ResponseValue::Boolean(b) => *b,
            ResponseValue::Multiple(v) => !v.is_empty(),
        }
    }

    /// Textual selections carried by the answer. Booleans carry none.
    pub fn selections(&self) -> Vec<&str> {
        match self {
            ResponseValue::Text(s) | ResponseValue::Single(s) => vec![s.as_str()],
            ResponseValue::Multiple(v) => v.iter().map(String::as_str).collect(),
            ResponseValue::Boolean(_) => vec![],
        }
    }

    /// The answer as a single string, for text and single-choice answers only.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(s) | ResponseValue::Single(s) => Some(s),
            _ => None,
        }
    }
}

fn string_list(items: Vec<Value>) -> Option<Vec<String>> {
    items
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub question_id: String,
    pub value: ResponseValue,
    pub additional_details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One entry of a batch submission as received over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub additional_details: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BatchOutcome {
    pub submitted_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub progress_percentage: f64,
    pub answered_required: usize,
    pub total_required: usize,
    pub total_questions: usize,
    /// Answers stored in the session, including optional and unknown questions.
    pub total_answered: usize,
}

#[derive(Debug, Default)]
pub struct ResponseStore {
    responses: BTreeMap<String, Response>,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an already-typed answer, replacing any previous one for the same id.
    pub fn insert(
        &mut self,
        question_id: impl Into<String>,
        value: ResponseValue,
        additional_details: Option<String>,
    ) -> &Response {
        let question_id = question_id.into();
        let response = Response {
            question_id: question_id.clone(),
            value,
            additional_details,
            timestamp: Utc::now(),
        };
        self.responses.insert(question_id.clone(), response);
        &self.responses[&question_id]
    }

    /// Converts and stores a submitted answer.
    pub fn submit(
        &mut self,
        catalog: &QuestionCatalog,
        question_id: &str,
        value: Value,
        additional_details: Option<String>,
    ) -> Result<&Response, ResponseError> {
        let question_id = question_id.trim();
        if question_id.is_empty() {
            return Err(ResponseError::EmptyQuestionId);
        }

        let declared = catalog.find_question(question_id).map(|q| q.question_type);
        if declared.is_none() {
            debug!("Storing response for unknown question id '{question_id}'");
        }

        let value = ResponseValue::from_json(question_id, value, declared)?;
        debug!("Response submitted for {question_id}");
        Ok(self.insert(question_id, value, additional_details))
    }

    /// Applies each item independently. Items with an empty id, a null value or a value
    /// that cannot be stored are skipped and never abort the batch.
    pub fn submit_batch(&mut self, catalog: &QuestionCatalog, items: Vec<BatchItem>) -> BatchOutcome {
        let total_count = items.len();
        let mut submitted_count = 0;

        for item in items {
            let id = item.question_id.unwrap_or_default();
            let value = item.response.unwrap_or(Value::Null);
            match self.submit(catalog, &id, value, item.additional_details) {
                Ok(_) => submitted_count += 1,
                Err(e) => debug!("Skipping batch item: {e}"),
            }
        }

        BatchOutcome {
            submitted_count,
            total_count,
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&Response> {
        self.responses.get(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Response> {
        self.responses.values()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn clear(&mut self) {
        self.responses.clear();
    }

    /// Percentage of required questions answered; 100.0 when nothing is required.
    pub fn progress(&self, catalog: &QuestionCatalog) -> f64 {
        self.progress_report(catalog).progress_percentage
    }

    pub fn progress_report(&self, catalog: &QuestionCatalog) -> ProgressReport {
        let (answered_required, total_required) =
            catalog
                .required_questions()
                .fold((0, 0), |(answered, total), q| {
                    let hit = self.responses.contains_key(&q.question_id);
                    (answered + usize::from(hit), total + 1)
                });

        let progress_percentage = if total_required == 0 {
            100.0
        } else {
            answered_required as f64 / total_required as f64 * 100.0
        };

        ProgressReport {
            progress_percentage,
            answered_required,
            total_required,
            total_questions: catalog.all_questions().len(),
            total_answered: self.len(),
        }
    }
}
