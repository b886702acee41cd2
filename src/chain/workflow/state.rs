// SPDX-License-Identifier: MIT

//! Per-invocation state threaded through the question graph

use crate::adk::error::NodeError;
use crate::adk::model::Model;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// State for one question.
///
/// `answer` is only ever set after `classification` is `true`.
#[derive(Clone, Serialize)]
pub struct QuestionState {
    question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    /// Model handle produced by the build-model node
    #[serde(skip)]
    model: Option<Arc<dyn Model>>,
}

impl QuestionState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            classification: None,
            answer: None,
            model: None,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn classification(&self) -> Option<bool> {
        self.classification
    }

    pub fn set_classification(&mut self, is_ml: bool) {
        self.classification = Some(is_ml);
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = Some(answer.into());
    }

    pub fn set_model(&mut self, model: Arc<dyn Model>) {
        self.model = Some(model);
    }

    /// The model handle, or `MissingField` if the build-model node has not run
    pub fn model(&self) -> Result<Arc<dyn Model>, NodeError> {
        self.model.clone().ok_or(NodeError::MissingField("model"))
    }

    /// Serializable fields as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl fmt::Debug for QuestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionState")
            .field("question", &self.question)
            .field("classification", &self.classification)
            .field("answer", &self.answer)
            .field("model", &self.model.as_ref().map(|m| m.provider()))
            .finish()
    }
}
