// SPDX-License-Identifier: MIT

//! Scripted model for tests and offline runs.
//!
//! Returns one fixed reply for structured-output requests and another for
//! free-text requests, and records every request it receives.

use super::{Content, GenerationConfig, Model, ResponseSchema};
use crate::adk::error::ModelError;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// A request as seen by the scripted model
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub history: Vec<Content>,
    pub config: Option<GenerationConfig>,
    pub schema: Option<ResponseSchema>,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure { status: u16, message: String },
}

/// Deterministic stand-in for a hosted model
#[derive(Debug, Default)]
pub struct ScriptedModel {
    structured: Option<Reply>,
    text: Option<Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model whose structured reply is a well-formed topic grade
    pub fn classifying(is_ml: bool) -> Self {
        Self::new().with_structured(json!({ "from_ml_topic_grade": is_ml }).to_string())
    }

    /// Raw text returned when a response schema is requested
    pub fn with_structured(mut self, raw: impl Into<String>) -> Self {
        self.structured = Some(Reply::Text(raw.into()));
        self
    }

    /// Text returned for free-text requests
    pub fn with_answer(mut self, text: impl Into<String>) -> Self {
        self.text = Some(Reply::Text(text.into()));
        self
    }

    /// Fail every request with the given HTTP status
    pub fn with_failure(mut self, status: u16, message: impl Into<String>) -> Self {
        let reply = Reply::Failure {
            status,
            message: message.into(),
        };
        self.structured = Some(reply.clone());
        self.text = Some(reply);
        self
    }

    /// Requests received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl Model for ScriptedModel {
    fn provider(&self) -> &str {
        "scripted"
    }

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        response_schema: Option<&ResponseSchema>,
    ) -> Result<Content, ModelError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                history: history.to_vec(),
                config: config.cloned(),
                schema: response_schema.cloned(),
            });

        let reply = if response_schema.is_some() {
            &self.structured
        } else {
            &self.text
        };

        match reply {
            Some(Reply::Text(text)) => Ok(Content::model(text.clone())),
            Some(Reply::Failure { status, message }) => {
                Err(ModelError::api(self.provider(), *status, message.clone()))
            }
            None => Err(ModelError::invalid("no scripted reply for this request")),
        }
    }
}
