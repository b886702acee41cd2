// SPDX-License-Identifier: MIT

//! Model module - defines the text-generation collaborator trait
//!
//! This module provides the core Model trait and shared types.
//! Implementations live in their own submodules:
//! - [openai] - OpenAI-compatible chat completions (Groq by default)
//! - [mock] - scripted responses for tests

pub mod mock;
pub mod openai;

use crate::adk::error::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Reasoning content from thinking models (e.g. gpt-oss on Groq)
    Thinking(String),
}

impl Content {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, skipping thinking output
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect()
    }
}

/// A named JSON schema the model's reply must conform to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

/// Core trait for text-generation collaborators
#[async_trait]
pub trait Model: Send + Sync {
    /// Provider label used in logs and errors
    fn provider(&self) -> &str;

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        response_schema: Option<&ResponseSchema>,
    ) -> Result<Content, ModelError>;
}

/// Builds a model handle from configuration supplied up front.
///
/// The build-model node calls this once per invocation.
pub trait ModelFactory: Send + Sync {
    fn build(&self) -> Result<Arc<dyn Model>, ModelError>;
}

impl<F> ModelFactory for F
where
    F: Fn() -> Result<Arc<dyn Model>, ModelError> + Send + Sync,
{
    fn build(&self) -> Result<Arc<dyn Model>, ModelError> {
        self()
    }
}
