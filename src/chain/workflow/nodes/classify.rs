// SPDX-License-Identifier: MIT

//! Classify node - decides whether the question concerns machine learning
//!
//! The model is asked for structured output with a single boolean field.
//! Anything that does not match that contract is a classification error;
//! nothing is coerced to `false`.

use crate::adk::error::NodeError;
use crate::adk::model::{Content, GenerationConfig, ResponseSchema};
use crate::adk::node::Node;
use crate::chain::workflow::state::QuestionState;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::Deserialize;

pub const CLASSIFY_INSTRUCTION: &str = "You are a classifier. Determine if the user question is related to machine learning. \
Given the user question, return True if it is related to machine learning, otherwise return False.";

/// Structured reply expected from the classifier
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradeOutput {
    pub from_ml_topic_grade: bool,
}

static GRADE_SCHEMA: Lazy<ResponseSchema> = Lazy::new(|| {
    let mut schema = serde_json::to_value(schemars::schema_for!(GradeOutput)).unwrap_or_default();
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
    }
    ResponseSchema {
        name: "GradeOutput".to_string(),
        schema,
    }
});

pub struct ClassifyNode {
    generation: GenerationConfig,
}

impl ClassifyNode {
    pub fn new(generation: GenerationConfig) -> Self {
        Self { generation }
    }

    /// Schema sent with every classification request
    pub fn response_schema() -> &'static ResponseSchema {
        &GRADE_SCHEMA
    }

    /// Parse the model's reply strictly against `GradeOutput`
    pub fn parse_grade(raw: &str) -> Result<bool, NodeError> {
        serde_json::from_str::<GradeOutput>(raw.trim())
            .map(|grade| grade.from_ml_topic_grade)
            .map_err(|e| {
                NodeError::Classification(format!(
                    "reply {:?} does not match GradeOutput: {}",
                    raw, e
                ))
            })
    }
}

#[async_trait]
impl Node<QuestionState> for ClassifyNode {
    async fn run(&self, mut state: QuestionState) -> Result<QuestionState, NodeError> {
        log::info!("Checking whether the question is related to machine learning");
        let model = state.model()?;

        let history = [
            Content::system(CLASSIFY_INSTRUCTION),
            Content::user(format!("User question \n\n {}", state.question())),
        ];
        let response = model
            .generate_content(&history, Some(&self.generation), Some(&GRADE_SCHEMA))
            .await?;

        let is_ml = Self::parse_grade(&response.text())?;
        log::info!("Classification: from_ml_topic={}", is_ml);
        state.set_classification(is_ml);
        Ok(state)
    }
}
