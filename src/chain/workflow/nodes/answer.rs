// SPDX-License-Identifier: MIT

//! Answer node - answers a machine-learning question

use crate::adk::error::NodeError;
use crate::adk::model::{Content, GenerationConfig};
use crate::adk::node::Node;
use crate::chain::workflow::state::QuestionState;
use async_trait::async_trait;

pub const ANSWER_INSTRUCTION: &str =
    "You are an expert in machine learning. Answer the user's query under 200 words.";

/// Word limit stated in the instruction. Longer answers are kept, but logged.
pub const ANSWER_WORD_LIMIT: usize = 200;

pub struct AnswerNode {
    generation: GenerationConfig,
}

impl AnswerNode {
    pub fn new(generation: GenerationConfig) -> Self {
        Self { generation }
    }
}

#[async_trait]
impl Node<QuestionState> for AnswerNode {
    async fn run(&self, mut state: QuestionState) -> Result<QuestionState, NodeError> {
        log::info!("Answering the user's query");
        let model = state.model()?;

        let history = [
            Content::system(ANSWER_INSTRUCTION),
            Content::user(format!("User's Query: \n\n {}", state.question())),
        ];
        let response = model
            .generate_content(&history, Some(&self.generation), None)
            .await?;

        let answer = response.text();
        if answer.trim().is_empty() {
            return Err(NodeError::EmptyAnswer);
        }

        let words = answer.split_whitespace().count();
        if words > ANSWER_WORD_LIMIT {
            log::warn!(
                "Answer has {} words, over the {} word instruction",
                words,
                ANSWER_WORD_LIMIT
            );
        }

        state.set_answer(answer);
        Ok(state)
    }
}
