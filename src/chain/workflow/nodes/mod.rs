// SPDX-License-Identifier: MIT

//! Nodes of the question graph
//!
//! - `BuildModelNode` - creates the model client from configuration
//! - `ClassifyNode` - structured yes/no topic classification
//! - `AnswerNode` - free-text expert answer

mod answer;
mod build_model;
mod classify;

pub use answer::{AnswerNode, ANSWER_INSTRUCTION, ANSWER_WORD_LIMIT};
pub use build_model::BuildModelNode;
pub use classify::{ClassifyNode, GradeOutput, CLASSIFY_INSTRUCTION};
