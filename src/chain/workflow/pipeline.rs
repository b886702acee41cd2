// SPDX-License-Identifier: MIT

//! The question graph: build model, classify, then answer or stop
//!
//! ```text
//! build_model -> classify -> {Continue: answer -> END, Exit: END}
//! ```

use crate::adk::error::{GraphError, NodeError};
use crate::adk::model::{GenerationConfig, ModelFactory};
use crate::chain::workflow::graph::{CompiledGraph, StateGraph, Target};
use crate::chain::workflow::nodes::{AnswerNode, BuildModelNode, ClassifyNode};
use crate::chain::workflow::state::QuestionState;
use std::fmt;
use std::sync::Arc;

/// Node identities of the question graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    BuildModel,
    Classify,
    Answer,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::BuildModel => "build_model",
            Step::Classify => "classify",
            Step::Answer => "answer",
        };
        write!(f, "{}", name)
    }
}

/// Labels of the branch after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Continue,
    Exit,
}

pub type QuestionGraph = CompiledGraph<QuestionState, Step, Route>;

/// Continue to the answer node for machine-learning questions, exit otherwise.
///
/// An unset classification means the classify node broke its contract; it is
/// an error, never an implicit `Exit`.
pub fn route_on_topic(state: &QuestionState) -> Result<Route, NodeError> {
    match state.classification() {
        Some(true) => Ok(Route::Continue),
        Some(false) => Ok(Route::Exit),
        None => Err(NodeError::MissingField("classification")),
    }
}

/// Assemble and validate the question graph.
///
/// The same graph serves every question; each `invoke` gets a fresh state.
pub fn build_question_graph(
    factory: Arc<dyn ModelFactory>,
    generation: GenerationConfig,
) -> Result<QuestionGraph, GraphError> {
    let mut graph = StateGraph::new();
    graph
        .add_node(Step::BuildModel, BuildModelNode::new(factory))
        .add_node(Step::Classify, ClassifyNode::new(generation.clone()))
        .add_node(Step::Answer, AnswerNode::new(generation))
        .set_entry_point(Step::BuildModel)
        .add_edge(Step::BuildModel, Target::Node(Step::Classify))
        .add_conditional_edges(
            Step::Classify,
            route_on_topic,
            [
                (Route::Continue, Target::Node(Step::Answer)),
                (Route::Exit, Target::End),
            ],
        )
        .add_edge(Step::Answer, Target::End);

    let compiled = graph.compile()?;
    log::debug!("Question graph:\n{}", compiled.describe());
    Ok(compiled)
}
