// SPDX-License-Identifier: MIT

pub mod graph;
pub mod nodes;
pub mod pipeline;
pub mod state;

pub use pipeline::{build_question_graph, route_on_topic, QuestionGraph, Route, Step};
pub use state::QuestionState;
