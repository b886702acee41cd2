// SPDX-License-Identifier: MIT

//! Build-model node - creates the model handle for this invocation

use crate::adk::error::NodeError;
use crate::adk::model::ModelFactory;
use crate::adk::node::Node;
use crate::chain::workflow::state::QuestionState;
use async_trait::async_trait;
use std::sync::Arc;

pub struct BuildModelNode {
    factory: Arc<dyn ModelFactory>,
}

impl BuildModelNode {
    pub fn new(factory: Arc<dyn ModelFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl Node<QuestionState> for BuildModelNode {
    async fn run(&self, mut state: QuestionState) -> Result<QuestionState, NodeError> {
        let model = self.factory.build()?;
        log::info!("Built model client for provider {}", model.provider());
        state.set_model(model);
        Ok(state)
    }
}
