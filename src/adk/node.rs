// SPDX-License-Identifier: MIT

//! Node trait - a single state transformation in a workflow graph

use crate::adk::error::NodeError;
use async_trait::async_trait;

/// A unit of work that consumes the shared state and returns it updated.
///
/// Nodes close over whatever collaborators they need (model factories,
/// prompts). The executor runs one node at a time.
#[async_trait]
pub trait Node<S>: Send + Sync {
    async fn run(&self, state: S) -> Result<S, NodeError>;
}

/// Adapter turning a plain function into a node
pub struct FnNode<F>(pub F);

/// Wrap a closure as a node; the bound lets the closure's types be inferred
pub fn from_fn<S, F>(f: F) -> FnNode<F>
where
    F: Fn(S) -> Result<S, NodeError> + Send + Sync,
{
    FnNode(f)
}

#[async_trait]
impl<S, F> Node<S> for FnNode<F>
where
    S: Send + 'static,
    F: Fn(S) -> Result<S, NodeError> + Send + Sync,
{
    async fn run(&self, state: S) -> Result<S, NodeError> {
        (self.0)(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_node() {
        let node = from_fn(|n: u32| Ok(n * 2));
        assert_eq!(node.run(21).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_fn_node_error() {
        let node = from_fn(|_: u32| Err(NodeError::MissingField("classification")));
        let err = node.run(1).await.unwrap_err();
        assert_eq!(err.to_string(), "state field 'classification' is not set");
    }
}
