// SPDX-License-Identifier: MIT

//! Graph executor - single-pass run from entry to terminal

use super::types::{Edge, NodeId, RouteLabel, Target};
use crate::adk::error::{ChainError, GraphError};
use crate::adk::node::Node;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::sync::Arc;

/// Validated, immutable graph ready for `invoke`
pub struct CompiledGraph<S, N, L> {
    nodes: HashMap<N, Arc<dyn Node<S>>>,
    edges: HashMap<N, Edge<S, N, L>>,
    entry: N,
    order: Vec<N>,
}

impl<S, N, L> CompiledGraph<S, N, L>
where
    S: Send + 'static,
    N: NodeId,
    L: RouteLabel,
{
    pub(super) fn new(
        nodes: HashMap<N, Arc<dyn Node<S>>>,
        edges: HashMap<N, Edge<S, N, L>>,
        entry: N,
        order: Vec<N>,
    ) -> Self {
        Self {
            nodes,
            edges,
            entry,
            order,
        }
    }

    pub fn entry(&self) -> N {
        self.entry
    }

    /// Run the graph once from the entry node until the terminal.
    ///
    /// A node failure halts the run and is returned with the node's name;
    /// no partial state is handed back.
    pub async fn invoke(&self, initial: S) -> Result<S, ChainError> {
        let mut state = initial;
        let mut current = self.entry;
        let mut visited: HashSet<N> = HashSet::new();

        loop {
            if !visited.insert(current) {
                return Err(GraphError::CycleDetected(vec![current.to_string()]).into());
            }

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::UnknownNode(current.to_string()))?;

            log::info!("Executing node: {}", current);
            state = match node.run(state).await {
                Ok(next_state) => next_state,
                Err(e) => {
                    log::error!("Node {} failed: {}", current, e);
                    return Err(ChainError::node(current.to_string(), e));
                }
            };
            log::info!("Node {} completed", current);

            match self.next_target(current, &state)? {
                Target::Node(next) => current = next,
                Target::End => {
                    log::info!("Graph reached terminal after {}", current);
                    return Ok(state);
                }
            }
        }
    }

    /// Follow the outgoing edge of `current`, consulting the resolver for
    /// conditional edges. A resolver failure is reported against `current`.
    fn next_target(&self, current: N, state: &S) -> Result<Target<N>, ChainError> {
        let edge = self
            .edges
            .get(&current)
            .ok_or_else(|| GraphError::MissingEdge(current.to_string()))?;

        match edge {
            Edge::Direct(target) => Ok(*target),
            Edge::Conditional { resolver, .. } => {
                let label = resolver(state).map_err(|e| {
                    log::error!("Resolver after {} failed: {}", current, e);
                    ChainError::node(current.to_string(), e)
                })?;
                let target = edge.route(label).ok_or_else(|| GraphError::UnroutedLabel {
                    node: current.to_string(),
                    label: format!("{:?}", label),
                })?;
                log::info!("Route {:?} from {} -> {}", label, current, target);
                Ok(target)
            }
        }
    }

    /// Human-readable listing of nodes and edges in registration order
    pub fn describe(&self) -> String {
        let mut out = format!("entry: {}\n", self.entry);
        for id in &self.order {
            match self.edges.get(id) {
                Some(Edge::Direct(target)) => {
                    let _ = writeln!(out, "{} -> {}", id, target);
                }
                Some(Edge::Conditional { routes, .. }) => {
                    let arms: Vec<String> = routes
                        .iter()
                        .map(|(label, target)| format!("{:?}: {}", label, target))
                        .collect();
                    let _ = writeln!(out, "{} -> {{{}}}", id, arms.join(", "));
                }
                None => {
                    let _ = writeln!(out, "{} (no outgoing edge)", id);
                }
            }
        }
        out
    }
}
