// SPDX-License-Identifier: MIT

//! Graph builder - registers nodes and edges, validates on compile
//!
//! Registration never fails; problems such as duplicate nodes are recorded
//! and reported by `compile`, so a builder chain reads top to bottom.

use super::executor::CompiledGraph;
use super::types::{Edge, NodeId, RouteLabel, Target};
use crate::adk::error::{GraphError, NodeError};
use crate::adk::node::Node;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

/// Mutable graph definition; call `compile` to obtain an executable graph
pub struct StateGraph<S, N, L> {
    nodes: HashMap<N, Arc<dyn Node<S>>>,
    /// Registration order, for deterministic validation and descriptions
    order: Vec<N>,
    edges: HashMap<N, Edge<S, N, L>>,
    entry: Option<N>,
    deferred: Vec<GraphError>,
    _label: PhantomData<L>,
}

impl<S, N, L> StateGraph<S, N, L>
where
    S: Send + 'static,
    N: NodeId,
    L: RouteLabel,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            edges: HashMap::new(),
            entry: None,
            deferred: Vec::new(),
            _label: PhantomData,
        }
    }

    /// Register a node under `id`
    pub fn add_node(&mut self, id: N, node: impl Node<S> + 'static) -> &mut Self {
        if self.nodes.insert(id, Arc::new(node)).is_some() {
            self.deferred.push(GraphError::DuplicateNode(id.to_string()));
        } else {
            self.order.push(id);
        }
        self
    }

    /// Unconditional edge `from -> to`
    pub fn add_edge(&mut self, from: N, to: Target<N>) -> &mut Self {
        self.insert_edge(from, Edge::Direct(to))
    }

    /// Conditional edge: after `from` runs, `resolver` picks a label and the
    /// matching target is followed. A repeated label keeps its last target.
    /// A resolver error fails the run as an error of `from`.
    pub fn add_conditional_edges<F>(
        &mut self,
        from: N,
        resolver: F,
        routes: impl IntoIterator<Item = (L, Target<N>)>,
    ) -> &mut Self
    where
        F: Fn(&S) -> Result<L, NodeError> + Send + Sync + 'static,
    {
        let mut table: Vec<(L, Target<N>)> = Vec::new();
        for (label, target) in routes {
            match table.iter_mut().find(|(l, _)| *l == label) {
                Some(existing) => existing.1 = target,
                None => table.push((label, target)),
            }
        }

        self.insert_edge(
            from,
            Edge::Conditional {
                resolver: Arc::new(resolver),
                routes: table,
            },
        )
    }

    /// Designate the first node to run
    pub fn set_entry_point(&mut self, id: N) -> &mut Self {
        self.entry = Some(id);
        self
    }

    fn insert_edge(&mut self, from: N, edge: Edge<S, N, L>) -> &mut Self {
        if self.edges.insert(from, edge).is_some() {
            self.deferred.push(GraphError::DuplicateEdge(from.to_string()));
        }
        self
    }

    /// Validate the definition and freeze it.
    ///
    /// Checks: an entry is set and registered, every edge source and target
    /// is registered (or the terminal), conditional edges have labels, every
    /// node reachable from the entry has an outgoing edge, and no cycle is
    /// reachable. With those in place every path from the entry ends at the
    /// terminal.
    pub fn compile(mut self) -> Result<CompiledGraph<S, N, L>, GraphError> {
        if !self.deferred.is_empty() {
            return Err(self.deferred.remove(0));
        }

        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        if !self.nodes.contains_key(&entry) {
            return Err(GraphError::UnknownNode(entry.to_string()));
        }

        for id in &self.order {
            let Some(edge) = self.edges.get(id) else {
                continue;
            };
            if let Edge::Conditional { routes, .. } = edge {
                if routes.is_empty() {
                    return Err(GraphError::EmptyLabelMap(id.to_string()));
                }
            }
            for target in edge.targets() {
                if let Target::Node(to) = target {
                    if !self.nodes.contains_key(&to) {
                        return Err(GraphError::UnknownNode(to.to_string()));
                    }
                }
            }
        }

        if let Some(from) = self.edges.keys().find(|id| !self.nodes.contains_key(*id)) {
            return Err(GraphError::UnknownNode(from.to_string()));
        }

        let mut marks: HashMap<N, Visit> = HashMap::new();
        let mut path: Vec<N> = Vec::new();
        self.visit(entry, &mut marks, &mut path)?;

        for id in self.order.iter().filter(|id| !marks.contains_key(*id)) {
            log::warn!("Node {} is unreachable from entry {}", id, entry);
        }

        Ok(CompiledGraph::new(self.nodes, self.edges, entry, self.order))
    }

    /// Depth-first walk from `id`, rejecting dead ends and back edges
    fn visit(
        &self,
        id: N,
        marks: &mut HashMap<N, Visit>,
        path: &mut Vec<N>,
    ) -> Result<(), GraphError> {
        match marks.get(&id) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let start = path.iter().position(|n| *n == id).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(id.to_string());
                return Err(GraphError::CycleDetected(cycle));
            }
            None => {}
        }

        let edge = self
            .edges
            .get(&id)
            .ok_or_else(|| GraphError::MissingEdge(id.to_string()))?;

        marks.insert(id, Visit::InProgress);
        path.push(id);
        for target in edge.targets() {
            if let Target::Node(next) = target {
                self.visit(next, marks, path)?;
            }
        }
        path.pop();
        marks.insert(id, Visit::Done);

        Ok(())
    }
}

impl<S, N, L> Default for StateGraph<S, N, L>
where
    S: Send + 'static,
    N: NodeId,
    L: RouteLabel,
{
    fn default() -> Self {
        Self::new()
    }
}
