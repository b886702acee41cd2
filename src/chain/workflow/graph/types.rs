// SPDX-License-Identifier: MIT

//! Graph type definitions
//!
//! Node identities and route labels are small `Copy` types (usually enums),
//! so every lookup in the executor is a table lookup rather than a string
//! comparison.

use crate::adk::error::NodeError;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identity of a node in a graph. `Display` gives the node's name.
pub trait NodeId: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> NodeId for T where
    T: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

/// Label returned by a conditional edge resolver
pub trait RouteLabel: Copy + Eq + fmt::Debug + Send + Sync + 'static {}

impl<T> RouteLabel for T where T: Copy + Eq + fmt::Debug + Send + Sync + 'static {}

/// Where an edge leads: another node or the terminal sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target<N> {
    Node(N),
    End,
}

impl<N: fmt::Display> fmt::Display for Target<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(id) => write!(f, "{}", id),
            Target::End => write!(f, "__end__"),
        }
    }
}

/// Inspects state after a node runs and picks a label. Fails when the node
/// left the fields it reads unset.
pub type Resolver<S, L> = Arc<dyn Fn(&S) -> Result<L, NodeError> + Send + Sync>;

/// Outgoing edge of a node
pub enum Edge<S, N, L> {
    /// Always follow to the target
    Direct(Target<N>),
    /// Ask the resolver for a label, then look up its target
    Conditional {
        resolver: Resolver<S, L>,
        /// Label map in registration order
        routes: Vec<(L, Target<N>)>,
    },
}

impl<S, N: Copy, L: RouteLabel> Edge<S, N, L> {
    /// All targets this edge can lead to
    pub fn targets(&self) -> Vec<Target<N>> {
        match self {
            Edge::Direct(target) => vec![*target],
            Edge::Conditional { routes, .. } => routes.iter().map(|(_, t)| *t).collect(),
        }
    }

    /// Target registered for a label, if any
    pub fn route(&self, label: L) -> Option<Target<N>> {
        match self {
            Edge::Direct(target) => Some(*target),
            Edge::Conditional { routes, .. } => routes
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, t)| *t),
        }
    }
}
