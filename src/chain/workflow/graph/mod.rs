// SPDX-License-Identifier: MIT

//! Conditional workflow graph
//!
//! This module provides the graph builder, which validates a definition once,
//! and the executor that runs a compiled graph from entry to terminal.

mod builder;
pub mod executor;
pub mod types;

pub use builder::StateGraph;
pub use executor::CompiledGraph;
pub use types::{Edge, NodeId, Resolver, RouteLabel, Target};
