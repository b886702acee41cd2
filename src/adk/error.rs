// SPDX-License-Identifier: MIT

//! Typed error handling for prompt-chain-rs
//!
//! Each layer has its own error enum: `ModelError` for the text-generation
//! collaborator, `NodeError` for node transformations, `GraphError` for graph
//! construction and dispatch, and `ChainError` as the top-level type returned
//! by graph invocation and configuration loading.

use thiserror::Error;

/// Top-level error type for prompt-chain-rs
#[derive(Debug, Error)]
pub enum ChainError {
    /// Configuration errors (missing credential, invalid config file or values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed graph definition or an unrouted resolver label
    #[error("Graph configuration error: {0}")]
    Graph(#[from] GraphError),

    /// A node failed while running; execution halted at that node
    #[error("Node '{node}' failed: {source}")]
    Node {
        node: String,
        #[source]
        source: NodeError,
    },

    /// I/O errors (config file, console)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Graph definition and dispatch errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// No entry point was designated before compiling
    #[error("no entry point set")]
    MissingEntry,

    /// An edge or the entry point references a node that was never added
    #[error("node '{0}' is not registered")]
    UnknownNode(String),

    /// The same node was added twice
    #[error("node '{0}' is registered more than once")]
    DuplicateNode(String),

    /// A node declares more than one outgoing edge
    #[error("node '{0}' has more than one outgoing edge")]
    DuplicateEdge(String),

    /// A node reachable from the entry has no outgoing edge
    #[error("node '{0}' has no outgoing edge")]
    MissingEdge(String),

    /// A conditional edge was registered with no labels
    #[error("conditional edge from '{0}' has an empty label map")]
    EmptyLabelMap(String),

    /// A cycle is reachable from the entry point
    #[error("cycle detected: {0:?}")]
    CycleDetected(Vec<String>),

    /// A resolver returned a label that has no registered target
    #[error("resolver for '{node}' returned unrouted label '{label}'")]
    UnroutedLabel { node: String, label: String },
}

/// Failures of a single node transformation
#[derive(Debug, Error)]
pub enum NodeError {
    /// The text-generation collaborator failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Structured classification output did not match the boolean-field contract
    #[error("Classification error: {0}")]
    Classification(String),

    /// The collaborator returned no answer text
    #[error("model returned an empty answer")]
    EmptyAnswer,

    /// A field the node depends on was not set by an earlier node
    #[error("state field '{0}' is not set")]
    MissingField(&'static str),
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for {0}")]
    ApiKeyMissing(String),

    /// Non-success HTTP status from the provider
    #[error("API error from {provider} ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    /// HTTP transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ChainError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap a node failure with the failing node's name
    pub fn node(node: impl Into<String>, source: NodeError) -> Self {
        Self::Node {
            node: node.into(),
            source,
        }
    }

    /// Whether the interactive loop may report this error and keep going.
    ///
    /// Only node failures are recoverable; configuration and graph errors
    /// indicate a defect that re-prompting cannot fix.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Node { .. })
    }
}

impl ModelError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}
