//! Error types for graph operations
//!
//! This module hides error representation details and provides
//! a unified error type for all graph operations.

use crate::NodeId;
use thiserror::Error;

/// Result type for graph operations
pub type DagResult<T> = Result<T, DagError>;

/// Errors that can occur during graph operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DagError {
    /// A node was inserted under an identifier that already has a value
    #[error("duplicate node: {id}")]
    DuplicateNode {
        /// The identifier that was inserted twice
        id: NodeId,
    },

    /// No value is attached to the identifier
    ///
    /// The identifier may still be structurally known as an edge endpoint.
    #[error("node not found: {id}")]
    NodeNotFound {
        /// The identifier with no attached value
        id: NodeId,
    },

    /// A cycle was detected in the graph
    #[error("cycle detected: {path}")]
    CycleDetected {
        /// Human-readable description of the cycle path
        path: String,
    },
}

impl DagError {
    /// Creates a duplicate node error
    pub fn duplicate_node(id: NodeId) -> Self {
        Self::DuplicateNode { id }
    }

    /// Creates a node not found error
    pub fn node_not_found(id: NodeId) -> Self {
        Self::NodeNotFound { id }
    }

    /// Creates a cycle detected error with the given path
    pub fn cycle(path: impl Into<String>) -> Self {
        Self::CycleDetected { path: path.into() }
    }
}
