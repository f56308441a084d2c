//! Node identifier type
//!
//! This module defines the [`NodeId`] type which uniquely identifies a node
//! within a graph. Identifiers are opaque string tokens supplied by the
//! embedding system; the engine never interprets their content.
//!
//! # Design Decision
//!
//! `NodeId` derives `Ord` from its underlying string, so "ascending
//! identifier order" means lexicographic byte order everywhere in this
//! crate. That total order is what makes [`crate::Dag::ids`],
//! [`crate::Dag::validate`] and [`crate::Dag::order`] deterministic
//! regardless of insertion order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node within a [`crate::Dag`].
///
/// # Examples
///
/// ```
/// use taxis::NodeId;
///
/// let id = NodeId::new("deploy_service");
/// assert_eq!(id.as_str(), "deploy_service");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new node identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
