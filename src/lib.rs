//! Taxis: Deterministic DAG Engine
//!
//! `taxis` (τάξις, Greek for "arrangement" or "ordering") is a small
//! directed-acyclic-graph engine for embedding in task runners and
//! dependency resolvers. It lets a caller register nodes with arbitrary
//! attached values, declare ordering constraints via predecessor and
//! successor hints, detect cycles with a human-readable offending path, and
//! compute a deterministic global ordering of all nodes.
//!
//! # Features
//!
//! - **Generic payloads**: node values are an unconstrained type parameter
//! - **Cycle detection**: validation reports the offending path and caches
//!   which identifiers participate in the cycle
//! - **Deterministic ordering**: traversals break every tie by ascending
//!   identifier order, so output depends only on graph shape
//! - **Lazy re-validation**: mutation invalidates cached findings; the next
//!   cycle query re-validates automatically
//!
//! # Quick Start
//!
//! ```
//! use taxis::{Dag, NodeId};
//!
//! let mut dag: Dag<String> = Dag::new();
//!
//! // "test" runs after "build", "deploy" runs after "test".
//! dag.add_node(NodeId::new("build"), "compile the tree".into(), &[], &[])?;
//! dag.add_node(NodeId::new("test"), "run the suite".into(), &[NodeId::new("build")], &[])?;
//! dag.add_node(NodeId::new("deploy"), "ship it".into(), &[NodeId::new("test")], &[])?;
//!
//! // Validation is a precondition for ordering.
//! dag.validate()?;
//!
//! // Children are emitted before their parents: reverse-topological order.
//! let order = dag.order();
//! assert_eq!(
//!     order,
//!     vec![NodeId::new("deploy"), NodeId::new("test"), NodeId::new("build")]
//! );
//! # Ok::<(), taxis::DagError>(())
//! ```
//!
//! # Module Organization
//!
//! Following Parnas's information hiding principles, each module hides a
//! design decision that is likely to change:
//!
//! - [`node_id`](NodeId): hides the identifier representation
//! - [`dag`](Dag): hides the graph representation (adjacency list vs matrix)
//!   and the cycle-cache layout
//! - `error`: hides error representation details
//!
//! # Concurrency
//!
//! The engine is single-threaded by construction: mutating and
//! lazily-caching operations take `&mut self`, pure reads take `&self`.
//! Callers needing shared access serialize calls externally.

mod dag;
mod error;
mod node_id;

pub use dag::Dag;
pub use error::{DagError, DagResult};
pub use node_id::NodeId;
