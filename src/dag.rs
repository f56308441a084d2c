//! Dag - Directed-acyclic-graph engine
//!
//! This module provides the core data structure for registering nodes with
//! attached values, declaring ordering constraints between them, detecting
//! cycles, and computing a deterministic global ordering.
//!
//! # Design
//!
//! The graph uses a forward adjacency list representation: each identifier
//! maps to the ordered list of its children (outgoing edges). Values live in
//! a separate map, so an identifier can be structurally known (referenced as
//! an edge endpoint) without carrying a value.
//!
//! Cycle findings are cached on the structure itself: [`Dag::validate`]
//! populates a cycle set and a validated flag, and every successful
//! [`Dag::add_node`] clears the flag so the next [`Dag::has_cycle`] call
//! re-validates. The cache is derived state, never serialized.
//!
//! # Determinism
//!
//! All traversals ([`Dag::validate`], [`Dag::order`]) iterate identifiers in
//! ascending [`NodeId`] order and break ties the same way at every branching
//! point, so their output depends only on the graph shape, not on insertion
//! order.

use crate::error::{DagError, DagResult};
use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// A directed-acyclic graph of identified nodes with attached values.
///
/// The payload type `V` is chosen by the embedding system and never
/// interpreted by the engine.
///
/// # Example
///
/// ```
/// use taxis::{Dag, NodeId};
///
/// let mut dag: Dag<&str> = Dag::new();
///
/// // "package" runs after "build": edge build -> package
/// dag.add_node(NodeId::new("build"), "cargo build", &[], &[])?;
/// dag.add_node(NodeId::new("package"), "tar czf", &[NodeId::new("build")], &[])?;
///
/// dag.validate()?;
///
/// // Children are emitted before their parents.
/// assert_eq!(dag.order(), vec![NodeId::new("package"), NodeId::new("build")]);
/// # Ok::<(), taxis::DagError>(())
/// ```
///
/// # Recursion depth
///
/// [`Dag::validate`] and [`Dag::order`] recurse along edges, so the call
/// stack grows with the longest path in the graph. The engine targets graphs
/// of tens to low hundreds of nodes; pathologically deep graphs can exhaust
/// the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dag<V> {
    /// Forward edges: identifier to ordered, deduplicated children
    edges: HashMap<NodeId, Vec<NodeId>>,
    /// Attached values, populated only by explicit insertion
    values: HashMap<NodeId, V>,
    /// Identifiers found to participate in a cycle, derived by validation
    #[serde(skip)]
    cycles: HashMap<NodeId, bool>,
    /// True only when validation has run since the last mutation
    #[serde(skip)]
    validated: bool,
}

impl<V> Default for Dag<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Dag<V> {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            values: HashMap::new(),
            cycles: HashMap::new(),
            validated: false,
        }
    }

    /// Returns the number of structurally known identifiers.
    ///
    /// Identifiers that only appear as edge endpoints count too.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no identifiers.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Adds a node with an attached value.
    ///
    /// `predecessors` declares an edge `p -> id` for each `p`; `successors`
    /// declares an edge `id -> s` for each `s`. Endpoints named only in the
    /// hint lists become structurally known without receiving a value.
    /// Duplicate edges between the same ordered pair are suppressed.
    ///
    /// Returns [`DagError::DuplicateNode`] if `id` already has a value; the
    /// check happens before any edge is written, so a failed call leaves the
    /// graph untouched.
    pub fn add_node(
        &mut self,
        id: NodeId,
        value: V,
        predecessors: &[NodeId],
        successors: &[NodeId],
    ) -> DagResult<()> {
        if self.values.contains_key(&id) {
            return Err(DagError::duplicate_node(id));
        }

        for pred in predecessors {
            self.edges.entry(pred.clone()).or_default();
            trace!(from = %pred, to = %id, "adding edge");
            self.add_edge(pred, &id);
        }

        self.edges.entry(id.clone()).or_default();

        for succ in successors {
            trace!(from = %id, to = %succ, "adding edge");
            self.add_edge(&id, succ);
        }

        self.values.insert(id, value);
        self.validated = false;
        Ok(())
    }

    /// Adds the edge `from -> to`, suppressing duplicates.
    ///
    /// The caller must have created the adjacency entry for `from` already;
    /// a missing entry is a bug in this module, not bad input.
    fn add_edge(&mut self, from: &NodeId, to: &NodeId) {
        self.edges.entry(to.clone()).or_default();

        let Some(targets) = self.edges.get_mut(from) else {
            unreachable!("adjacency entry for {from} must exist before an edge is added");
        };
        if !targets.contains(to) {
            targets.push(to.clone());
        }
    }

    /// Returns the value attached to `id`.
    ///
    /// Returns [`DagError::NodeNotFound`] if `id` has no value, even when it
    /// is structurally known as an edge endpoint.
    pub fn node(&self, id: &NodeId) -> DagResult<&V> {
        self.values
            .get(id)
            .ok_or_else(|| DagError::node_not_found(id.clone()))
    }

    /// Returns the children of `id` in edge insertion order.
    ///
    /// Unknown identifiers yield an empty slice.
    pub fn children_of(&self, id: &NodeId) -> &[NodeId] {
        self.edges.get(id).map_or(&[], |edges| edges.as_slice())
    }

    /// Returns every structurally known identifier, sorted ascending.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.edges.keys().cloned().collect();
        trace!(count = ids.len(), "sorting node ids");
        ids.sort();
        ids
    }

    /// Validates the graph, looking for cycles.
    ///
    /// Runs a depth-first search from every identifier in ascending order
    /// and stops at the first cycle found, returning
    /// [`DagError::CycleDetected`] with a path description such as
    /// `"a -> b -> c -> a"`. On success the cycle set is left empty.
    ///
    /// Each starting point re-walks its reachable children, so the worst
    /// case is O(V·(V+E)); acceptable for the small graphs this engine
    /// targets.
    pub fn validate(&mut self) -> DagResult<()> {
        let mut cycles = HashMap::new();
        self.validated = true;

        for id in self.ids() {
            trace!(id = %id, "validating node");
            let mut branch = vec![id.clone()];
            let reason = format!("{id} ->");
            if let Some(path) =
                self.find_cycle(&mut branch, self.children_of(&id), &reason, &mut cycles)
            {
                cycles.insert(id, true);
                self.cycles = cycles;
                return Err(DagError::cycle(path));
            }
        }

        self.cycles = cycles;
        Ok(())
    }

    /// Searches for a cycle below the current branch.
    ///
    /// `branch` is the path walked so far and `children` the frontier of its
    /// last element. When a branch member reappears among the children, every
    /// branch member from that point on is a cycle participant and gets
    /// marked in `cycles`; the returned description closes the accumulated
    /// path with the repeated identifier.
    fn find_cycle(
        &self,
        branch: &mut Vec<NodeId>,
        children: &[NodeId],
        reason: &str,
        cycles: &mut HashMap<NodeId, bool>,
    ) -> Option<String> {
        if let Some(pos) = branch.iter().position(|id| children.contains(id)) {
            for member in &branch[pos..] {
                cycles.insert(member.clone(), true);
            }
            return Some(format!("{reason} {}", branch[pos]));
        }

        for tid in sorted_ids(children) {
            trace!(id = %tid, "descending into child");
            branch.push(tid.clone());
            let found = self.find_cycle(
                branch,
                self.children_of(&tid),
                &format!("{reason} {tid} ->"),
                cycles,
            );
            branch.pop();
            if found.is_some() {
                return found;
            }
        }

        None
    }

    /// Returns true if `id` participates in a detected cycle.
    ///
    /// Re-runs [`Dag::validate`] first when the graph was mutated since the
    /// last validation, so a single call may walk the whole structure. The
    /// underlying validation error is never propagated; identifiers outside
    /// the cycle set report `false`.
    pub fn has_cycle(&mut self, id: &NodeId) -> bool {
        if !self.validated {
            trace!(id = %id, "graph not validated, re-validating");
            if self.validate().is_ok() {
                return false;
            }
        }

        self.cycles.get(id).copied().unwrap_or(false)
    }

    /// Returns the reverse-topological order of the graph.
    ///
    /// Every identifier appears exactly once, after everything reachable
    /// from it via outgoing edges. Ties are broken by ascending identifier
    /// order at every branching point, so the output is stable across calls.
    ///
    /// Calling this on a graph that contains a cycle recurses without bound:
    /// [`Dag::validate`] is a precondition, not an optional step.
    pub fn order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        for id in self.ids() {
            if visited.contains(&id) {
                continue;
            }
            trace!(id = %id, "walking from node");
            self.walk_from(&id, &mut visited, &mut order);
            visited.insert(id);
        }
        order
    }

    /// Post-order walk: children first, ascending, then the node itself.
    fn walk_from(&self, id: &NodeId, visited: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
        for tid in sorted_ids(self.children_of(id)) {
            if !visited.contains(&tid) {
                self.walk_from(&tid, visited, order);
            }
        }

        if visited.insert(id.clone()) {
            order.push(id.clone());
        }
    }
}

/// Returns a sorted copy of the given identifiers.
fn sorted_ids(ids: &[NodeId]) -> Vec<NodeId> {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn test_empty_graph() {
        let dag: Dag<()> = Dag::new();
        assert!(dag.is_empty());
        assert_eq!(dag.len(), 0);
        assert!(dag.ids().is_empty());
        assert!(dag.order().is_empty());
    }

    #[test]
    fn test_add_node_and_lookup() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[]).unwrap();
        dag.add_node(id("b"), 2, &[], &[]).unwrap();

        assert_eq!(dag.len(), 2);
        assert_eq!(dag.node(&id("a")).unwrap(), &1);
        assert_eq!(dag.node(&id("b")).unwrap(), &2);
    }

    #[test]
    fn test_duplicate_node_error() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b")]).unwrap();

        let result = dag.add_node(id("a"), 2, &[], &[id("z")]);
        assert_eq!(result, Err(DagError::duplicate_node(id("a"))));

        // The failed insertion must not have touched the graph.
        assert_eq!(dag.node(&id("a")).unwrap(), &1);
        assert_eq!(dag.children_of(&id("a")), &[id("b")]);
        assert!(!dag.ids().contains(&id("z")));
    }

    #[test]
    fn test_node_not_found() {
        let dag: Dag<i32> = Dag::new();
        assert_eq!(
            dag.node(&id("missing")),
            Err(DagError::node_not_found(id("missing")))
        );
    }

    #[test]
    fn test_children_of_unknown_is_empty() {
        let dag: Dag<i32> = Dag::new();
        assert!(dag.children_of(&id("ghost")).is_empty());
    }

    #[test]
    fn test_predecessor_creates_forward_edge() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[]).unwrap();
        dag.add_node(id("b"), 2, &[id("a")], &[]).unwrap();

        assert_eq!(dag.children_of(&id("a")), &[id("b")]);
        assert!(dag.children_of(&id("b")).is_empty());
    }

    #[test]
    fn test_edge_dedup() {
        let mut dag = Dag::new();
        // Same pair declared within one call and again across calls.
        dag.add_node(id("a"), 1, &[], &[id("b"), id("b")]).unwrap();
        dag.add_node(id("b"), 2, &[id("a")], &[]).unwrap();

        assert_eq!(dag.children_of(&id("a")), &[id("b")]);
    }

    #[test]
    fn test_ids_sorted_regardless_of_insertion_order() {
        let mut dag = Dag::new();
        dag.add_node(id("c"), 3, &[], &[]).unwrap();
        dag.add_node(id("a"), 1, &[], &[]).unwrap();
        dag.add_node(id("b"), 2, &[], &[]).unwrap();

        assert_eq!(dag.ids(), vec![id("a"), id("b"), id("c")]);
        assert_eq!(dag.ids(), dag.ids());
    }

    #[test]
    fn test_endpoint_without_value() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b")]).unwrap();

        assert_eq!(dag.ids(), vec![id("a"), id("b")]);
        assert!(dag.order().contains(&id("b")));
        assert_eq!(dag.node(&id("b")), Err(DagError::node_not_found(id("b"))));
    }

    #[test]
    fn test_validate_acyclic() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b"), id("c")]).unwrap();
        dag.add_node(id("d"), 4, &[id("b"), id("c")], &[]).unwrap();

        assert_eq!(dag.validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_cycle_path() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b")]).unwrap();
        dag.add_node(id("b"), 2, &[], &[id("c")]).unwrap();
        dag.add_node(id("c"), 3, &[], &[id("a")]).unwrap();

        assert_eq!(
            dag.validate(),
            Err(DagError::cycle("a -> b -> c -> a"))
        );
    }

    #[test]
    fn test_validate_self_cycle() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("a")]).unwrap();

        assert_eq!(dag.validate(), Err(DagError::cycle("a -> a")));
        assert!(dag.has_cycle(&id("a")));
    }

    #[test]
    fn test_has_cycle_marks_all_members() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b")]).unwrap();
        dag.add_node(id("b"), 2, &[], &[id("c")]).unwrap();
        dag.add_node(id("c"), 3, &[], &[id("a")]).unwrap();
        dag.add_node(id("d"), 4, &[], &[]).unwrap();

        assert!(dag.has_cycle(&id("a")));
        assert!(dag.has_cycle(&id("b")));
        assert!(dag.has_cycle(&id("c")));
        assert!(!dag.has_cycle(&id("d")));
    }

    #[test]
    fn test_has_cycle_acyclic_is_false() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b")]).unwrap();
        dag.add_node(id("b"), 2, &[], &[]).unwrap();

        assert!(!dag.has_cycle(&id("a")));
        assert!(!dag.has_cycle(&id("b")));
        assert!(!dag.has_cycle(&id("unknown")));
    }

    #[test]
    fn test_has_cycle_revalidates_after_mutation() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b")]).unwrap();
        dag.add_node(id("b"), 2, &[], &[]).unwrap();
        assert!(!dag.has_cycle(&id("a")));

        // Close the loop: b -> c and c -> a.
        dag.add_node(id("c"), 3, &[id("b")], &[id("a")]).unwrap();

        assert!(dag.has_cycle(&id("a")));
        assert!(dag.has_cycle(&id("c")));
    }

    #[test]
    fn test_order_children_before_parent() {
        let mut dag = Dag::new();
        dag.add_node(id("a"), 1, &[], &[id("b"), id("c")]).unwrap();
        dag.add_node(id("b"), 2, &[], &[]).unwrap();
        dag.add_node(id("c"), 3, &[], &[]).unwrap();

        // Ascending tie-break: b walked before c, both before a.
        assert_eq!(dag.order(), vec![id("b"), id("c"), id("a")]);
    }

    #[test]
    fn test_order_diamond() {
        let mut dag = Dag::new();
        // a -> b -> d and a -> c -> d
        dag.add_node(id("a"), 1, &[], &[id("b"), id("c")]).unwrap();
        dag.add_node(id("b"), 2, &[], &[id("d")]).unwrap();
        dag.add_node(id("c"), 3, &[], &[id("d")]).unwrap();
        dag.add_node(id("d"), 4, &[], &[]).unwrap();

        assert_eq!(dag.order(), vec![id("d"), id("b"), id("c"), id("a")]);
    }

    #[test]
    fn test_order_deterministic_across_insertion_orders() {
        let mut first = Dag::new();
        first.add_node(id("a"), 1, &[], &[id("b")]).unwrap();
        first.add_node(id("b"), 2, &[], &[id("c")]).unwrap();
        first.add_node(id("c"), 3, &[], &[]).unwrap();

        let mut second = Dag::new();
        second.add_node(id("c"), 3, &[id("b")], &[]).unwrap();
        second.add_node(id("b"), 2, &[id("a")], &[]).unwrap();
        second.add_node(id("a"), 1, &[], &[]).unwrap();

        assert_eq!(first.order(), second.order());
        assert_eq!(first.order(), vec![id("c"), id("b"), id("a")]);
    }

    #[test]
    fn test_order_repeat_calls_identical() {
        let mut dag = Dag::new();
        dag.add_node(id("x"), 1, &[], &[id("y"), id("z")]).unwrap();
        dag.add_node(id("y"), 2, &[], &[id("z")]).unwrap();

        let once = dag.order();
        let twice = dag.order();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_order_disconnected_components() {
        let mut dag = Dag::new();
        dag.add_node(id("b"), 2, &[], &[id("c")]).unwrap();
        dag.add_node(id("a"), 1, &[], &[]).unwrap();

        // "a" is isolated and walked first; the b-component follows.
        assert_eq!(dag.order(), vec![id("a"), id("c"), id("b")]);
    }
}
