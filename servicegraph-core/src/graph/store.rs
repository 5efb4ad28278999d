//! Service Graph Store
//!
//! The store owns every node of a service graph and keeps the two edge
//! directions in sync. It offers read access to nodes and their edges, the
//! single mutation primitive [`ServiceGraph::set_node_state`], and the two
//! traversals the selection engine is built on:
//!
//! - [`ServiceGraph::descendants`]: breadth-first walk along `children`
//! - [`ServiceGraph::topological_order`]: Kahn's algorithm, parents first
//!
//! Both traversals are iterative and keep a visited set, so they terminate
//! even if a caller hands us a graph with an accidental cycle. Acyclicity is
//! still the caller's responsibility; we do not reject cyclic input.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::warn;

use super::node::{Node, NodeId, NodeState};
use crate::error::{EdgeRelation, GraphError, Result};

/// A dependency graph of services, indexed by id in catalog order.
#[derive(Debug, Clone, Default)]
pub struct ServiceGraph {
    /// All nodes in the graph, indexed by ID.
    nodes: IndexMap<NodeId, Node>,
}

impl ServiceGraph {
    /// Build a graph from fully specified nodes.
    ///
    /// Both edge directions must be present: for every `p` in `n.parents`,
    /// `n` must appear in `p.children`, and vice versa. Every node's state is
    /// reset to unchecked, enabled only if it is a root.
    pub fn from_nodes<I>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut graph = Self::default();
        for node in nodes {
            graph.insert(node)?;
        }
        graph.validate()?;
        graph.init_states();
        Ok(graph)
    }

    /// Add a node, failing if the id is already taken.
    pub(crate) fn insert(&mut self, node: Node) -> Result<()> {
        match self.nodes.entry(node.id().clone()) {
            Entry::Occupied(entry) => Err(GraphError::DuplicateNode(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(node);
                Ok(())
            }
        }
    }

    /// Add a dependency edge: `child` depends on `parent`.
    ///
    /// Both ids must already be in the graph.
    pub(crate) fn add_edge(&mut self, parent: &NodeId, child: &NodeId) {
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.add_child(child.clone());
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.add_parent(parent.clone());
        }
    }

    /// Check that every edge points at a known node and is recorded on both
    /// sides.
    pub(crate) fn validate(&self) -> Result<()> {
        for node in self.nodes.values() {
            for parent_id in node.parents() {
                let parent = self.nodes.get(parent_id).ok_or_else(|| GraphError::DanglingEdge {
                    node: node.id().clone(),
                    relation: EdgeRelation::Parent,
                    target: parent_id.clone(),
                })?;
                if !parent.has_child(node.id()) {
                    return Err(GraphError::InconsistentEdge {
                        parent: parent_id.clone(),
                        child: node.id().clone(),
                        recorded_on: EdgeRelation::Child,
                    });
                }
            }

            for child_id in node.children() {
                let child = self.nodes.get(child_id).ok_or_else(|| GraphError::DanglingEdge {
                    node: node.id().clone(),
                    relation: EdgeRelation::Child,
                    target: child_id.clone(),
                })?;
                if !child.has_parent(node.id()) {
                    return Err(GraphError::InconsistentEdge {
                        parent: node.id().clone(),
                        child: child_id.clone(),
                        recorded_on: EdgeRelation::Parent,
                    });
                }
            }
        }
        Ok(())
    }

    /// Put every node in its initial state: unchecked, enabled iff root.
    pub(crate) fn init_states(&mut self) {
        for node in self.nodes.values_mut() {
            let enabled = node.is_root();
            node.set_state(false, enabled);
        }
    }

    /// Get a reference to a node.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a node, failing with [`GraphError::UnknownNode`] if absent.
    pub fn node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(NodeId::from(id)))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate over all nodes in catalog order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Nodes without parents.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.is_root())
    }

    /// Nodes without children.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.is_leaf())
    }

    /// Current `checked`/`enabled` flags of every node, in catalog order.
    pub fn states(&self) -> impl Iterator<Item = (&NodeId, NodeState)> {
        self.nodes.iter().map(|(id, node)| (id, node.state()))
    }

    /// Overwrite the flags of a single node.
    ///
    /// This is the only way flags change; it performs no propagation.
    pub fn set_node_state(&mut self, id: &str, checked: bool, enabled: bool) -> Result<()> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownNode(NodeId::from(id)))?;
        node.set_state(checked, enabled);
        Ok(())
    }

    /// Every node reachable from `id` through `children` edges, nearest
    /// first. `id` itself is not included.
    pub fn descendants(&self, id: &str) -> Result<Vec<NodeId>> {
        let start = self.node(id)?;
        Ok(self.descendants_of(start))
    }

    pub(crate) fn descendants_of(&self, start: &Node) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<&NodeId> = start.children().iter().collect();
        visited.insert(start.id());

        while let Some(node_id) = queue.pop_front() {
            if !visited.insert(node_id) {
                continue;
            }
            result.push(node_id.clone());

            if let Some(node) = self.nodes.get(node_id) {
                queue.extend(node.children().iter().filter(|c| !visited.contains(c)));
            }
        }

        result
    }

    /// All nodes ordered so that parents come before their children.
    ///
    /// Ties are broken by catalog order. Nodes that sit on (or behind) a
    /// cycle can never reach in-degree zero; they are left out and a warning
    /// is logged.
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut in_degree: HashMap<&NodeId, usize> = HashMap::with_capacity(self.nodes.len());
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::new();

        for (id, node) in &self.nodes {
            let degree = node.parents().len();
            in_degree.insert(id, degree);
            if degree == 0 {
                queue.push_back(id);
            }
        }

        // Kahn's algorithm
        while let Some(node_id) = queue.pop_front() {
            result.push(node_id.clone());

            if let Some(node) = self.nodes.get(node_id) {
                for child_id in node.children() {
                    if let Some(degree) = in_degree.get_mut(child_id) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            queue.push_back(child_id);
                        }
                    }
                }
            }
        }

        if result.len() < self.nodes.len() {
            warn!(
                ordered = result.len(),
                total = self.nodes.len(),
                "service graph contains a cycle; unordered nodes are skipped"
            );
        }

        result
    }

    /// Get the total number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
