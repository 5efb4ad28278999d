//! Graph Nodes
//!
//! This module defines the node type that lives in the service graph, along
//! with its identifier and the two-accumulator duration it carries.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// Edge lists are short in practice; most services have a handful of
/// dependencies at most.
pub type EdgeList = SmallVec<[NodeId; 4]>;

/// Unique identifier for a service in the graph.
///
/// Catalogs may use either strings or integers as ids; both are normalized
/// to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => NodeId(text),
            RawId::Number(number) => NodeId::from(number),
        })
    }
}

/// A pair of durations accumulated independently along a path.
///
/// `primary` and `secondary` are typically calendar days and working days.
/// The engine treats them identically: they are added element-wise and
/// compared by their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDuration {
    pub primary: u32,
    pub secondary: u32,
}

impl ServiceDuration {
    /// The zero duration, contributed by unchecked nodes.
    pub const ZERO: ServiceDuration = ServiceDuration {
        primary: 0,
        secondary: 0,
    };

    pub fn new(primary: u32, secondary: u32) -> Self {
        Self { primary, secondary }
    }

    /// Combined weight used to rank competing paths.
    pub fn weight(&self) -> u64 {
        u64::from(self.primary) + u64::from(self.secondary)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for ServiceDuration {
    type Output = ServiceDuration;

    fn add(self, rhs: ServiceDuration) -> ServiceDuration {
        ServiceDuration {
            primary: self.primary.saturating_add(rhs.primary),
            secondary: self.secondary.saturating_add(rhs.secondary),
        }
    }
}

impl fmt::Display for ServiceDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.secondary)
    }
}

/// The user-facing flags of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeState {
    /// Selected by the user.
    pub checked: bool,

    /// Whether the user may select it.
    pub enabled: bool,
}

/// A service in the dependency graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// Cost of delivering this service.
    duration: ServiceDuration,

    /// Services this one depends on.
    parents: EdgeList,

    /// Services that depend on this one.
    children: EdgeList,

    checked: bool,
    enabled: bool,
}

impl Node {
    /// Create a detached node. It starts unchecked and enabled, since it has
    /// no parents yet.
    pub fn new(id: impl Into<NodeId>, duration: ServiceDuration) -> Self {
        Self {
            id: id.into(),
            duration,
            parents: EdgeList::new(),
            children: EdgeList::new(),
            checked: false,
            enabled: true,
        }
    }

    /// Add a parent. Duplicates are ignored.
    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.add_parent(parent.into());
        self
    }

    /// Add a child. Duplicates are ignored.
    pub fn with_child(mut self, child: impl Into<NodeId>) -> Self {
        self.add_child(child.into());
        self
    }

    /// Get the node's ID.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn duration(&self) -> ServiceDuration {
        self.duration
    }

    /// Get all parents, in insertion order.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Get all children, in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> NodeState {
        NodeState {
            checked: self.checked,
            enabled: self.enabled,
        }
    }

    pub(crate) fn set_state(&mut self, checked: bool, enabled: bool) {
        self.checked = checked;
        self.enabled = enabled;
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn add_parent(&mut self, parent: NodeId) {
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
    }

    pub(crate) fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn has_parent(&self, parent: &NodeId) -> bool {
        self.parents.contains(parent)
    }

    pub(crate) fn has_child(&self, child: &NodeId) -> bool {
        self.children.contains(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_an_unchecked_root() {
        let node = Node::new("a", ServiceDuration::new(2, 1));
        assert!(node.is_root());
        assert!(node.is_leaf());
        assert_eq!(
            node.state(),
            NodeState {
                checked: false,
                enabled: true
            }
        );
    }

    #[test]
    fn edges_behave_as_sets() {
        let node = Node::new("c", ServiceDuration::ZERO)
            .with_parent("a")
            .with_parent("b")
            .with_parent("a")
            .with_child("d");

        assert_eq!(node.parents(), &[NodeId::from("a"), NodeId::from("b")]);
        assert_eq!(node.children(), &[NodeId::from("d")]);
        assert!(!node.is_root());
        assert!(!node.is_leaf());
    }

    #[test]
    fn durations_add_element_wise() {
        let total = ServiceDuration::new(2, 1) + ServiceDuration::new(3, 1);
        assert_eq!(total, ServiceDuration::new(5, 2));
        assert_eq!(total.weight(), 7);
        assert!(ServiceDuration::ZERO.is_zero());
    }

    #[test]
    fn ids_accept_strings_and_integers() {
        let ids: Vec<NodeId> = serde_json::from_str(r#"["ag5zfmtvbXBs", 42]"#).unwrap();
        assert_eq!(ids, vec![NodeId::from("ag5zfmtvbXBs"), NodeId::from(42)]);
        assert_eq!(serde_json::to_string(&ids[1]).unwrap(), r#""42""#);
    }
}
