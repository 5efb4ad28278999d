//! Service Dependency Graph
//!
//! This module implements the dependency graph between services that the
//! selection engine operates on.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes represent services, each carrying a two-part [`ServiceDuration`]
//! - Edges represent dependencies: if B depends on A, A is a parent of B and
//!   B is a child of A
//!
//! A node may have several parents (diamond dependencies). Nodes without
//! parents are roots, nodes without children are leaves.
//!
//! # Design Decisions
//!
//! 1. We maintain both parent and child edges on every node so traversals in
//!    either direction are cheap. Construction verifies they agree.
//!
//! 2. The graph is indexed by id in insertion order, which makes every
//!    traversal, and therefore every tie-break, deterministic.
//!
//! 3. Acyclicity is assumed, not verified. Traversals still guard against
//!    revisiting nodes.

mod node;
mod store;

pub use node::{EdgeList, Node, NodeId, NodeState, ServiceDuration};
pub use store::ServiceGraph;
