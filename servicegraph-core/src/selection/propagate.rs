//! Selection Propagation
//!
//! Toggling a service changes more than its own checkbox. The rules are:
//!
//! - **Uncheck** cascades: every descendant is unchecked and disabled,
//!   whether or not it has other parents that are still checked.
//! - **Check** is local: only the target becomes checked. Each direct child
//!   becomes enabled if, and only if, all of its parents are now checked
//!   (an AND-gate). Children that fail the gate keep whatever `enabled`
//!   value they had.
//!
//! The two rules are deliberately asymmetric. Losing any one dependency
//! invalidates everything downstream, and the user has to re-confirm the
//! chain from the top.

use tracing::{debug, trace};

use crate::error::Result;
use crate::graph::{Node, NodeId, ServiceGraph};

/// Set `node_id` to `checked` and propagate the consequences through the
/// graph.
///
/// Fails with [`GraphError::UnknownNode`](crate::error::GraphError::UnknownNode)
/// before touching anything if the id is not in the graph.
pub fn toggle(graph: &mut ServiceGraph, node_id: &str, checked: bool) -> Result<()> {
    let id = graph.node(node_id)?.id().clone();
    if checked {
        check(graph, &id);
    } else {
        uncheck(graph, &id);
    }
    Ok(())
}

/// Recompute the whole graph from scratch, as done when a view first loads.
///
/// Runs the uncheck cascade from every node, leaving every service
/// unchecked, every root enabled and every other node disabled.
pub fn reset(graph: &mut ServiceGraph) {
    let ids: Vec<NodeId> = graph.ids().cloned().collect();
    for id in &ids {
        uncheck(graph, id);
    }

    let roots: Vec<NodeId> = graph.roots().map(|node| node.id().clone()).collect();
    for id in &roots {
        if let Some(root) = graph.get_mut(id.as_str()) {
            root.set_enabled(true);
        }
    }

    debug!(nodes = ids.len(), roots = roots.len(), "reset selection");
}

fn uncheck(graph: &mut ServiceGraph, id: &NodeId) {
    let Some(node) = graph.get_mut(id.as_str()) else {
        return;
    };
    node.set_checked(false);

    let cascade = match graph.get(id.as_str()) {
        Some(node) => graph.descendants_of(node),
        None => Vec::new(),
    };
    for descendant in &cascade {
        if let Some(node) = graph.get_mut(descendant.as_str()) {
            node.set_state(false, false);
            trace!(node = %descendant, "disabled by cascade");
        }
    }

    debug!(node = %id, cascade = cascade.len(), "unchecked service");
}

fn check(graph: &mut ServiceGraph, id: &NodeId) {
    let Some(node) = graph.get_mut(id.as_str()) else {
        return;
    };
    node.set_checked(true);
    let children = node.children().to_vec();

    let mut enabled = 0usize;
    for child_id in &children {
        if !all_parents_checked(graph, child_id) {
            continue;
        }
        if let Some(child) = graph.get_mut(child_id.as_str()) {
            child.set_enabled(true);
            enabled += 1;
            trace!(node = %child_id, "enabled");
        }
    }

    debug!(node = %id, children = children.len(), enabled, "checked service");
}

fn all_parents_checked(graph: &ServiceGraph, id: &NodeId) -> bool {
    graph.get(id.as_str()).is_some_and(|node| {
        node.parents()
            .iter()
            .all(|parent| graph.get(parent.as_str()).is_some_and(Node::is_checked))
    })
}
