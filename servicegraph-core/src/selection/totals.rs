//! Critical-Path Totals
//!
//! Given the current selection, find the longest chain of checked services
//! and report its duration.
//!
//! # Algorithm
//!
//! For every node we compute a *path total*:
//!
//! 1. An unchecked node contributes nothing and ends the chain: `{0, 0}`.
//! 2. A checked leaf contributes its own duration.
//! 3. A checked node with children contributes its own duration plus the
//!    path total of its heaviest child. Children are alternative
//!    continuations, not parallel work, so they are never summed.
//!
//! "Heaviest" compares `primary + secondary`, then prefers a checked node
//! over an unchecked one so a zero-duration service still joins the chain.
//! Remaining ties go to the first child in catalog order. The overall total
//! is the heaviest root path total.
//!
//! Path totals are filled in over the reverse topological order, so every
//! child is resolved before its parents and no recursion is needed. Nothing
//! is cached between calls; the selection changes on every toggle anyway.

use std::collections::HashMap;

use crate::graph::{Node, NodeId, ServiceDuration, ServiceGraph};

/// Best chain starting at a node.
#[derive(Debug, Clone, Copy)]
struct PathStep<'a> {
    total: ServiceDuration,
    /// Next node on the chain, if the chain continues past this node.
    next: Option<&'a NodeId>,
}

const END: PathStep<'static> = PathStep {
    total: ServiceDuration::ZERO,
    next: None,
};

/// ServiceDuration of the heaviest chain of checked services starting at a root.
///
/// Returns `{0, 0}` when nothing is checked. Never mutates the graph, so
/// repeated calls without an intervening toggle return the same value.
pub fn compute_max_total(graph: &ServiceGraph) -> ServiceDuration {
    let steps = path_steps(graph);
    best_root(graph, &steps).map_or(ServiceDuration::ZERO, |(_, step)| step.total)
}

/// Ids of the heaviest chain of checked services, root first.
///
/// This is the chain whose duration [`compute_max_total`] reports. Empty
/// when nothing is checked.
pub fn critical_path(graph: &ServiceGraph) -> Vec<NodeId> {
    let steps = path_steps(graph);
    let mut path = Vec::new();

    let Some((root, _)) = best_root(graph, &steps) else {
        return path;
    };
    if !graph.get(root.as_str()).is_some_and(|node| node.is_checked()) {
        return path;
    }

    let mut current = Some(root);
    while let Some(id) = current {
        // A cycle would revisit a node; stop there instead of looping.
        if path.contains(id) {
            break;
        }
        path.push(id.clone());
        current = steps.get(id).and_then(|step| step.next);
    }
    path
}

fn path_steps(graph: &ServiceGraph) -> HashMap<&NodeId, PathStep<'_>> {
    let order = graph.topological_order();
    let mut steps: HashMap<&NodeId, PathStep<'_>> = HashMap::with_capacity(order.len());

    for id in order.iter().rev() {
        let Some(node) = graph.get(id.as_str()) else {
            continue;
        };
        if !node.is_checked() {
            steps.insert(node.id(), END);
            continue;
        }

        let mut best: Option<(&NodeId, ServiceDuration, bool)> = None;
        for child in node.children() {
            let total = steps.get(child).map_or(ServiceDuration::ZERO, |step| step.total);
            let checked = graph.get(child.as_str()).is_some_and(Node::is_checked);
            if best.map_or(true, |(_, current, current_checked)| {
                outranks(total, checked, current, current_checked)
            }) {
                best = Some((child, total, checked));
            }
        }

        let step = match best {
            Some((child, total, _)) => PathStep {
                total: node.duration() + total,
                next: graph
                    .get(child.as_str())
                    .filter(|child| child.is_checked())
                    .map(|child| child.id()),
            },
            None => PathStep {
                total: node.duration(),
                next: None,
            },
        };
        steps.insert(node.id(), step);
    }

    steps
}

fn best_root<'a>(
    graph: &'a ServiceGraph,
    steps: &HashMap<&NodeId, PathStep<'a>>,
) -> Option<(&'a NodeId, PathStep<'a>)> {
    let mut best: Option<(&'a Node, PathStep<'a>)> = None;
    for root in graph.roots() {
        let step = steps.get(root.id()).copied().unwrap_or(END);
        if best.map_or(true, |(current, current_step)| {
            outranks(step.total, root.is_checked(), current_step.total, current.is_checked())
        }) {
            best = Some((root, step));
        }
    }
    best.map(|(root, step)| (root.id(), step))
}

/// Heavier wins; at equal weight a checked node beats an unchecked one.
/// Anything else keeps the earlier candidate.
fn outranks(
    total: ServiceDuration,
    checked: bool,
    current: ServiceDuration,
    current_checked: bool,
) -> bool {
    (total.weight(), checked) > (current.weight(), current_checked)
}
