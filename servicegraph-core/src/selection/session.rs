//! Selection Session
//!
//! A [`Session`] owns one service graph for the lifetime of a view and pairs
//! every state change with a fresh total, so the total it reports always
//! matches the flags in the graph.

use serde::Serialize;
use tracing::debug;

use super::propagate::{reset, toggle};
use super::totals::{compute_max_total, critical_path};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::graph::{NodeId, ServiceDuration, ServiceGraph};

/// Flags of one node as the rendering layer needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub checked: bool,
    pub enabled: bool,
}

/// Everything needed to render the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// One entry per node, in catalog order.
    pub nodes: Vec<NodeView>,

    /// ServiceDuration of the heaviest checked chain.
    pub total: ServiceDuration,

    /// Ids on that chain, root first.
    pub critical_path: Vec<NodeId>,
}

/// An owned graph plus its current total.
#[derive(Debug, Clone)]
pub struct Session {
    graph: ServiceGraph,
    total: ServiceDuration,
}

impl Session {
    /// Start a session over `graph`, resetting its selection first.
    pub fn new(mut graph: ServiceGraph) -> Self {
        reset(&mut graph);
        let total = compute_max_total(&graph);
        Self { graph, total }
    }

    /// Build the graph from a catalog and start a session over it.
    pub fn from_catalog(catalog: &Catalog, config: &Config) -> Result<Self> {
        Ok(Self::new(ServiceGraph::from_catalog(catalog, config)?))
    }

    pub fn graph(&self) -> &ServiceGraph {
        &self.graph
    }

    /// Total of the current selection.
    pub fn total(&self) -> ServiceDuration {
        self.total
    }

    /// Toggle a node and recompute the total.
    pub fn toggle(&mut self, node_id: &str, checked: bool) -> Result<ServiceDuration> {
        toggle(&mut self.graph, node_id, checked)?;
        Ok(self.recompute())
    }

    /// Invert the node's current `checked` flag, as a click on its checkbox
    /// does.
    pub fn flip(&mut self, node_id: &str) -> Result<ServiceDuration> {
        let checked = self.graph.node(node_id)?.is_checked();
        self.toggle(node_id, !checked)
    }

    /// Clear the selection.
    pub fn reset(&mut self) -> ServiceDuration {
        reset(&mut self.graph);
        self.recompute()
    }

    /// Re-apply a previously chosen selection.
    ///
    /// Clears the selection, then checks each id in order with normal
    /// propagation. Ids whose dependencies are not checked earlier in the
    /// list end up checked but stay disabled, exactly as if the same clicks
    /// had been replayed. All ids are validated before anything changes.
    pub fn restore<I, S>(&mut self, ids: I) -> Result<ServiceDuration>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = ids.into_iter().collect();
        for id in &ids {
            self.graph.node(id.as_ref())?;
        }

        reset(&mut self.graph);
        for id in &ids {
            toggle(&mut self.graph, id.as_ref(), true)?;
        }
        debug!(restored = ids.len(), "restored selection");
        Ok(self.recompute())
    }

    /// Ids of the heaviest checked chain, root first.
    pub fn critical_path(&self) -> Vec<NodeId> {
        critical_path(&self.graph)
    }

    /// Ids of all checked nodes, in catalog order.
    pub fn selected(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|node| node.is_checked())
            .map(|node| node.id().clone())
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        let nodes = self
            .graph
            .states()
            .map(|(id, state)| NodeView {
                id: id.clone(),
                checked: state.checked,
                enabled: state.enabled,
            })
            .collect();

        Snapshot {
            nodes,
            total: self.total,
            critical_path: self.critical_path(),
        }
    }

    /// End the session and hand back the graph.
    pub fn into_graph(self) -> ServiceGraph {
        self.graph
    }

    fn recompute(&mut self) -> ServiceDuration {
        self.total = compute_max_total(&self.graph);
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::error::GraphError;

    fn session() -> Session {
        let catalog: Catalog = [
            CatalogEntry::new("a", 2, 1),
            CatalogEntry::new("b", 3, 1).depends_on("a"),
            CatalogEntry::new("c", 5, 0).depends_on("a"),
        ]
        .into_iter()
        .collect();
        Session::from_catalog(&catalog, &Config::default()).unwrap()
    }

    #[test]
    fn total_follows_every_change() {
        let mut session = session();
        assert_eq!(session.total(), ServiceDuration::ZERO);

        assert_eq!(session.toggle("a", true).unwrap(), ServiceDuration::new(2, 1));
        assert_eq!(session.toggle("b", true).unwrap(), ServiceDuration::new(5, 2));
        assert_eq!(session.toggle("a", false).unwrap(), ServiceDuration::ZERO);
        assert_eq!(session.total(), ServiceDuration::ZERO);
    }

    #[test]
    fn flip_inverts_checked() {
        let mut session = session();
        session.flip("a").unwrap();
        assert!(session.graph().get("a").unwrap().is_checked());
        session.flip("a").unwrap();
        assert!(!session.graph().get("a").unwrap().is_checked());
        assert!(session.flip("zz").is_err());
    }

    #[test]
    fn restore_replays_in_order() {
        let mut session = session();
        session.toggle("a", true).unwrap();

        let total = session.restore(["a", "c"]).unwrap();
        assert_eq!(total, ServiceDuration::new(7, 1));
        assert_eq!(session.selected(), vec![NodeId::from("a"), NodeId::from("c")]);
    }

    #[test]
    fn restore_rejects_unknown_ids_without_changes() {
        let mut session = session();
        session.toggle("a", true).unwrap();

        let err = session.restore(["a", "ghost"]).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode(_)));
        assert_eq!(session.selected(), vec![NodeId::from("a")]);
        assert_eq!(session.total(), ServiceDuration::new(2, 1));
    }

    #[test]
    fn snapshot_serializes_for_rendering() {
        let mut session = session();
        session.toggle("a", true).unwrap();
        session.toggle("c", true).unwrap();

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nodes": [
                    {"id": "a", "checked": true, "enabled": true},
                    {"id": "b", "checked": false, "enabled": true},
                    {"id": "c", "checked": true, "enabled": true},
                ],
                "total": {"primary": 7, "secondary": 1},
                "criticalPath": ["a", "c"],
            })
        );
    }

    #[test]
    fn reset_clears_selection() {
        let mut session = session();
        session.restore(["a", "b", "c"]).unwrap();
        assert_eq!(session.reset(), ServiceDuration::ZERO);
        assert!(session.selected().is_empty());
    }
}
