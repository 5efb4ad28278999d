//! Service Catalog
//!
//! A catalog is the external description a graph is built from: one entry per
//! service with its durations and the ids of the services it depends on.
//! Children are never listed; they are derived as the transpose of the parent
//! lists.
//!
//! # JSON Shapes
//!
//! Two shapes are accepted. A list of entries:
//!
//! ```json
//! [
//!   {"id": "a", "durationPrimary": 2, "durationSecondary": 1, "parentIds": []},
//!   {"id": "b", "durationPrimary": 3, "durationSecondary": 1, "parentIds": ["a"]}
//! ]
//! ```
//!
//! or an object keyed by id, as embedded in rendered pages. There the older
//! field names `days`, `workDays` and `parents` are used, and extra keys such
//! as `children` or `checked` are ignored:
//!
//! ```json
//! {"a": {"days": 2, "workDays": 1, "parents": [], "children": ["b"]}}
//! ```

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, UnknownParentPolicy};
use crate::error::{EdgeRelation, GraphError, Result};
use crate::graph::{Node, NodeId, ServiceDuration, ServiceGraph};

/// One service as supplied by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: NodeId,
    pub duration_primary: u32,
    pub duration_secondary: u32,
    pub parent_ids: Vec<NodeId>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<NodeId>, duration_primary: u32, duration_secondary: u32) -> Self {
        Self {
            id: id.into(),
            duration_primary,
            duration_secondary,
            parent_ids: Vec::new(),
        }
    }

    /// Add a dependency on `parent`.
    pub fn depends_on(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent_ids.push(parent.into());
        self
    }

    pub fn duration(&self) -> ServiceDuration {
        ServiceDuration::new(self.duration_primary, self.duration_secondary)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default)]
    id: Option<NodeId>,
    #[serde(alias = "days")]
    duration_primary: u32,
    #[serde(alias = "workDays")]
    duration_secondary: u32,
    #[serde(default, alias = "parents")]
    parent_ids: Vec<NodeId>,
}

impl RawEntry {
    fn into_entry(self, id: NodeId) -> CatalogEntry {
        CatalogEntry {
            id,
            duration_primary: self.duration_primary,
            duration_secondary: self.duration_secondary,
            parent_ids: self.parent_ids,
        }
    }
}

/// An ordered list of catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON, in either of the accepted shapes.
    ///
    /// The shape is picked from the first token, so a bad entry reports the
    /// offending field and position rather than a generic mismatch.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries = if json.trim_start().starts_with('{') {
            serde_json::from_str::<IndexMap<String, RawEntry>>(json)?
                .into_iter()
                .map(|(key, entry)| {
                    let id = NodeId::from(key);
                    if let Some(inner) = entry.id.as_ref().filter(|inner| **inner != id) {
                        warn!(key = %id, id = %inner, "catalog key and entry id differ; using the key");
                    }
                    entry.into_entry(id)
                })
                .collect()
        } else {
            serde_json::from_str::<Vec<RawEntry>>(json)?
                .into_iter()
                .enumerate()
                .map(|(index, entry)| match entry.id.clone() {
                    Some(id) => Ok(entry.into_entry(id)),
                    None => Err(GraphError::Catalog(serde_json::Error::custom(format!(
                        "catalog entry {index} has no id"
                    )))),
                })
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Self { entries })
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl ServiceGraph {
    /// Build a graph from a catalog.
    ///
    /// Nodes keep catalog order. A parent id missing from the catalog is
    /// handled according to `config.unknown_parents`.
    pub fn from_catalog(catalog: &Catalog, config: &Config) -> Result<Self> {
        let mut graph = ServiceGraph::default();
        for entry in catalog.entries() {
            graph.insert(Node::new(entry.id.clone(), entry.duration()))?;
        }

        for entry in catalog.entries() {
            for parent in &entry.parent_ids {
                if graph.contains(parent.as_str()) {
                    graph.add_edge(parent, &entry.id);
                    continue;
                }
                match config.unknown_parents {
                    UnknownParentPolicy::Reject => {
                        return Err(GraphError::DanglingEdge {
                            node: entry.id.clone(),
                            relation: EdgeRelation::Parent,
                            target: parent.clone(),
                        });
                    }
                    UnknownParentPolicy::Ignore => {
                        warn!(node = %entry.id, parent = %parent, "dropping dependency on unknown service");
                    }
                }
            }
        }

        graph.validate()?;
        graph.init_states();
        debug!(nodes = graph.len(), "built service graph from catalog");
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_shape() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": "a", "durationPrimary": 2, "durationSecondary": 1, "parentIds": []},
                {"id": 7, "durationPrimary": 3, "durationSecondary": 1, "parentIds": ["a"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[1], CatalogEntry::new(7u64, 3, 1).depends_on("a"));
    }

    #[test]
    fn parses_keyed_page_data_shape() {
        let catalog = Catalog::from_json(
            r#"{
                "a": {"days": 2, "workDays": 1, "parents": [], "children": ["b"], "enabled": true, "checked": false},
                "b": {"days": 3, "workDays": 1, "parents": ["a"], "children": [], "enabled": true, "checked": false}
            }"#,
        )
        .unwrap();

        let ids: Vec<_> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(catalog.entries()[0].duration(), ServiceDuration::new(2, 1));
        assert_eq!(catalog.entries()[1].parent_ids, vec![NodeId::from("a")]);
    }

    #[test]
    fn list_entries_need_an_id() {
        let err = Catalog::from_json(r#"[{"durationPrimary": 1, "durationSecondary": 1}]"#)
            .unwrap_err();
        assert!(matches!(err, GraphError::Catalog(_)));
    }

    #[test]
    fn missing_duration_is_a_parse_error() {
        let err = Catalog::from_json(r#"[{"id": "a", "durationPrimary": 1}]"#).unwrap_err();
        assert!(matches!(err, GraphError::Catalog(_)));
        assert!(err.to_string().contains("durationSecondary"), "{err}");

        let err = Catalog::from_json(r#"{"a": {"days": 1, "parents": []}}"#).unwrap_err();
        assert!(err.to_string().contains("durationSecondary"), "{err}");
    }

    #[test]
    fn bad_value_reports_its_position() {
        let err =
            Catalog::from_json(r#"[{"id": "a", "durationPrimary": -1, "durationSecondary": 0}]"#)
                .unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("untagged"), "{message}");
        assert!(message.contains("column"), "{message}");
    }

    #[test]
    fn builds_transposed_edges() {
        let catalog: Catalog = [
            CatalogEntry::new("a", 2, 1),
            CatalogEntry::new("e", 1, 0),
            CatalogEntry::new("d", 1, 1).depends_on("a").depends_on("e"),
        ]
        .into_iter()
        .collect();

        let graph = ServiceGraph::from_catalog(&catalog, &Config::default()).unwrap();
        assert_eq!(graph.get("a").unwrap().children(), &[NodeId::from("d")]);
        assert_eq!(graph.get("e").unwrap().children(), &[NodeId::from("d")]);
        assert_eq!(graph.get("d").unwrap().parents().len(), 2);
        assert!(!graph.get("d").unwrap().is_enabled());
        assert!(graph.get("a").unwrap().is_enabled());
    }

    #[test]
    fn unknown_parent_policy() {
        let catalog: Catalog = [
            CatalogEntry::new("a", 1, 0),
            CatalogEntry::new("b", 1, 0).depends_on("a").depends_on("elsewhere"),
        ]
        .into_iter()
        .collect();

        let err = ServiceGraph::from_catalog(&catalog, &Config::default()).unwrap_err();
        assert!(err.is_malformed_graph());

        let lenient = Config::default().with_unknown_parents(UnknownParentPolicy::Ignore);
        let graph = ServiceGraph::from_catalog(&catalog, &lenient).unwrap();
        assert_eq!(graph.get("b").unwrap().parents(), &[NodeId::from("a")]);
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let catalog: Catalog = [CatalogEntry::new("a", 1, 0), CatalogEntry::new("a", 2, 0)]
            .into_iter()
            .collect();
        assert!(matches!(
            ServiceGraph::from_catalog(&catalog, &Config::default()),
            Err(GraphError::DuplicateNode(_))
        ));
    }
}
