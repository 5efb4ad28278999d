//! Error Types
//!
//! Every failure the engine can report is a caller error: bad catalog data at
//! construction time, or an id that does not exist in the graph. Nothing here
//! is retryable.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors produced while building or mutating a service graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge points at an id that is not in the graph.
    #[error("node '{node}' references unknown {relation} '{target}'")]
    DanglingEdge {
        node: NodeId,
        relation: EdgeRelation,
        target: NodeId,
    },

    /// `parents` and `children` are not transposes of each other.
    #[error("edge {parent} -> {child} is only recorded on the {recorded_on} side")]
    InconsistentEdge {
        parent: NodeId,
        child: NodeId,
        recorded_on: EdgeRelation,
    },

    /// The same id was supplied for more than one node.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    /// A lookup, toggle or state change named an id the graph does not hold.
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),

    /// The catalog or config JSON could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl GraphError {
    /// Whether this error was raised while constructing the graph.
    pub fn is_malformed_graph(&self) -> bool {
        matches!(
            self,
            GraphError::DanglingEdge { .. }
                | GraphError::InconsistentEdge { .. }
                | GraphError::DuplicateNode(_)
        )
    }
}

/// Which side of a dependency edge an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRelation {
    Parent,
    Child,
}

impl std::fmt::Display for EdgeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeRelation::Parent => f.write_str("parent"),
            EdgeRelation::Child => f.write_str("child"),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
