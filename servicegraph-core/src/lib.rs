//! Servicegraph Core
//!
//! This crate provides the selection engine behind the service-choice widget.
//! It implements:
//!
//! - A dependency graph of services with two-part durations
//! - Catalog loading from the JSON the surrounding application supplies
//! - Checkbox propagation: cascade disable on uncheck, AND-gate enable on check
//! - Critical-path totals over the checked services
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Nodes, ids, durations and the graph store
//! - `catalog`: External service entries and graph construction from them
//! - `selection`: Propagation, totals and the session that ties them together
//! - `config`: Construction options
//! - `error`: The crate's error type
//!
//! # Example
//!
//! ```rust
//! use servicegraph_core::{Catalog, CatalogEntry, Config, ServiceDuration, Session};
//!
//! let catalog: Catalog = [
//!     CatalogEntry::new("a", 2, 1),
//!     CatalogEntry::new("b", 3, 1).depends_on("a"),
//!     CatalogEntry::new("c", 5, 0).depends_on("a"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut session = Session::from_catalog(&catalog, &Config::default())?;
//! session.toggle("a", true)?;
//! session.toggle("b", true)?;
//! assert_eq!(session.total(), ServiceDuration::new(5, 2));
//!
//! // Children are alternatives: the heavier branch wins, nothing is summed.
//! session.toggle("c", true)?;
//! assert_eq!(session.total(), ServiceDuration::new(7, 1));
//! # Ok::<(), servicegraph_core::GraphError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod selection;

pub use catalog::{Catalog, CatalogEntry};
pub use config::{Config, UnknownParentPolicy};
pub use error::{GraphError, Result};
pub use graph::{Node, NodeId, NodeState, ServiceDuration, ServiceGraph};
pub use selection::{compute_max_total, critical_path, reset, toggle, NodeView, Session, Snapshot};
