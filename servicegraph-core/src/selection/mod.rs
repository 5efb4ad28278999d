//! Selection Engine
//!
//! This module turns user clicks into graph state and totals.
//!
//! # Flow
//!
//! 1. A caller toggles one service ([`toggle`]).
//! 2. Propagation updates `checked`/`enabled` across the graph.
//! 3. The critical-path total is recomputed ([`compute_max_total`]).
//! 4. The caller re-renders from the new flags and total.
//!
//! Steps 2 and 3 belong together: between them the flags are new but the
//! total is stale. [`Session`] runs both for every change so callers cannot
//! forget the second half.
//!
//! Everything here is synchronous and single-threaded. The graph is passed
//! explicitly; there is no global state.

mod propagate;
mod session;
mod totals;

pub use propagate::{reset, toggle};
pub use session::{NodeView, Session, Snapshot};
pub use totals::{compute_max_total, critical_path};
