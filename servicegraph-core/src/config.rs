//! Engine Configuration
//!
//! Construction-time knobs. The propagation and total rules themselves are
//! fixed; only the handling of imperfect catalog data is configurable.

use serde::Deserialize;

use crate::error::Result;

/// What to do with a catalog entry whose `parentIds` names a service that is
/// not part of the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownParentPolicy {
    /// Fail construction with a malformed-graph error.
    #[default]
    Reject,

    /// Drop the edge and log a warning. Useful when a page shows only a
    /// subset of a larger catalog.
    Ignore,
}

/// Configuration for building a [`ServiceGraph`](crate::graph::ServiceGraph).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub unknown_parents: UnknownParentPolicy,
}

impl Config {
    /// Parse a config from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style override of the unknown-parent policy.
    pub fn with_unknown_parents(mut self, policy: UnknownParentPolicy) -> Self {
        self.unknown_parents = policy;
        self
    }
}
