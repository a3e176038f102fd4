//! Graph construction options

use serde::{Deserialize, Serialize};

/// Invariants a [`RelationGraph`] enforces on every mutation.
///
/// [`RelationGraph`]: super::RelationGraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Reject any directed, non-symmetric add that would create a cycle.
    pub acyclic: bool,
    /// Require entities to be registered before they may appear as
    /// relation endpoints.
    pub strict_entities: bool,
    /// Allow an entity to be contained by more than one parent. Off by
    /// default: containment edges form a forest.
    pub multi_containment: bool,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acyclic(mut self, acyclic: bool) -> Self {
        self.acyclic = acyclic;
        self
    }

    pub fn strict_entities(mut self, strict: bool) -> Self {
        self.strict_entities = strict;
        self
    }

    pub fn multi_containment(mut self, allow: bool) -> Self {
        self.multi_containment = allow;
        self
    }
}

/// Traversal direction for neighborhood queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = GraphConfig::new().acyclic(true).strict_entities(true);
        assert!(config.acyclic);
        assert!(config.strict_entities);
        assert!(!config.multi_containment);

        assert_eq!(GraphConfig::default(), GraphConfig::new());
    }
}
