//! Core identifier types for the relation layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an entity participating in relations.
///
/// Domain modules supply their own vocabularies ("CarbonTax", "gdp",
/// "supplier-17"); the relation layer never interprets the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

/// Unique identifier for a relation, assigned by the owning [`RelationSet`].
///
/// [`RelationSet`]: crate::relation::RelationSet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RelationId(pub u64);

impl RelationId {
    pub fn new(id: u64) -> Self {
        RelationId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelationId({})", self.0)
    }
}

impl From<u64> for RelationId {
    fn from(id: u64) -> Self {
        RelationId(id)
    }
}

/// Relation label (e.g., "influences", "depends_on").
///
/// Always non-empty; relation constructors reject empty labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new("CarbonTax");
        assert_eq!(id.as_str(), "CarbonTax");
        assert_eq!(format!("{}", id), "CarbonTax");

        let id2: EntityId = "Emissions".into();
        assert_ne!(id, id2);
    }

    #[test]
    fn test_relation_id() {
        let id = RelationId::new(7);
        assert_eq!(id.as_u64(), 7);
        assert_eq!(format!("{}", id), "RelationId(7)");
    }

    #[test]
    fn test_label() {
        let label = Label::new("influences");
        assert_eq!(label.as_str(), "influences");
        assert!(!label.is_empty());

        let empty: Label = "".into();
        assert!(empty.is_empty());
    }
}
