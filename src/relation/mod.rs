//! Relation data model: identifiers, property values, relation kinds and
//! the deduplicating [`RelationSet`] collection.

pub mod property;
pub mod relation;
pub mod set;
pub mod types;

pub use property::{PropertyMap, PropertyValue};
pub use relation::{KindTag, Relation, RelationKind};
pub use set::RelationSet;
pub use types::{EntityId, Label, RelationId};
