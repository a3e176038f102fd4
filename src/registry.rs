//! Entity registry
//!
//! Maps opaque entity identifiers to existence and metadata, and backs the
//! referential-integrity checks of [`RelationGraph`]. Two modes:
//!
//! - `Lenient` (default): entities are auto-registered the first time they
//!   appear as a relation endpoint.
//! - `Strict`: endpoints must be registered before use; unseen endpoints
//!   fail the add.
//!
//! The registry also tracks how many relations reference each entity; an
//! entity cannot be unregistered while any relation still references it.
//!
//! [`RelationGraph`]: crate::graph::RelationGraph

use crate::error::{GraphError, GraphResult};
use crate::relation::{EntityId, PropertyMap, PropertyValue};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Registration mode for unseen relation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegistryMode {
    /// Auto-register entities on first reference.
    #[default]
    Lenient,
    /// Require registration before an entity may appear as an endpoint.
    Strict,
}

/// A registered entity: its identifier plus optional metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub metadata: PropertyMap,
}

impl Entity {
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&PropertyValue> {
        self.metadata.get(key)
    }
}

/// Registry of entities known to one graph.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: FxHashMap<EntityId, Entity>,
    references: FxHashMap<EntityId, usize>,
    mode: RegistryMode,
}

impl EntityRegistry {
    pub fn new(mode: RegistryMode) -> Self {
        EntityRegistry {
            entities: FxHashMap::default(),
            references: FxHashMap::default(),
            mode,
        }
    }

    pub fn lenient() -> Self {
        Self::new(RegistryMode::Lenient)
    }

    pub fn strict() -> Self {
        Self::new(RegistryMode::Strict)
    }

    pub fn mode(&self) -> RegistryMode {
        self.mode
    }

    /// Register an entity; returns true if it was not already known.
    pub fn register(&mut self, id: impl Into<EntityId>) -> bool {
        let id = id.into();
        if self.entities.contains_key(&id) {
            return false;
        }
        self.entities.insert(id, Entity::default());
        true
    }

    /// Register an entity with initial metadata. Re-registering merges the
    /// metadata into the existing entity, last write wins per key.
    pub fn register_with_metadata(&mut self, id: impl Into<EntityId>, metadata: PropertyMap) {
        let entity = self.entities.entry(id.into()).or_insert_with(Entity::default);
        for (key, value) in metadata {
            entity.metadata.insert(key, value);
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.keys()
    }

    /// Resolve an endpoint per the registry mode: auto-register when
    /// lenient, fail with `UnknownEntity` when strict and unseen.
    pub(crate) fn resolve(&mut self, id: &EntityId) -> GraphResult<()> {
        if self.entities.contains_key(id) {
            return Ok(());
        }
        match self.mode {
            RegistryMode::Lenient => {
                self.entities.insert(id.clone(), Entity::default());
                Ok(())
            }
            RegistryMode::Strict => Err(GraphError::UnknownEntity(id.clone())),
        }
    }

    /// Number of relations currently referencing `id`.
    pub fn reference_count(&self, id: &EntityId) -> usize {
        self.references.get(id).copied().unwrap_or(0)
    }

    pub(crate) fn add_reference(&mut self, id: &EntityId) {
        *self.references.entry(id.clone()).or_insert(0) += 1;
    }

    pub(crate) fn release_reference(&mut self, id: &EntityId) {
        if let Some(count) = self.references.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.references.remove(id);
            }
        }
    }

    /// Remove an entity. Fails while any relation still references it.
    pub fn unregister(&mut self, id: &EntityId) -> GraphResult<Entity> {
        let references = self.reference_count(id);
        if references > 0 {
            return Err(GraphError::EntityInUse {
                entity: id.clone(),
                references,
            });
        }
        self.entities
            .remove(id)
            .ok_or_else(|| GraphError::UnknownEntity(id.clone()))
    }
}
