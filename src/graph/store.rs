//! Single-layer relation graph
//!
//! A [`RelationGraph`] owns one [`RelationSet`] plus derived forward and
//! backward adjacency indices, validated against an [`EntityRegistry`].
//! The indices are repaired on every mutation and are never exposed for
//! external modification, so they are always consistent with the set.
//!
//! Mutations are all-or-nothing: every invariant is checked before the
//! first state change, so a failed add or remove leaves the graph exactly
//! as it was.

use crate::algo::{self, EdgeExpander, PathIter, PathLimit};
use crate::error::{GraphError, GraphResult};
use crate::graph::config::{Direction, GraphConfig};
use crate::registry::{Entity, EntityRegistry, RegistryMode};
use crate::relation::{EntityId, KindTag, Label, PropertyMap, Relation, RelationId, RelationSet};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// A directed, typed, weighted multigraph of relations.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    config: GraphConfig,
    registry: EntityRegistry,
    relations: RelationSet,
    /// Entity -> relations traversable from it, in insertion order.
    /// Symmetric relations are indexed under both endpoints.
    outgoing: FxHashMap<EntityId, Vec<RelationId>>,
    /// The reverse index, maintained alongside `outgoing`.
    incoming: FxHashMap<EntityId, Vec<RelationId>>,
}

impl RelationGraph {
    /// A lenient, cycle-permitting graph.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        let mode = if config.strict_entities {
            RegistryMode::Strict
        } else {
            RegistryMode::Lenient
        };
        RelationGraph {
            config,
            registry: EntityRegistry::new(mode),
            relations: RelationSet::new(),
            outgoing: FxHashMap::default(),
            incoming: FxHashMap::default(),
        }
    }

    /// Build a graph from an existing relation set, re-validating every
    /// relation against `config`. Fails on the first violation.
    pub fn from_set(set: RelationSet, config: GraphConfig) -> GraphResult<Self> {
        let mut graph = Self::with_config(config);
        for relation in set.all() {
            graph.add(relation.clone())?;
        }
        Ok(graph)
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Add a relation. Returns true if it was newly inserted, false if it
    /// deduplicated against an existing relation (properties merged).
    ///
    /// Checks run before any state change:
    /// - strict mode: both endpoints must already be registered,
    /// - containment forest: the target may not gain a second parent
    ///   (unless `multi_containment`),
    /// - acyclic mode: a directed, non-symmetric add is simulated with a
    ///   depth-first reachability check (O(V + E)) and rejected if the
    ///   target already reaches the source.
    pub fn add(&mut self, relation: Relation) -> GraphResult<bool> {
        if self.config.strict_entities {
            for endpoint in [relation.source(), relation.target()] {
                if !self.registry.contains(endpoint) {
                    return Err(GraphError::UnknownEntity(endpoint.clone()));
                }
            }
        }

        if relation.tag() == KindTag::Containment && !self.config.multi_containment {
            if let Some(parent) = self.containment_parent(relation.target()) {
                if parent != *relation.source() {
                    return Err(GraphError::ContainmentViolation {
                        entity: relation.target().clone(),
                        existing_parent: parent,
                    });
                }
            }
        }

        if self.config.acyclic
            && relation.is_directed()
            && self.reaches(relation.target(), relation.source())
        {
            return Err(GraphError::CycleDetected {
                from_entity: relation.source().clone(),
                to_entity: relation.target().clone(),
            });
        }

        // Commit.
        self.registry.resolve(relation.source())?;
        self.registry.resolve(relation.target())?;

        let source = relation.source().clone();
        let target = relation.target().clone();
        let symmetric = relation.is_symmetric();

        let (id, inserted) = self.relations.insert(relation);
        if inserted {
            self.outgoing.entry(source.clone()).or_default().push(id);
            self.incoming.entry(target.clone()).or_default().push(id);
            if symmetric {
                self.outgoing.entry(target.clone()).or_default().push(id);
                self.incoming.entry(source.clone()).or_default().push(id);
            }
            self.registry.add_reference(&source);
            self.registry.add_reference(&target);
            debug!(%source, %target, %id, "relation added");
        }
        Ok(inserted)
    }

    /// Remove every relation connecting `source` to `target` (either
    /// orientation for symmetric kinds), optionally restricted to one
    /// label. Returns the number removed.
    pub fn remove(
        &mut self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: Option<&Label>,
    ) -> usize {
        let source = source.into();
        let target = target.into();
        let removed = self.relations.take_matching(&source, &target, label);
        for (id, relation) in &removed {
            self.unindex(*id, relation);
            self.registry.release_reference(relation.source());
            self.registry.release_reference(relation.target());
        }
        if !removed.is_empty() {
            debug!(%source, %target, count = removed.len(), "relations removed");
        }
        removed.len()
    }

    fn unindex(&mut self, id: RelationId, relation: &Relation) {
        let drop_from = |index: &mut FxHashMap<EntityId, Vec<RelationId>>, key: &EntityId| {
            if let Some(ids) = index.get_mut(key) {
                ids.retain(|candidate| *candidate != id);
                if ids.is_empty() {
                    index.remove(key);
                }
            }
        };
        drop_from(&mut self.outgoing, relation.source());
        drop_from(&mut self.incoming, relation.target());
        if relation.is_symmetric() {
            drop_from(&mut self.outgoing, relation.target());
            drop_from(&mut self.incoming, relation.source());
        }
    }

    /// True if any relation connects `a` to `b` (a↔b for symmetric kinds).
    pub fn has_edge(&self, a: impl Into<EntityId>, b: impl Into<EntityId>) -> bool {
        let a = a.into();
        let b = b.into();
        self.outgoing
            .get(&a)
            .map(|ids| {
                ids.iter().any(|id| {
                    self.relations
                        .get(*id)
                        .and_then(|rel| rel.endpoint_from(&a))
                        .is_some_and(|next| *next == b)
                })
            })
            .unwrap_or(false)
    }

    /// Distinct neighboring entities in the given direction, ordered by
    /// first appearance.
    pub fn neighbors(&self, entity: impl Into<EntityId>, direction: Direction) -> Vec<EntityId> {
        let entity = entity.into();
        let mut result: Vec<EntityId> = Vec::new();
        let mut push = |candidate: &EntityId| {
            if !result.contains(candidate) {
                result.push(candidate.clone());
            }
        };

        if matches!(direction, Direction::Outgoing | Direction::Both) {
            for id in self.outgoing.get(&entity).into_iter().flatten() {
                if let Some(next) = self.relations.get(*id).and_then(|r| r.endpoint_from(&entity)) {
                    push(next);
                }
            }
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            for id in self.incoming.get(&entity).into_iter().flatten() {
                if let Some(rel) = self.relations.get(*id) {
                    let neighbor = if *rel.source() == entity {
                        rel.target()
                    } else {
                        rel.source()
                    };
                    push(neighbor);
                }
            }
        }
        result
    }

    /// Number of distinct relations incident to the entity. Parallel edges
    /// count separately; a symmetric edge counts once.
    pub fn degree(&self, entity: impl Into<EntityId>) -> usize {
        let entity = entity.into();
        let mut ids: FxHashSet<RelationId> = FxHashSet::default();
        ids.extend(self.outgoing.get(&entity).into_iter().flatten());
        ids.extend(self.incoming.get(&entity).into_iter().flatten());
        ids.len()
    }

    pub fn contains_entity(&self, entity: impl Into<EntityId>) -> bool {
        self.registry.contains(&entity.into())
    }

    /// Register an entity ahead of use (required in strict mode).
    pub fn register_entity(&mut self, entity: impl Into<EntityId>) -> bool {
        self.registry.register(entity)
    }

    /// Register an entity with metadata; re-registration merges keys.
    pub fn register_entity_with_metadata(
        &mut self,
        entity: impl Into<EntityId>,
        metadata: PropertyMap,
    ) {
        self.registry.register_with_metadata(entity, metadata);
    }

    /// Remove an entity. Fails with `EntityInUse` while relations
    /// reference it (referential integrity).
    pub fn unregister_entity(&mut self, entity: &EntityId) -> GraphResult<Entity> {
        self.registry.unregister(entity)
    }

    pub fn entity(&self, entity: &EntityId) -> Option<&Entity> {
        self.registry.get(entity)
    }

    pub fn entity_mut(&mut self, entity: &EntityId) -> Option<&mut Entity> {
        self.registry.get_mut(entity)
    }

    /// Enumerate simple paths from `source` to `target`, lazily, by
    /// increasing length and then by edge insertion order at each branch
    /// point. Unknown endpoints yield an empty sequence.
    pub fn paths(
        &self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        limit: PathLimit,
    ) -> PathIter<'_, Self> {
        let source = source.into();
        let target = target.into();
        if !self.registry.contains(&source) || !self.registry.contains(&target) {
            return PathIter::exhausted(self, source, target);
        }
        PathIter::new(self, source, target, limit, None)
    }

    /// Like [`paths`](Self::paths), keeping only paths where every edge
    /// satisfies `predicate`.
    pub fn paths_where<'g, P>(
        &'g self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        limit: PathLimit,
        predicate: P,
    ) -> PathIter<'g, Self>
    where
        P: Fn(&Relation) -> bool + 'g,
    {
        let source = source.into();
        let target = target.into();
        if !self.registry.contains(&source) || !self.registry.contains(&target) {
            return PathIter::exhausted(self, source, target);
        }
        PathIter::new(self, source, target, limit, Some(Box::new(predicate)))
    }

    /// Paths where every edge is a dependency flagged critical.
    pub fn critical_paths(
        &self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        limit: PathLimit,
    ) -> PathIter<'_, Self> {
        self.paths_where(source, target, limit, |rel| rel.is_critical())
    }

    /// Total influence of `source` on `target`: Σ over simple paths of
    /// (Π edge weights) · decay^(length − 1). 0.0 when unreachable.
    pub fn total_influence(
        &self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        limit: PathLimit,
        decay: f64,
    ) -> f64 {
        let source = source.into();
        let target = target.into();
        if !self.registry.contains(&source) || !self.registry.contains(&target) {
            return 0.0;
        }
        algo::total_influence(self, source, target, limit, decay)
    }

    /// Net cascade effect through all-causal paths: Σ of signed strength
    /// products. 0.0 when no all-causal path exists.
    pub fn cascade_effect(
        &self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        limit: PathLimit,
    ) -> f64 {
        let source = source.into();
        let target = target.into();
        if !self.registry.contains(&source) || !self.registry.contains(&target) {
            return 0.0;
        }
        algo::cascade_effect(self, source, target, limit)
    }

    /// The containment parent of `entity`, if any.
    pub fn containment_parent(&self, entity: &EntityId) -> Option<EntityId> {
        self.incoming.get(entity).into_iter().flatten().find_map(|id| {
            self.relations
                .get(*id)
                .filter(|rel| rel.tag() == KindTag::Containment)
                .map(|rel| rel.source().clone())
        })
    }

    /// Depth-first reachability over directed, non-symmetric relations.
    fn reaches(&self, from: &EntityId, to: &EntityId) -> bool {
        if from == to {
            return true;
        }
        let mut seen: FxHashSet<EntityId> = FxHashSet::default();
        seen.insert(from.clone());
        let mut stack = vec![from.clone()];
        while let Some(node) = stack.pop() {
            for id in self.outgoing.get(&node).into_iter().flatten() {
                let Some(rel) = self.relations.get(*id) else { continue };
                // Acyclicity is defined over directed kinds only.
                if rel.is_symmetric() {
                    continue;
                }
                let next = rel.target();
                if next == to {
                    return true;
                }
                if seen.insert(next.clone()) {
                    stack.push(next.clone());
                }
            }
        }
        false
    }
}

impl EdgeExpander for RelationGraph {
    type Node = EntityId;

    fn edges_from(&self, node: &EntityId) -> Vec<(&Relation, EntityId)> {
        let mut edges = Vec::new();
        for id in self.outgoing.get(node).into_iter().flatten() {
            if let Some(rel) = self.relations.get(*id) {
                if let Some(next) = rel.endpoint_from(node) {
                    edges.push((rel, next.clone()));
                }
            }
        }
        edges
    }

    fn node_count(&self) -> usize {
        self.registry.len()
    }
}
