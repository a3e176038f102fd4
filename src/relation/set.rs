//! Deduplicating, insertion-ordered collection of relations
//!
//! Identity is `(source, target, label, kind-tag)`; symmetric kinds
//! normalize endpoint order so `Equivalence(a, b)` and `Equivalence(b, a)`
//! are the same edge. Adding a duplicate merges its properties into the
//! stored instance (last write wins per key) and changes nothing else.

use super::relation::{KindTag, Relation};
use super::types::{EntityId, Label, RelationId};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// Deduplication key for a relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RelationKey {
    source: EntityId,
    target: EntityId,
    label: Label,
    tag: KindTag,
}

impl RelationKey {
    pub(crate) fn of(relation: &Relation) -> Self {
        let (source, target) = if relation.is_symmetric() && relation.target < relation.source {
            (relation.target.clone(), relation.source.clone())
        } else {
            (relation.source.clone(), relation.target.clone())
        };
        RelationKey {
            source,
            target,
            label: relation.label.clone(),
            tag: relation.tag(),
        }
    }
}

/// An insertion-ordered set of relation instances.
///
/// Owns no entities; endpoints are referenced by id.
#[derive(Debug, Clone, Default)]
pub struct RelationSet {
    relations: IndexMap<RelationId, Relation>,
    by_key: FxHashMap<RelationKey, RelationId>,
    next_id: u64,
}

impl RelationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relation; returns true if it was newly inserted.
    ///
    /// A duplicate (same dedup key) merges its properties into the stored
    /// instance and returns false.
    pub fn add(&mut self, relation: Relation) -> bool {
        self.insert(relation).1
    }

    /// Insert and report the id the relation is stored under.
    pub(crate) fn insert(&mut self, relation: Relation) -> (RelationId, bool) {
        let key = RelationKey::of(&relation);
        if let Some(&id) = self.by_key.get(&key) {
            if let Some(existing) = self.relations.get_mut(&id) {
                existing.merge_properties(relation.properties);
            }
            return (id, false);
        }

        let id = RelationId::new(self.next_id);
        self.next_id += 1;
        self.by_key.insert(key, id);
        self.relations.insert(id, relation);
        (id, true)
    }

    /// Remove every relation connecting `source` to `target` (either
    /// orientation for symmetric kinds), optionally restricted to one label.
    /// Returns the number removed.
    pub fn remove(&mut self, source: &EntityId, target: &EntityId, label: Option<&Label>) -> usize {
        self.take_matching(source, target, label).len()
    }

    /// Remove matching relations and hand them back with their ids, so the
    /// owning graph can repair its adjacency indices.
    pub(crate) fn take_matching(
        &mut self,
        source: &EntityId,
        target: &EntityId,
        label: Option<&Label>,
    ) -> Vec<(RelationId, Relation)> {
        let matched: Vec<RelationId> = self
            .relations
            .iter()
            .filter(|(_, rel)| Self::matches(rel, source, target, label))
            .map(|(id, _)| *id)
            .collect();

        let mut removed = Vec::with_capacity(matched.len());
        for id in matched {
            // shift_remove keeps survivors in insertion order
            if let Some(rel) = self.relations.shift_remove(&id) {
                self.by_key.remove(&RelationKey::of(&rel));
                removed.push((id, rel));
            }
        }
        removed
    }

    /// True if any relation connects `source` to `target`, optionally
    /// restricted to one label.
    pub fn has(&self, source: &EntityId, target: &EntityId, label: Option<&Label>) -> bool {
        self.relations
            .values()
            .any(|rel| Self::matches(rel, source, target, label))
    }

    fn matches(
        relation: &Relation,
        source: &EntityId,
        target: &EntityId,
        label: Option<&Label>,
    ) -> bool {
        relation.connects(source, target) && label.map_or(true, |l| relation.label == *l)
    }

    /// Relations of one kind, snapshotted at call time in insertion order.
    pub fn by_kind(&self, tag: KindTag) -> Vec<&Relation> {
        self.relations.values().filter(|rel| rel.tag() == tag).collect()
    }

    /// All relations in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Look up a relation by its id.
    pub fn get(&self, id: RelationId) -> Option<&Relation> {
        self.relations.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: RelationId) -> Option<&mut Relation> {
        self.relations.get_mut(&id)
    }

    /// Ids and relations in insertion order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (RelationId, &Relation)> {
        self.relations.iter().map(|(id, rel)| (*id, rel))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
