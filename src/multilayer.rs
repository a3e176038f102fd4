//! Multilayer graphs: named layers coupled by cross-layer edges
//!
//! A [`MultilayerGraph`] composes several [`RelationGraph`] layers (an
//! economics layer, a governance layer, ...) and a separate set of coupling
//! edges whose endpoints are `(layer, entity)` pairs. Cross-layer queries
//! run over a logical union of the layers and the couplings; per-layer
//! state is never merged or duplicated.

use crate::algo::{self, EdgeExpander, PathIter, PathLimit};
use crate::error::{GraphError, GraphResult};
use crate::graph::RelationGraph;
use crate::relation::{EntityId, Label, Relation, RelationId, RelationSet};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

/// An entity addressed within a named layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerEntity {
    pub layer: String,
    pub entity: EntityId,
}

impl LayerEntity {
    pub fn new(layer: impl Into<String>, entity: impl Into<EntityId>) -> Self {
        LayerEntity {
            layer: layer.into(),
            entity: entity.into(),
        }
    }

    /// The scoped identifier coupling edges are stored under.
    fn scoped_id(&self) -> EntityId {
        EntityId::new(format!("{}::{}", self.layer, self.entity))
    }
}

impl fmt::Display for LayerEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.layer, self.entity)
    }
}

/// An ordered collection of named relation-graph layers plus cross-layer
/// coupling edges.
#[derive(Debug, Clone, Default)]
pub struct MultilayerGraph {
    layers: IndexMap<String, RelationGraph>,
    /// Coupling edges, stored under layer-scoped entity ids.
    couplings: RelationSet,
    /// Coupling id -> its (layer, entity) endpoints.
    endpoints: FxHashMap<RelationId, (LayerEntity, LayerEntity)>,
    /// Couplings traversable from a layer entity, in insertion order.
    coupling_adj: FxHashMap<LayerEntity, Vec<RelationId>>,
}

impl MultilayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named layer. Layer order is the order of registration.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        graph: RelationGraph,
    ) -> GraphResult<()> {
        let name = name.into();
        if self.layers.contains_key(&name) {
            return Err(GraphError::DuplicateLayer(name));
        }
        debug!(layer = %name, "layer added");
        self.layers.insert(name, graph);
        Ok(())
    }

    pub fn layer(&self, name: &str) -> Option<&RelationGraph> {
        self.layers.get(name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut RelationGraph> {
        self.layers.get_mut(name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The coupling edges, endpoints under their `layer::entity` ids.
    pub fn couplings(&self) -> &RelationSet {
        &self.couplings
    }

    /// Couple an entity in one layer to an entity in another.
    ///
    /// `relation` supplies the kind, label and properties of the coupling;
    /// its own endpoints are replaced by the layer-scoped pair. Both
    /// endpoints must exist in their layers, and they must be distinct:
    /// coupling an entity to itself is a self-loop. Returns true if the
    /// coupling was newly inserted (duplicates merge properties, as in
    /// [`RelationSet::add`]).
    pub fn couple(
        &mut self,
        layer_a: &str,
        entity_a: impl Into<EntityId>,
        layer_b: &str,
        entity_b: impl Into<EntityId>,
        relation: Relation,
    ) -> GraphResult<bool> {
        let a = LayerEntity::new(layer_a, entity_a);
        let b = LayerEntity::new(layer_b, entity_b);
        self.resolve_endpoint(&a)?;
        self.resolve_endpoint(&b)?;

        let symmetric = relation.is_symmetric();
        // Rebuild through the validating constructor so the scoped relation
        // satisfies the same invariants as any other; in particular a == b
        // is a self-loop and is rejected.
        let mut coupling =
            Relation::new(a.scoped_id(), b.scoped_id(), relation.label, relation.kind)?;
        coupling.merge_properties(relation.properties);

        let (id, inserted) = self.couplings.insert(coupling);
        if inserted {
            self.endpoints.insert(id, (a.clone(), b.clone()));
            self.coupling_adj.entry(a.clone()).or_default().push(id);
            if symmetric {
                self.coupling_adj.entry(b.clone()).or_default().push(id);
            }
            debug!(source = %a, target = %b, "layers coupled");
        }
        Ok(inserted)
    }

    /// Remove coupling edges between two layer entities, optionally
    /// restricted to one label. Returns the number removed.
    pub fn decouple(
        &mut self,
        layer_a: &str,
        entity_a: impl Into<EntityId>,
        layer_b: &str,
        entity_b: impl Into<EntityId>,
        label: Option<&Label>,
    ) -> usize {
        let a = LayerEntity::new(layer_a, entity_a);
        let b = LayerEntity::new(layer_b, entity_b);
        let removed = self
            .couplings
            .take_matching(&a.scoped_id(), &b.scoped_id(), label);
        for (id, _) in &removed {
            if let Some((src, tgt)) = self.endpoints.remove(id) {
                for key in [src, tgt] {
                    if let Some(ids) = self.coupling_adj.get_mut(&key) {
                        ids.retain(|candidate| candidate != id);
                        if ids.is_empty() {
                            self.coupling_adj.remove(&key);
                        }
                    }
                }
            }
        }
        removed.len()
    }

    fn resolve_endpoint(&self, endpoint: &LayerEntity) -> GraphResult<()> {
        let graph = self
            .layers
            .get(&endpoint.layer)
            .ok_or_else(|| GraphError::UnknownLayer(endpoint.layer.clone()))?;
        if !graph.registry().contains(&endpoint.entity) {
            return Err(GraphError::UnknownEntity(endpoint.entity.clone()));
        }
        Ok(())
    }

    fn endpoint_known(&self, endpoint: &LayerEntity) -> bool {
        self.layers
            .get(&endpoint.layer)
            .is_some_and(|graph| graph.registry().contains(&endpoint.entity))
    }

    /// Enumerate simple paths across the union of all layers and the
    /// coupling edges, with the same semantics and ordering as
    /// [`RelationGraph::paths`]. At each step the current layer's internal
    /// edges are explored before couplings leaving the entity. Unknown
    /// layers or entities yield an empty sequence.
    pub fn cross_layer_paths(
        &self,
        source_layer: &str,
        source_entity: impl Into<EntityId>,
        target_layer: &str,
        target_entity: impl Into<EntityId>,
        limit: PathLimit,
    ) -> PathIter<'_, Self> {
        let source = LayerEntity::new(source_layer, source_entity);
        let target = LayerEntity::new(target_layer, target_entity);
        if !self.endpoint_known(&source) || !self.endpoint_known(&target) {
            return PathIter::exhausted(self, source, target);
        }
        PathIter::new(self, source, target, limit, None)
    }

    /// Total influence across the union graph; the cross-layer lift of
    /// [`RelationGraph::total_influence`].
    pub fn cross_layer_influence(
        &self,
        source_layer: &str,
        source_entity: impl Into<EntityId>,
        target_layer: &str,
        target_entity: impl Into<EntityId>,
        limit: PathLimit,
        decay: f64,
    ) -> f64 {
        let source = LayerEntity::new(source_layer, source_entity);
        let target = LayerEntity::new(target_layer, target_entity);
        if !self.endpoint_known(&source) || !self.endpoint_known(&target) {
            return 0.0;
        }
        algo::total_influence(self, source, target, limit, decay)
    }
}

impl EdgeExpander for MultilayerGraph {
    type Node = LayerEntity;

    fn edges_from(&self, node: &LayerEntity) -> Vec<(&Relation, LayerEntity)> {
        let mut edges = Vec::new();
        if let Some(graph) = self.layers.get(&node.layer) {
            for (rel, next) in graph.edges_from(&node.entity) {
                edges.push((rel, LayerEntity { layer: node.layer.clone(), entity: next }));
            }
        }
        for id in self.coupling_adj.get(node).into_iter().flatten() {
            let Some(rel) = self.couplings.get(*id) else { continue };
            let Some((a, b)) = self.endpoints.get(id) else { continue };
            let next = if a == node { b } else { a };
            edges.push((rel, next.clone()));
        }
        edges
    }

    fn node_count(&self) -> usize {
        self.layers.values().map(RelationGraph::entity_count).sum()
    }
}
