//! The relation type system
//!
//! A closed set of relation kinds over one shared record: every relation has
//! a source, a target, a non-empty label and a property map; the kind payload
//! carries the per-variant fields (causal strength and delay, dependency
//! criticality). Constructors validate eagerly, so a [`Relation`] value that
//! exists is structurally valid.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EntityId, Label};
use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Discriminant of the closed relation-kind set.
///
/// Used for deduplication keys and `by_kind` queries; carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum KindTag {
    Association,
    Causal,
    Dependency,
    Equivalence,
    Containment,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KindTag::Association => "Association",
            KindTag::Causal => "Causal",
            KindTag::Dependency => "Dependency",
            KindTag::Equivalence => "Equivalence",
            KindTag::Containment => "Containment",
        };
        write!(f, "{}", name)
    }
}

/// Kind payload of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationKind {
    /// Plain typed association, directed, weight 1.0.
    Association,
    /// Causal influence. `strength` in [-1, 1]; sign encodes reinforcing
    /// (positive) vs inhibiting (negative) effect.
    Causal { strength: f64, delay: Duration },
    /// Directed dependency: source depends on target.
    Dependency { critical: bool },
    /// Symmetric equivalence, stored once and traversed once per step.
    Equivalence,
    /// Directed containment: source contains target.
    Containment,
}

impl RelationKind {
    pub fn tag(&self) -> KindTag {
        match self {
            RelationKind::Association => KindTag::Association,
            RelationKind::Causal { .. } => KindTag::Causal,
            RelationKind::Dependency { .. } => KindTag::Dependency,
            RelationKind::Equivalence => KindTag::Equivalence,
            RelationKind::Containment => KindTag::Containment,
        }
    }
}

/// A typed relation between two entities.
///
/// Relations are directed unless the kind is symmetric ([`Equivalence`]).
/// The property map is an opaque payload owned by the caller's domain.
///
/// [`Equivalence`]: RelationKind::Equivalence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub(crate) source: EntityId,
    pub(crate) target: EntityId,
    pub(crate) label: Label,
    pub(crate) properties: PropertyMap,
    pub(crate) kind: RelationKind,
}

impl Relation {
    /// Construct a relation of an explicit kind. Self-loops are rejected.
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
        kind: RelationKind,
    ) -> ValidationResult<Self> {
        Self::build(source.into(), target.into(), label.into(), kind, false)
    }

    /// Construct a relation of an explicit kind, permitting `source == target`.
    ///
    /// Equivalence self-loops stay rejected: an entity is trivially
    /// equivalent to itself and the edge would carry no information.
    pub fn new_self_loop_allowed(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
        kind: RelationKind,
    ) -> ValidationResult<Self> {
        Self::build(source.into(), target.into(), label.into(), kind, true)
    }

    /// Plain association between two entities.
    pub fn association(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
    ) -> ValidationResult<Self> {
        Self::new(source, target, label, RelationKind::Association)
    }

    /// Causal relation with zero delay. `strength` must lie in [-1, 1].
    pub fn causal(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
        strength: f64,
    ) -> ValidationResult<Self> {
        Self::causal_delayed(source, target, label, strength, Duration::ZERO)
    }

    /// Causal relation whose effect manifests after `delay`.
    pub fn causal_delayed(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
        strength: f64,
        delay: Duration,
    ) -> ValidationResult<Self> {
        Self::new(source, target, label, RelationKind::Causal { strength, delay })
    }

    /// Dependency of `source` on `target`.
    pub fn dependency(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
        critical: bool,
    ) -> ValidationResult<Self> {
        Self::new(source, target, label, RelationKind::Dependency { critical })
    }

    /// Symmetric equivalence of two entities. `equivalence(a, b, ..)` and
    /// `equivalence(b, a, ..)` denote the same edge.
    pub fn equivalence(
        a: impl Into<EntityId>,
        b: impl Into<EntityId>,
        label: impl Into<Label>,
    ) -> ValidationResult<Self> {
        Self::new(a, b, label, RelationKind::Equivalence)
    }

    /// Containment of `target` inside `source`.
    pub fn containment(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        label: impl Into<Label>,
    ) -> ValidationResult<Self> {
        Self::new(source, target, label, RelationKind::Containment)
    }

    fn build(
        source: EntityId,
        target: EntityId,
        label: Label,
        kind: RelationKind,
        allow_self_loop: bool,
    ) -> ValidationResult<Self> {
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel);
        }

        if source == target && (!allow_self_loop || kind.tag() == KindTag::Equivalence) {
            return Err(ValidationError::SelfLoopNotAllowed { entity: source });
        }

        if let RelationKind::Causal { strength, .. } = kind {
            if !strength.is_finite() || !(-1.0..=1.0).contains(&strength) {
                return Err(ValidationError::InvalidField {
                    field: "strength",
                    reason: format!("{} is outside [-1, 1]", strength),
                });
            }
        }

        Ok(Relation {
            source,
            target,
            label,
            properties: PropertyMap::new(),
            kind,
        })
    }

    pub fn source(&self) -> &EntityId {
        &self.source
    }

    pub fn target(&self) -> &EntityId {
        &self.target
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// Normalized weight used by influence aggregation: causal strength for
    /// causal relations, 1.0 for every other kind.
    pub fn weight(&self) -> f64 {
        match self.kind {
            RelationKind::Causal { strength, .. } => strength,
            _ => 1.0,
        }
    }

    pub fn is_directed(&self) -> bool {
        !self.is_symmetric()
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self.kind, RelationKind::Equivalence)
    }

    /// Causal strength, if this is a causal relation.
    pub fn strength(&self) -> Option<f64> {
        match self.kind {
            RelationKind::Causal { strength, .. } => Some(strength),
            _ => None,
        }
    }

    /// Causal delay, if this is a causal relation.
    pub fn delay(&self) -> Option<Duration> {
        match self.kind {
            RelationKind::Causal { delay, .. } => Some(delay),
            _ => None,
        }
    }

    /// True for a dependency flagged as critical.
    pub fn is_critical(&self) -> bool {
        matches!(self.kind, RelationKind::Dependency { critical: true })
    }

    /// True if this relation connects `a` to `b`: a→b for directed kinds,
    /// either orientation for symmetric kinds.
    pub fn connects(&self, a: &EntityId, b: &EntityId) -> bool {
        (self.source == *a && self.target == *b)
            || (self.is_symmetric() && self.source == *b && self.target == *a)
    }

    /// The endpoint reached by traversing this relation from `from`:
    /// the target when entering at the source, and (for symmetric kinds
    /// only) the source when entering at the target.
    pub fn endpoint_from(&self, from: &EntityId) -> Option<&EntityId> {
        if self.source == *from {
            Some(&self.target)
        } else if self.is_symmetric() && self.target == *from {
            Some(&self.source)
        } else {
            None
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Merge `other`'s properties into this relation, last write wins per key.
    pub(crate) fn merge_properties(&mut self, other: PropertyMap) {
        for (key, value) in other {
            self.properties.insert(key, value);
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.is_symmetric() { "<->" } else { "->" };
        write!(
            f,
            "{} {} {} [{}:{}]",
            self.source,
            arrow,
            self.target,
            self.tag(),
            self.label
        )
    }
}
