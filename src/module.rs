//! Validator and transform surface for hosting module systems
//!
//! Hosting systems that register this crate as a module call
//! [`validators::all`] and [`transforms::all`] and receive plain function
//! values; the registration hook itself lives in the host. Nothing here
//! depends on the host: the functions are pure and operate on relations
//! alone.

/// Predicates over relations.
///
/// Relations built through this crate's constructors already satisfy all of
/// these; hosts apply them to relation data arriving from other sources
/// (deserialization, foreign modules).
pub mod validators {
    use crate::relation::Relation;

    /// A validation predicate over a single relation.
    pub type Validator = fn(&Relation) -> bool;

    /// The label is non-empty.
    pub fn label_non_empty(relation: &Relation) -> bool {
        !relation.label().is_empty()
    }

    /// Source and target are distinct entities.
    pub fn endpoints_distinct(relation: &Relation) -> bool {
        relation.source() != relation.target()
    }

    /// A causal strength, if present, is finite and within [-1, 1].
    pub fn strength_in_range(relation: &Relation) -> bool {
        relation
            .strength()
            .map_or(true, |s| s.is_finite() && (-1.0..=1.0).contains(&s))
    }

    /// Every validator this module exposes.
    pub fn all() -> Vec<Validator> {
        vec![label_non_empty, endpoints_distinct, strength_in_range]
    }
}

/// Normalizing transforms over relations.
pub mod transforms {
    use crate::relation::{Relation, RelationKind};

    /// A relation-to-relation transform.
    pub type Transform = fn(Relation) -> Relation;

    /// Trim surrounding whitespace from the label.
    pub fn normalize_label(mut relation: Relation) -> Relation {
        let trimmed = relation.label.as_str().trim();
        if trimmed.len() != relation.label.as_str().len() {
            relation.label = trimmed.into();
        }
        relation
    }

    /// Clamp a causal strength into [-1, 1].
    pub fn clamp_strength(mut relation: Relation) -> Relation {
        if let RelationKind::Causal { strength, delay } = relation.kind {
            relation.kind = RelationKind::Causal {
                strength: strength.clamp(-1.0, 1.0),
                delay,
            };
        }
        relation
    }

    /// Every transform this module exposes.
    pub fn all() -> Vec<Transform> {
        vec![normalize_label, clamp_strength]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;

    #[test]
    fn test_validators_accept_constructed_relations() {
        let rel = Relation::causal("a", "b", "drives", 0.5).unwrap();
        for validator in validators::all() {
            assert!(validator(&rel));
        }
    }

    #[test]
    fn test_normalize_label() {
        let rel = Relation::association("a", "b", "  links ").unwrap();
        let rel = transforms::normalize_label(rel);
        assert_eq!(rel.label().as_str(), "links");
    }

    #[test]
    fn test_transforms_are_idempotent_on_valid_relations() {
        let rel = Relation::causal("a", "b", "drives", -0.3).unwrap();
        let mut out = rel.clone();
        for transform in transforms::all() {
            out = transform(out);
        }
        assert_eq!(out, rel);
    }
}
