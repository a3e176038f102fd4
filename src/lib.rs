//! Relata
//!
//! A domain-agnostic library for typed relations between named entities
//! (causal influence, dependency, equivalence, containment) and for
//! composing them into queryable graphs. Domain modules (economics,
//! governance, biology, ...) supply their own entity vocabularies and reuse
//! these relation and graph primitives.
//!
//! # Architecture
//!
//! - [`relation`]: the relation type system and the deduplicating
//!   [`RelationSet`] collection.
//! - [`registry`]: the entity registry backing referential integrity, with
//!   lenient (auto-register) and strict (pre-register) modes.
//! - [`graph`]: [`RelationGraph`], a single-layer directed multigraph with
//!   invariant enforcement (optional acyclicity, containment forest) and
//!   the traversal/analysis queries.
//! - [`algo`]: simple-path enumeration and influence/cascade aggregation,
//!   generic over a read-only topology view.
//! - [`multilayer`]: [`MultilayerGraph`], named layers plus cross-layer
//!   coupling edges, queried through a logical union view.
//! - [`module`]: the validator/transform surface consumed by hosting
//!   module systems.
//!
//! The core is single-threaded and synchronous; share a graph across
//! threads only with external synchronization.
//!
//! # Example
//!
//! ```rust
//! use relata::{PathLimit, Relation, RelationGraph};
//!
//! let mut graph = RelationGraph::new();
//! graph.add(Relation::causal("CarbonTax", "Emissions", "reduces", -0.6).unwrap()).unwrap();
//! graph.add(Relation::causal("Emissions", "AirQuality", "degrades", -0.8).unwrap()).unwrap();
//! graph.add(Relation::causal("AirQuality", "PublicHealth", "improves", 0.7).unwrap()).unwrap();
//!
//! let effect = graph.cascade_effect("CarbonTax", "PublicHealth", PathLimit::Unbounded);
//! assert!((effect - 0.336).abs() < 1e-9);
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod graph;
pub mod module;
pub mod multilayer;
pub mod registry;
pub mod relation;

// Re-export main types for convenience
pub use algo::{EdgeExpander, Path, PathIter, PathLimit};
pub use error::{GraphError, GraphResult, ValidationError, ValidationResult};
pub use graph::{Direction, GraphConfig, RelationGraph};
pub use multilayer::{LayerEntity, MultilayerGraph};
pub use registry::{Entity, EntityRegistry, RegistryMode};
pub use relation::{
    EntityId, KindTag, Label, PropertyMap, PropertyValue, Relation, RelationId, RelationKind,
    RelationSet,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
