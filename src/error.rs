//! Error types for relation construction and graph mutation
//!
//! Two layers, matching where a failure can happen:
//! - [`ValidationError`]: a relation instance could not be constructed.
//! - [`GraphError`]: a structurally valid relation was rejected by a graph
//!   or multilayer invariant.
//!
//! Mutating operations are all-or-nothing: an error means the structure is
//! unchanged. Query operations never use these types for "no result".

use crate::relation::EntityId;
use thiserror::Error;

/// Errors raised while constructing a relation instance.
///
/// Constructors validate eagerly; a relation value that exists is valid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A type-specific field constraint was violated.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The relation label was empty.
    #[error("relation label must be non-empty")]
    EmptyLabel,

    /// Source and target were the same entity where self-loops are disallowed.
    #[error("self-loop on entity {entity} not allowed")]
    SelfLoopNotAllowed { entity: EntityId },
}

/// Result alias for relation construction.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised by graph and multilayer mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The relation itself was invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An endpoint is not registered and the graph requires pre-registration.
    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    /// A multilayer operation referenced a layer name that was never added.
    #[error("layer `{0}` does not exist")]
    UnknownLayer(String),

    /// Committing the relation would create a directed cycle in acyclic mode.
    ///
    /// The fields avoid the name `source`, which thiserror reserves for
    /// error chaining.
    #[error("adding relation {from_entity} -> {to_entity} would create a cycle")]
    CycleDetected {
        from_entity: EntityId,
        to_entity: EntityId,
    },

    /// A layer with this name is already registered.
    #[error("layer `{0}` already exists")]
    DuplicateLayer(String),

    /// A containment edge would give the entity a second parent.
    #[error("entity {entity} is already contained by {existing_parent}")]
    ContainmentViolation {
        entity: EntityId,
        existing_parent: EntityId,
    },

    /// The entity is still referenced by relations and cannot be removed.
    #[error("entity {entity} is referenced by {references} relation(s)")]
    EntityInUse { entity: EntityId, references: usize },
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
