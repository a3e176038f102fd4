//! Single-layer relation graphs: configuration, invariant enforcement and
//! the traversal/analysis query surface.

pub mod config;
pub mod store;

pub use config::{Direction, GraphConfig};
pub use store::RelationGraph;
