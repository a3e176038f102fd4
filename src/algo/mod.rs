//! Graph analysis: simple-path enumeration and influence aggregation
//!
//! The engines here are generic over [`EdgeExpander`], a read-only view of
//! a relation topology, so the same code serves single-layer graphs and the
//! multilayer union view.

pub mod influence;
pub mod paths;

pub use influence::{cascade_effect, total_influence};
pub use paths::{EdgeExpander, Path, PathIter, PathLimit};
