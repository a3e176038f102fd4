//! Influence and cascade aggregation over simple paths
//!
//! Both aggregations sum a per-path product over every simple path found by
//! the enumeration in [`paths`](super::paths). The degenerate zero-edge
//! path (source == target) carries no influence and is excluded.

use super::paths::{EdgeExpander, PathIter, PathLimit};
use crate::relation::{Relation, RelationKind};

/// Total influence of `source` on `target`.
///
/// Sums, over every simple path, the product of each edge's `weight()`
/// scaled by `decay^(path length - 1)`. Returns 0.0 when no path exists.
///
/// With non-negative weights and decay this is monotone: increasing any
/// single edge weight on a contributing path never decreases the result.
pub fn total_influence<X: EdgeExpander>(
    expander: &X,
    source: X::Node,
    target: X::Node,
    limit: PathLimit,
    decay: f64,
) -> f64 {
    PathIter::new(expander, source, target, limit, None)
        .filter(|path| !path.is_empty())
        .map(|path| path.weight_product() * decay.powi(path.len() as i32 - 1))
        .sum()
}

/// Net cascade effect of `source` on `target` through causal relations.
///
/// Restricted to paths composed entirely of causal edges; each path
/// contributes the signed product of strengths, so two inhibiting links
/// compose to a reinforcing effect. Returns 0.0 when no all-causal path
/// exists. The result is not clamped; callers interpret sign and magnitude.
pub fn cascade_effect<X: EdgeExpander>(
    expander: &X,
    source: X::Node,
    target: X::Node,
    limit: PathLimit,
) -> f64 {
    let causal_only: Box<dyn Fn(&Relation) -> bool> =
        Box::new(|rel| matches!(rel.kind(), RelationKind::Causal { .. }));
    PathIter::new(expander, source, target, limit, Some(causal_only))
        .filter(|path| !path.is_empty())
        .map(|path| path.weight_product())
        .sum()
}
