//! Simple-path enumeration over relation topologies
//!
//! [`PathIter`] enumerates simple paths (no repeated entity, except that a
//! path may start and end at the same entity, which is how cycles are
//! observed) between two nodes, lazily and in a deterministic order: by
//! increasing length, then by the insertion order of edges at each branch
//! point. It runs iterative-deepening depth-first search, so paths of
//! length n are yielded before any path of length n + 1 without
//! materializing the whole result.
//!
//! The enumeration is generic over [`EdgeExpander`] so that a single-layer
//! [`RelationGraph`] and the multilayer union view share one engine.
//!
//! [`RelationGraph`]: crate::graph::RelationGraph

use crate::relation::Relation;
use std::hash::Hash;

/// Bound on the number of edges in an enumerated path.
///
/// Callers must choose explicitly: enumeration cost grows exponentially
/// with the bound on dense graphs. `Unbounded` is safe in the sense that it
/// caps at the longest possible simple path for the topology, so it always
/// terminates, but it can still be expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLimit {
    /// At most this many edges.
    Edges(usize),
    /// Up to the longest simple path the topology admits.
    Unbounded,
}

impl PathLimit {
    /// Effective edge cap given the topology size. A simple path between
    /// distinct endpoints has at most `nodes - 1` edges; a simple cycle
    /// (source == target) has at most `nodes` edges.
    fn cap(self, node_count: usize, cyclic_query: bool) -> usize {
        match self {
            PathLimit::Edges(n) => n,
            PathLimit::Unbounded => {
                if cyclic_query {
                    node_count
                } else {
                    node_count.saturating_sub(1)
                }
            }
        }
    }
}

/// Read-only edge source for path enumeration.
///
/// Implementors expose, for a given node, the traversable edges in
/// insertion order together with the node each edge leads to. Symmetric
/// relations appear from both endpoints; directed relations only from their
/// source.
pub trait EdgeExpander {
    type Node: Clone + Eq + Hash;

    /// Traversable edges leaving `node`, in insertion order.
    fn edges_from(&self, node: &Self::Node) -> Vec<(&Relation, Self::Node)>;

    /// Total number of nodes in the topology; bounds simple-path length.
    fn node_count(&self) -> usize;
}

/// An ordered sequence of relations forming a simple path.
#[derive(Debug, Clone)]
pub struct Path<'g> {
    edges: Vec<&'g Relation>,
}

impl<'g> Path<'g> {
    pub(crate) fn new(edges: Vec<&'g Relation>) -> Self {
        Path { edges }
    }

    /// Number of edges in the path.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True for the degenerate zero-edge path.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The relations along the path, in traversal order.
    pub fn relations(&self) -> &[&'g Relation] {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = &'g Relation> + '_ {
        self.edges.iter().copied()
    }

    /// Product of `weight()` along the path. The empty product is 1.0.
    pub fn weight_product(&self) -> f64 {
        self.edges.iter().map(|rel| rel.weight()).product()
    }
}

/// Edge predicate applied during enumeration.
type EdgeFilter<'g> = Box<dyn Fn(&Relation) -> bool + 'g>;

struct Frame<'g, N> {
    edges: Vec<(&'g Relation, N)>,
    next: usize,
}

/// Lazy iterator over simple paths, in increasing-length order.
pub struct PathIter<'g, X: EdgeExpander> {
    expander: &'g X,
    source: X::Node,
    target: X::Node,
    max_len: usize,
    predicate: Option<EdgeFilter<'g>>,
    /// Length currently being enumerated.
    depth: usize,
    started: bool,
    done: bool,
    stack: Vec<Frame<'g, X::Node>>,
    path: Vec<&'g Relation>,
    visited: Vec<X::Node>,
}

impl<'g, X: EdgeExpander> PathIter<'g, X> {
    pub(crate) fn new(
        expander: &'g X,
        source: X::Node,
        target: X::Node,
        limit: PathLimit,
        predicate: Option<EdgeFilter<'g>>,
    ) -> Self {
        let cyclic_query = source == target;
        let max_len = limit.cap(expander.node_count(), cyclic_query);
        PathIter {
            expander,
            source,
            target,
            max_len,
            predicate,
            depth: 0,
            started: false,
            done: false,
            stack: Vec::new(),
            path: Vec::new(),
            visited: Vec::new(),
        }
    }

    /// An iterator that yields nothing; used when an endpoint does not
    /// exist (absence is an empty result, not an error).
    pub(crate) fn exhausted(expander: &'g X, source: X::Node, target: X::Node) -> Self {
        let mut iter = Self::new(expander, source, target, PathLimit::Edges(0), None);
        iter.done = true;
        iter
    }

    fn expand(&self, node: &X::Node) -> Vec<(&'g Relation, X::Node)> {
        let expander: &'g X = self.expander;
        let mut edges = expander.edges_from(node);
        if let Some(predicate) = &self.predicate {
            edges.retain(|(rel, _)| predicate(rel));
        }
        edges
    }
}

impl<'g, X: EdgeExpander> Iterator for PathIter<'g, X> {
    type Item = Path<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            // Depth 0: only the degenerate zero-edge path, and only when
            // source and target coincide.
            if self.depth == 0 {
                self.depth = 1;
                self.started = false;
                let at_cap = self.max_len == 0;
                if self.source == self.target {
                    if at_cap {
                        self.done = true;
                    }
                    return Some(Path::new(Vec::new()));
                }
                if at_cap {
                    self.done = true;
                    return None;
                }
                continue;
            }

            if self.depth > self.max_len {
                self.done = true;
                return None;
            }

            if !self.started {
                self.started = true;
                self.stack.clear();
                self.path.clear();
                self.visited.clear();
                let source = self.source.clone();
                self.visited.push(source.clone());
                let root = self.expand(&source);
                self.stack.push(Frame { edges: root, next: 0 });
            }

            // Depth-limited DFS for paths of exactly `depth` edges.
            loop {
                let (rel, node) = {
                    let Some(frame) = self.stack.last_mut() else { break };
                    if frame.next >= frame.edges.len() {
                        self.stack.pop();
                        if !self.stack.is_empty() {
                            self.path.pop();
                            self.visited.pop();
                        }
                        continue;
                    }
                    let step = frame.edges[frame.next].clone();
                    frame.next += 1;
                    step
                };

                let new_len = self.path.len() + 1;

                if node == self.target {
                    // The target terminates a simple path; it is never an
                    // interior node (that would repeat it later).
                    if new_len == self.depth {
                        let mut edges = self.path.clone();
                        edges.push(rel);
                        return Some(Path::new(edges));
                    }
                    continue;
                }

                if new_len < self.depth && !self.visited.contains(&node) {
                    self.path.push(rel);
                    self.visited.push(node.clone());
                    let edges = self.expand(&node);
                    self.stack.push(Frame { edges, next: 0 });
                }
            }

            // This depth is exhausted; move to the next length.
            self.depth += 1;
            self.started = false;
        }
    }
}
