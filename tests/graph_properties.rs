//! End-to-end checks of the graph contracts: referential integrity,
//! acyclicity, dedup idempotence, path enumeration, influence aggregation
//! and critical-path filtering.

use relata::{
    GraphConfig, GraphError, KindTag, PathLimit, Relation, RelationGraph, RelationSet,
    ValidationError,
};

#[test]
fn referential_integrity_after_add() {
    let mut graph = RelationGraph::new();
    graph.add(Relation::causal("rainfall", "yield", "raises", 0.6).unwrap()).unwrap();

    assert!(graph.has_edge("rainfall", "yield"));
    assert!(graph.registry().contains(&"rainfall".into()));
    assert!(graph.registry().contains(&"yield".into()));
}

#[test]
fn acyclic_mode_never_admits_a_cycle() {
    let mut graph = RelationGraph::with_config(GraphConfig::new().acyclic(true));
    let edges = [
        ("a", "b"),
        ("b", "c"),
        ("c", "d"),
        ("d", "b"), // would close b -> c -> d -> b
        ("d", "a"), // would close a -> ... -> d -> a
        ("a", "c"), // fine: forward edge
    ];

    for (source, target) in edges {
        let _ = graph.add(Relation::association(source, target, "precedes").unwrap());
    }

    // No entity can reach itself through a non-degenerate path.
    for entity in ["a", "b", "c", "d"] {
        let cycles = graph
            .paths(entity, entity, PathLimit::Unbounded)
            .filter(|p| !p.is_empty())
            .count();
        assert_eq!(cycles, 0, "cycle reachable from {entity}");
    }
}

#[test]
fn dedup_idempotence() {
    let mut set = RelationSet::new();
    set.add(Relation::dependency("service", "db", "requires", true).unwrap());
    let before = set.all().count();

    set.add(Relation::dependency("service", "db", "requires", true).unwrap());
    assert_eq!(set.all().count(), before);
}

#[test]
fn chain_path_enumeration() {
    // A -> B -> C -> D
    let mut graph = RelationGraph::new();
    graph.add(Relation::association("A", "B", "next").unwrap()).unwrap();
    graph.add(Relation::association("B", "C", "next").unwrap()).unwrap();
    graph.add(Relation::association("C", "D", "next").unwrap()).unwrap();

    assert_eq!(graph.paths("A", "D", PathLimit::Edges(2)).count(), 0);

    let paths: Vec<_> = graph.paths("A", "D", PathLimit::Edges(3)).collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 3);
}

#[test]
fn influence_monotonicity() {
    // Two graphs identical except one edge weight is raised.
    let build = |middle: f64| {
        let mut graph = RelationGraph::new();
        graph.add(Relation::causal("a", "b", "drives", 0.5).unwrap()).unwrap();
        graph.add(Relation::causal("b", "c", "drives", middle).unwrap()).unwrap();
        graph.add(Relation::causal("a", "c", "drives", 0.2).unwrap()).unwrap();
        graph.total_influence("a", "c", PathLimit::Unbounded, 0.8)
    };

    let mut previous = build(0.0);
    for step in 1..=10 {
        let current = build(step as f64 / 10.0);
        assert!(
            current >= previous,
            "influence decreased when an edge weight rose: {previous} -> {current}"
        );
        previous = current;
    }
}

#[test]
fn cascade_sign_propagation() {
    let mut graph = RelationGraph::new();
    graph.add(Relation::causal("CarbonTax", "Emissions", "reduces", -0.6).unwrap()).unwrap();
    graph
        .add(Relation::causal("Emissions", "AirQuality", "degrades", -0.8).unwrap())
        .unwrap();
    graph
        .add(Relation::causal("AirQuality", "PublicHealth", "improves", 0.7).unwrap())
        .unwrap();

    let effect = graph.cascade_effect("CarbonTax", "PublicHealth", PathLimit::Unbounded);
    assert!((effect - (-0.6f64) * (-0.8) * 0.7).abs() < 1e-9);
    assert!((effect - 0.336).abs() < 1e-9);
}

#[test]
fn critical_path_filtering() {
    let mut graph = RelationGraph::new();
    graph
        .add(Relation::dependency("Supplier", "Manufacturer", "supplies", true).unwrap())
        .unwrap();
    graph
        .add(Relation::dependency("Manufacturer", "Distributor", "ships", false).unwrap())
        .unwrap();
    graph
        .add(Relation::dependency("Distributor", "Retailer", "delivers", true).unwrap())
        .unwrap();

    // The non-critical middle edge breaks the all-critical chain.
    assert_eq!(
        graph.critical_paths("Supplier", "Retailer", PathLimit::Unbounded).count(),
        0
    );
    assert_eq!(graph.paths("Supplier", "Retailer", PathLimit::Edges(3)).count(), 1);

    // Upgrading the middle edge restores the critical chain.
    graph.remove("Manufacturer", "Distributor", None);
    graph
        .add(Relation::dependency("Manufacturer", "Distributor", "ships", true).unwrap())
        .unwrap();
    assert_eq!(
        graph.critical_paths("Supplier", "Retailer", PathLimit::Unbounded).count(),
        1
    );
}

#[test]
fn paths_where_generalizes_the_predicate() {
    let mut graph = RelationGraph::new();
    graph.add(Relation::causal("a", "b", "drives", 0.9).unwrap()).unwrap();
    graph.add(Relation::causal("b", "c", "drives", 0.1).unwrap()).unwrap();
    graph.add(Relation::association("a", "c", "related").unwrap()).unwrap();

    let strong_only = graph
        .paths_where("a", "c", PathLimit::Unbounded, |rel| {
            rel.strength().map_or(false, |s| s.abs() >= 0.5)
        })
        .count();
    assert_eq!(strong_only, 0);

    let causal_only = graph
        .paths_where("a", "c", PathLimit::Unbounded, |rel| rel.tag() == KindTag::Causal)
        .count();
    assert_eq!(causal_only, 1);
}

#[test]
fn mutations_report_failures_and_leave_state_intact() {
    // Construction failure.
    assert!(matches!(
        Relation::causal("a", "b", "drives", 2.0),
        Err(ValidationError::InvalidField { field: "strength", .. })
    ));

    // Structural failure: graph unchanged afterwards.
    let mut graph = RelationGraph::with_config(GraphConfig::new().acyclic(true));
    graph.add(Relation::association("a", "b", "links").unwrap()).unwrap();
    let err = graph.add(Relation::association("b", "a", "links").unwrap()).unwrap_err();
    assert!(matches!(err, GraphError::CycleDetected { .. }));
    assert_eq!(graph.relation_count(), 1);
    assert!(!graph.has_edge("b", "a"));
}

#[test]
fn queries_on_absent_entities_return_empty_results() {
    let graph = RelationGraph::new();
    assert_eq!(graph.paths("x", "y", PathLimit::Unbounded).count(), 0);
    assert_eq!(graph.total_influence("x", "y", PathLimit::Unbounded, 1.0), 0.0);
    assert_eq!(graph.cascade_effect("x", "y", PathLimit::Unbounded), 0.0);
    assert!(!graph.has_edge("x", "y"));
}

#[test]
fn relation_set_round_trips_into_a_graph() {
    let mut set = RelationSet::new();
    set.add(Relation::causal("tax", "spending", "dampens", -0.5).unwrap());
    set.add(Relation::dependency("spending", "growth", "feeds", true).unwrap());
    set.add(Relation::equivalence("growth", "expansion", "same_as").unwrap());

    let graph = RelationGraph::from_set(set, GraphConfig::default()).unwrap();
    assert_eq!(graph.relation_count(), 3);
    assert!(graph.has_edge("expansion", "growth"), "symmetric edge traverses both ways");
    assert_eq!(graph.paths("tax", "expansion", PathLimit::Unbounded).count(), 1);
}
