//! Cross-layer composition: couplings as the only bridges between layers.

use relata::{GraphError, MultilayerGraph, PathLimit, Relation, RelationGraph};

fn policy_stack() -> MultilayerGraph {
    let mut economy = RelationGraph::new();
    economy.add(Relation::causal("carbon_tax", "fuel_price", "raises", 0.7).unwrap()).unwrap();
    economy
        .add(Relation::causal("fuel_price", "driving", "discourages", -0.5).unwrap())
        .unwrap();

    let mut environment = RelationGraph::new();
    environment
        .add(Relation::causal("emissions", "air_quality", "degrades", -0.8).unwrap())
        .unwrap();

    let mut stack = MultilayerGraph::new();
    stack.add_layer("economy", economy).unwrap();
    stack.add_layer("environment", environment).unwrap();
    stack
}

#[test]
fn coupling_is_the_only_bridge_between_layers() {
    let mut stack = policy_stack();

    assert_eq!(
        stack
            .cross_layer_paths("economy", "carbon_tax", "environment", "air_quality", PathLimit::Unbounded)
            .count(),
        0
    );

    stack
        .couple(
            "economy",
            "driving",
            "environment",
            "emissions",
            Relation::causal("x", "y", "produces", 0.9).unwrap(),
        )
        .unwrap();

    let paths: Vec<_> = stack
        .cross_layer_paths("economy", "carbon_tax", "environment", "air_quality", PathLimit::Unbounded)
        .collect();
    assert_eq!(paths.len(), 1);
    // carbon_tax -> fuel_price -> driving -> emissions -> air_quality
    assert_eq!(paths[0].len(), 4);

    // Removing the coupling edge severs the layers again.
    stack.decouple("economy", "driving", "environment", "emissions", None);
    assert_eq!(
        stack
            .cross_layer_paths("economy", "carbon_tax", "environment", "air_quality", PathLimit::Unbounded)
            .count(),
        0
    );
}

#[test]
fn coupling_endpoints_must_exist_in_their_layers() {
    let mut stack = policy_stack();
    let rel = Relation::association("x", "y", "links").unwrap();

    assert!(matches!(
        stack.couple("economy", "nonexistent", "environment", "emissions", rel.clone()),
        Err(GraphError::UnknownEntity(_))
    ));
    assert!(matches!(
        stack.couple("health", "carbon_tax", "environment", "emissions", rel),
        Err(GraphError::UnknownLayer(_))
    ));
    assert_eq!(stack.couplings().len(), 0);
}

#[test]
fn duplicate_layer_name_is_rejected() {
    let mut stack = policy_stack();
    assert_eq!(
        stack.add_layer("economy", RelationGraph::new()),
        Err(GraphError::DuplicateLayer("economy".to_string()))
    );
}

#[test]
fn cross_layer_influence_composes_weights_across_the_coupling() {
    let mut stack = policy_stack();
    stack
        .couple(
            "economy",
            "driving",
            "environment",
            "emissions",
            Relation::causal("x", "y", "produces", 0.9).unwrap(),
        )
        .unwrap();

    let influence = stack.cross_layer_influence(
        "economy",
        "carbon_tax",
        "environment",
        "air_quality",
        PathLimit::Unbounded,
        1.0,
    );
    // 0.7 * -0.5 * 0.9 * -0.8
    assert!((influence - 0.252).abs() < 1e-9);
}

#[test]
fn layer_queries_remain_available_per_layer() {
    let stack = policy_stack();
    let economy = stack.layer("economy").unwrap();
    assert!(economy.has_edge("carbon_tax", "fuel_price"));
    assert_eq!(economy.paths("carbon_tax", "driving", PathLimit::Unbounded).count(), 1);
    assert!(stack.layer("health").is_none());
}
