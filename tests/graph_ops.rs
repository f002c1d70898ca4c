// tests/graph_ops.rs

use dagsynth::dag::{
    DegreeLimits, TaskDag, connect_minimum, ensure_weakly_connected,
    ensure_weakly_connected_within, force_create_sink_nodes, force_create_source_nodes,
    min_in_node, min_out_node,
};
use dagsynth::errors::GenError;
use dagsynth_test_utils::{dag_from_edges, init_tracing, path_dag};

#[test]
fn sources_and_sinks_follow_topology() {
    let mut dag = dag_from_edges(4, &[(0, 2), (1, 2)]);
    assert_eq!(dag.sources(), vec![0, 1, 3]);
    assert_eq!(dag.sinks(), vec![2, 3]);

    dag.add_edge(2, 3);
    assert_eq!(dag.sources(), vec![0, 1]);
    assert_eq!(dag.sinks(), vec![3]);
}

#[test]
fn add_edge_ignores_duplicates() {
    let mut dag = path_dag(2);
    dag.add_edge(0, 1);
    assert_eq!(dag.edge_count(), 1);
}

#[test]
fn min_degree_selection_prefers_first_on_ties() {
    let dag = dag_from_edges(4, &[(0, 3), (1, 3), (1, 2)]);

    // Out-degrees: 0 -> 1, 1 -> 2, 2 -> 0, 3 -> 0.
    assert_eq!(min_out_node(&dag, [0, 1]), Some(0));
    assert_eq!(min_out_node(&dag, [1, 3, 2]), Some(3));

    // In-degrees: 2 -> 1, 3 -> 2.
    assert_eq!(min_in_node(&dag, [3, 2]), Some(2));
    assert_eq!(min_in_node(&dag, Vec::<usize>::new()), None);
}

#[test]
fn connect_minimum_uses_max_layer_size_edges() {
    init_tracing();

    let mut dag = TaskDag::with_nodes(5);
    connect_minimum(&mut dag, &[0, 1], &[2, 3, 4]).unwrap();

    assert_eq!(dag.edge_count(), 3);
    for n in [0, 1] {
        assert!(dag.out_degree(n) >= 1);
    }
    for n in [2, 3, 4] {
        assert!(dag.in_degree(n) >= 1);
    }
}

#[test]
fn connect_minimum_rejects_empty_layer() {
    let mut dag = TaskDag::with_nodes(2);
    let err = connect_minimum(&mut dag, &[], &[1]).unwrap_err();
    assert!(matches!(err, GenError::InvalidArgument(_)));
}

#[test]
fn weakly_connected_components_are_ordered_by_smallest_node() {
    let dag = dag_from_edges(6, &[(3, 4), (0, 1), (5, 2)]);
    assert_eq!(
        dag.weakly_connected_components(),
        vec![vec![0, 1], vec![2, 5], vec![3, 4]]
    );
}

#[test]
fn ensure_weakly_connected_joins_two_components() {
    init_tracing();

    // 0 -> 1 -> 2 and 3 -> 4
    let mut dag = dag_from_edges(5, &[(0, 1), (1, 2), (3, 4)]);
    ensure_weakly_connected(&mut dag, false, false).unwrap();

    // One edge from the smaller component: its node with the lowest
    // out-degree into the node of the largest one with the lowest in-degree.
    assert_eq!(dag.weakly_connected_components().len(), 1);
    assert_eq!(dag.edge_count(), 4);
    assert!(dag.has_edge(4, 0));
    assert!(dag.is_acyclic());
}

#[test]
fn ensure_weakly_connected_keeps_source_and_sink_counts() {
    // 0 -> 1 -> 2 and 3 -> 4
    let mut dag = dag_from_edges(5, &[(0, 1), (1, 2), (3, 4)]);
    let sources_before = dag.sources().len();
    let sinks_before = dag.sinks().len();

    ensure_weakly_connected(&mut dag, true, true).unwrap();

    assert_eq!(dag.weakly_connected_components().len(), 1);
    assert_eq!(dag.sources().len(), sources_before);
    assert_eq!(dag.sinks().len(), sinks_before);
    // The only edge allowed: 3 (non-sink) -> 1 or 2 (non-source).
    assert!(dag.has_edge(3, 1) || dag.has_edge(3, 2));
}

#[test]
fn ensure_weakly_connected_fails_for_isolated_node_when_counts_are_kept() {
    let mut dag = dag_from_edges(3, &[(0, 1)]);
    let err = ensure_weakly_connected(&mut dag, true, true).unwrap_err();
    assert!(matches!(err, GenError::BuildFailed(_)));
    assert!(err.is_retryable());
}

#[test]
fn bounded_connection_respects_degree_limits() {
    // 0 -> 1 and 2 -> 3; the only non-source target is 1, already at in-degree 1.
    let mut dag = dag_from_edges(4, &[(0, 1), (2, 3)]);
    let tight = DegreeLimits {
        max_in: 1,
        max_out: 2,
    };
    let err = ensure_weakly_connected_within(&mut dag, true, false, tight).unwrap_err();
    assert!(matches!(err, GenError::BuildFailed(_)));
    assert!(err.is_retryable());
    assert_eq!(dag.edge_count(), 2);

    let loose = DegreeLimits {
        max_in: 2,
        max_out: 2,
    };
    ensure_weakly_connected_within(&mut dag, true, false, loose).unwrap();
    assert!(dag.has_edge(3, 1));
    for n in dag.nodes() {
        assert!(dag.in_degree(n) <= 2);
        assert!(dag.out_degree(n) <= 2);
    }
}

#[test]
fn forced_sources_become_the_only_sources() {
    let mut dag = dag_from_edges(4, &[(0, 1), (2, 3)]);
    let created = force_create_source_nodes(&mut dag, 1).unwrap();

    assert_eq!(created, vec![4]);
    assert_eq!(dag.sources(), vec![4]);
    assert!(dag.is_acyclic());
}

#[test]
fn forced_sinks_become_the_only_sinks() {
    let mut dag = dag_from_edges(4, &[(0, 1), (2, 3)]);
    let created = force_create_sink_nodes(&mut dag, 3).unwrap();

    assert_eq!(created, vec![4, 5, 6]);
    assert_eq!(dag.sinks(), vec![4, 5, 6]);
    assert!(dag.is_acyclic());
}

#[test]
fn ancestors_and_longest_path() {
    let dag = dag_from_edges(5, &[(0, 1), (1, 2), (3, 2), (2, 4)]);
    let ancestors: Vec<usize> = dag.ancestors(4).into_iter().collect();
    assert_eq!(ancestors, vec![0, 1, 2, 3]);
    assert_eq!(dag.longest_path_nodes(), 4);
    assert_eq!(path_dag(7).longest_path_nodes(), 7);
}
