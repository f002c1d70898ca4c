// tests/builders.rs

use dagsynth::builder::{
    BuildContext, ChainBasedBuilder, DagBuilder, FanInFanOutBuilder, GnpBuilder, create_builder,
};
use dagsynth::builder::chain_based::build_chain;
use dagsynth::config::GraphStructure;
use dagsynth::errors::GenError;
use dagsynth::sampling::Choice;
use dagsynth_test_utils::builders::{
    GeneratorConfigBuilder, chains, fan_in_fan_out, gnp, merge, vertical_link,
};
use dagsynth_test_utils::{init_tracing, seeded};

// --- fan-in/fan-out ---

#[test]
fn fan_in_fan_out_reaches_node_count_within_degree_bounds() {
    init_tracing();

    let builder = FanInFanOutBuilder::new(fan_in_fan_out(20, 3, 3), 10, 100).unwrap();
    let mut rng = seeded(1);
    for _ in 0..10 {
        let dag = builder.build_one(&mut rng).unwrap();
        assert_eq!(dag.node_count(), 20);
        assert!(dag.is_acyclic());
        for n in dag.nodes() {
            assert!(dag.in_degree(n) <= 3, "in-degree of {n}");
            assert!(dag.out_degree(n) <= 3, "out-degree of {n}");
        }
    }
}

#[test]
fn fan_in_fan_out_adds_exit_nodes_and_connects() {
    init_tracing();

    let mut config = fan_in_fan_out(15, 2, 3);
    config.number_of_entry_nodes = Choice::Fixed(2);
    config.number_of_exit_nodes = Some(Choice::Fixed(2));
    config.ensure_weakly_connected = true;

    let builder = FanInFanOutBuilder::new(config, 5, 100).unwrap();
    let mut rng = seeded(2);
    for _ in 0..5 {
        let dag = builder.build_one(&mut rng).unwrap();
        assert_eq!(dag.node_count(), 15);
        assert_eq!(dag.sinks(), vec![13, 14]);
        assert_eq!(dag.weakly_connected_components().len(), 1);
        assert!(dag.is_acyclic());
    }
}

#[test]
fn fan_in_fan_out_connection_keeps_degree_bounds_with_several_entries() {
    init_tracing();

    let mut config = fan_in_fan_out(12, 2, 2);
    config.number_of_entry_nodes = Choice::Fixed(3);
    config.ensure_weakly_connected = true;

    let builder = FanInFanOutBuilder::new(config, 1, 200).unwrap();
    for seed in 0..20 {
        let dag = builder.build_one(&mut seeded(seed)).unwrap();
        assert_eq!(dag.node_count(), 12);
        assert_eq!(dag.sources().len(), 3, "seed {seed}");
        assert_eq!(dag.weakly_connected_components().len(), 1, "seed {seed}");
        for n in dag.nodes() {
            assert!(dag.in_degree(n) <= 2, "seed {seed}: in-degree of {n}");
            assert!(dag.out_degree(n) <= 2, "seed {seed}: out-degree of {n}");
        }
    }
}

#[test]
fn fan_in_fan_out_connection_fails_when_no_node_has_spare_in_degree() {
    // With in_degree 1 every non-entry node already has its single parent.
    let mut config = fan_in_fan_out(8, 1, 2);
    config.number_of_entry_nodes = Choice::Fixed(2);
    config.ensure_weakly_connected = true;

    let builder = FanInFanOutBuilder::new(config, 1, 20).unwrap();
    let err = builder.build_one(&mut seeded(6)).unwrap_err();
    assert!(matches!(err, GenError::BuildFailed(_)));
}

#[test]
fn fan_in_fan_out_rejects_too_many_entry_and_exit_nodes() {
    let mut config = fan_in_fan_out(4, 2, 2);
    config.number_of_entry_nodes = Choice::Fixed(3);
    config.number_of_exit_nodes = Some(Choice::Fixed(2));

    let err = FanInFanOutBuilder::new(config, 1, 10).unwrap_err();
    assert!(matches!(err, GenError::InfeasibleConfig(_)));
}

#[test]
fn fan_in_fan_out_rejects_zero_degree() {
    let err = FanInFanOutBuilder::new(fan_in_fan_out(10, 0, 2), 1, 10).unwrap_err();
    assert!(matches!(err, GenError::InfeasibleConfig(_)));
}

// --- G(n, p) ---

#[test]
fn gnp_with_probability_one_is_complete_upper_triangle() {
    let builder = GnpBuilder::new(gnp(6, 1.0), 1, 10).unwrap();
    let dag = builder.build_one(&mut seeded(3)).unwrap();

    assert_eq!(dag.node_count(), 6);
    assert_eq!(dag.edge_count(), 15);
    for i in 0..6 {
        for j in (i + 1)..6 {
            assert!(dag.has_edge(i, j), "missing {i} -> {j}");
        }
    }
}

#[test]
fn gnp_with_probability_zero_has_no_edges() {
    let builder = GnpBuilder::new(gnp(5, 0.0), 1, 10).unwrap();
    let dag = builder.build_one(&mut seeded(3)).unwrap();
    assert_eq!(dag.edge_count(), 0);
}

#[test]
fn gnp_forces_entry_and_exit_nodes() {
    init_tracing();

    let mut config = gnp(20, 0.2);
    config.number_of_entry_nodes = Some(Choice::Fixed(2));
    config.number_of_exit_nodes = Some(Choice::Fixed(3));
    config.ensure_weakly_connected = true;

    let builder = GnpBuilder::new(config, 5, 100).unwrap();
    let mut rng = seeded(4);
    for _ in 0..5 {
        let dag = builder.build_one(&mut rng).unwrap();
        assert_eq!(dag.node_count(), 20);
        assert_eq!(dag.sources().len(), 2);
        assert_eq!(dag.sinks().len(), 3);
        assert_eq!(dag.weakly_connected_components().len(), 1);
        assert!(dag.is_acyclic());
    }
}

#[test]
fn gnp_rejects_negative_probability_and_no_inner_nodes() {
    let err = GnpBuilder::new(gnp(10, -0.1), 1, 10).unwrap_err();
    assert!(matches!(err, GenError::InfeasibleConfig(_)));

    let mut config = gnp(2, 0.5);
    config.number_of_entry_nodes = Some(Choice::Fixed(1));
    config.number_of_exit_nodes = Some(Choice::Fixed(1));
    let err = GnpBuilder::new(config, 1, 10).unwrap_err();
    assert!(matches!(err, GenError::InfeasibleConfig(_)));
}

#[test]
fn gnp_builds_tiny_graphs_without_entry_or_exit_nodes() {
    let builder = GnpBuilder::new(gnp(1, 0.5), 1, 10).unwrap();
    let dag = builder.build_one(&mut seeded(5)).unwrap();
    assert_eq!(dag.node_count(), 1);
    assert_eq!(dag.edge_count(), 0);

    let builder = GnpBuilder::new(gnp(2, 1.0), 1, 10).unwrap();
    let dag = builder.build_one(&mut seeded(5)).unwrap();
    assert_eq!(dag.node_count(), 2);
    assert!(dag.has_edge(0, 1));

    // One entry node plus one inner node.
    let mut config = gnp(2, 0.0);
    config.number_of_entry_nodes = Some(Choice::Fixed(1));
    let dag = GnpBuilder::new(config, 1, 10)
        .unwrap()
        .build_one(&mut seeded(5))
        .unwrap();
    assert_eq!(dag.node_count(), 2);
    assert_eq!(dag.sources().len(), 1);
}

// --- chain-based ---

#[test]
fn chain_without_sub_sequences_is_a_path() {
    let mut ctx = BuildContext::new();
    let chain = build_chain(&mut ctx, 5, 0, &mut seeded(0));

    assert_eq!(chain.nodes, vec![0, 1, 2, 3, 4]);
    assert_eq!(chain.head, 0);
    assert_eq!(chain.main_tail, 4);
    assert!(chain.sub_sequence_tails.is_empty());
    assert_eq!(ctx.allocated(), 5);
}

#[test]
fn sub_sequences_never_outgrow_the_main_sequence() {
    let builder = ChainBasedBuilder::new(
        {
            let mut c = chains(1, 6);
            c.number_of_sub_sequences = Some(Choice::Fixed(3));
            c
        },
        20,
        10,
    )
    .unwrap();

    let mut rng = seeded(5);
    for _ in 0..20 {
        let dag = builder.build_one(&mut rng).unwrap();
        assert_eq!(dag.longest_path_nodes(), 6);
        assert_eq!(dag.sources(), vec![0]);
        assert_eq!(dag.chains()[0].sub_sequence_tails.len(), 3);
    }
}

#[test]
fn chains_without_sub_sequences_have_main_length_paths() {
    let builder = ChainBasedBuilder::new(chains(3, 4), 1, 10).unwrap();
    let dag = builder.build_one(&mut seeded(6)).unwrap();

    assert_eq!(dag.node_count(), 12);
    assert_eq!(dag.longest_path_nodes(), 4);
    assert_eq!(dag.chains().len(), 3);
    assert_eq!(dag.weakly_connected_components().len(), 3);
}

#[test]
fn vertical_link_keeps_requested_entry_nodes() {
    init_tracing();

    let mut config = chains(5, 3);
    config.number_of_sub_sequences = Some(Choice::Fixed(1));
    config.vertically_link_chains = Some(vertical_link(2));

    let builder = ChainBasedBuilder::new(config, 10, 50).unwrap();
    let mut rng = seeded(7);
    for _ in 0..10 {
        let dag = builder.build_one(&mut rng).unwrap();
        assert_eq!(dag.sources().len(), 2);
        assert!(dag.is_acyclic());
    }
}

#[test]
fn merge_keeps_requested_exit_nodes() {
    init_tracing();

    let mut config = chains(4, 4);
    config.number_of_sub_sequences = Some(Choice::Fixed(1));
    config.merge_chains = Some(merge(2));

    let builder = ChainBasedBuilder::new(config, 10, 100).unwrap();
    let mut rng = seeded(8);
    for _ in 0..10 {
        let dag = builder.build_one(&mut rng).unwrap();
        assert_eq!(dag.sinks().len(), 2);
        assert_eq!(dag.sources().len(), 4);
        assert!(dag.is_acyclic());
    }
}

#[test]
fn chain_based_static_checks() {
    let mut config = chains(2, 1);
    config.number_of_sub_sequences = Some(Choice::Fixed(1));
    assert!(matches!(
        ChainBasedBuilder::new(config, 1, 10).unwrap_err(),
        GenError::InfeasibleConfig(_)
    ));

    let mut config = chains(2, 3);
    config.vertically_link_chains = Some(vertical_link(3));
    assert!(matches!(
        ChainBasedBuilder::new(config, 1, 10).unwrap_err(),
        GenError::InfeasibleConfig(_)
    ));

    let mut config = chains(2, 3);
    let mut link = vertical_link(1);
    link.main_sequence_tail = false;
    link.sub_sequence_tail = false;
    config.vertically_link_chains = Some(link);
    assert!(matches!(
        ChainBasedBuilder::new(config, 1, 10).unwrap_err(),
        GenError::InfeasibleConfig(_)
    ));

    let mut config = chains(2, 3);
    config.merge_chains = Some(merge(3));
    assert!(matches!(
        ChainBasedBuilder::new(config, 1, 10).unwrap_err(),
        GenError::InfeasibleConfig(_)
    ));
}

// --- common contract ---

#[test]
fn exhausted_retries_report_build_failed() {
    init_tracing();

    // Two single-node chains: every node is a root, so the surplus sink has
    // nowhere to merge into.
    let mut config = chains(2, 1);
    config.merge_chains = Some(merge(1));
    let builder = ChainBasedBuilder::new(config, 1, 5).unwrap();

    let err = builder.build_one(&mut seeded(9)).unwrap_err();
    match err {
        GenError::BuildFailed(msg) => assert!(msg.contains("5 tries"), "{msg}"),
        other => panic!("expected BuildFailed, got {other:?}"),
    }
}

#[test]
fn build_iterator_yields_number_of_dags_and_continues_after_errors() {
    let mut config = chains(2, 1);
    config.merge_chains = Some(merge(1));
    let builder: Box<dyn DagBuilder> = Box::new(ChainBasedBuilder::new(config, 3, 2).unwrap());

    let mut rng = seeded(10);
    let results: Vec<_> = builder.build(&mut rng).collect();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_err()));
}

#[test]
fn create_builder_picks_the_configured_method() {
    let mut rng = seeded(11);
    let config = GeneratorConfigBuilder::new(GraphStructure::Gnp(gnp(8, 0.3)))
        .number_of_dags(4)
        .build();

    let builder = create_builder(&config).unwrap();
    assert_eq!(builder.name(), "g(n,p)");
    let dags: Vec<_> = builder.build(&mut rng).collect::<Result<_, _>>().unwrap();
    assert_eq!(dags.len(), 4);
    assert!(dags.iter().all(|d| d.node_count() == 8));
}
