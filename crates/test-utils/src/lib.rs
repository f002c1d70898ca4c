pub mod builders;

use std::sync::Once;

use dagsynth::dag::TaskDag;
use dagsynth::sampling::{GenRng, seeded_rng};
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Deterministic RNG for a test.
pub fn seeded(seed: u64) -> GenRng {
    seeded_rng(seed)
}

/// `0 -> 1 -> ... -> n-1`.
pub fn path_dag(n: usize) -> TaskDag {
    let mut dag = TaskDag::with_nodes(n);
    for i in 1..n {
        dag.add_edge(i - 1, i);
    }
    dag
}

/// DAG with the given edges over nodes `0..n`.
pub fn dag_from_edges(n: usize, edges: &[(usize, usize)]) -> TaskDag {
    let mut dag = TaskDag::with_nodes(n);
    for &(src, tgt) in edges {
        dag.add_edge(src, tgt);
    }
    dag
}
