// src/dag/ops.rs

//! Structural primitives shared by the builders.

use std::collections::BTreeSet;

use tracing::debug;

use crate::dag::graph::TaskDag;
use crate::errors::{GenError, Result};

/// Candidate with the smallest out-degree; first one wins ties.
pub fn min_out_node(dag: &TaskDag, candidates: impl IntoIterator<Item = usize>) -> Option<usize> {
    min_by_degree(candidates, |n| dag.out_degree(n))
}

/// Candidate with the smallest in-degree; first one wins ties.
pub fn min_in_node(dag: &TaskDag, candidates: impl IntoIterator<Item = usize>) -> Option<usize> {
    min_by_degree(candidates, |n| dag.in_degree(n))
}

fn min_by_degree(
    candidates: impl IntoIterator<Item = usize>,
    degree: impl Fn(usize) -> usize,
) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for node in candidates {
        let d = degree(node);
        if d == 0 {
            return Some(node);
        }
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((node, d)),
        }
    }
    best.map(|(node, _)| node)
}

/// Connect two layers with as few edges as possible.
///
/// Stops once every node of `src_layer` has an outgoing edge and every node
/// of `tgt_layer` has an incoming edge. Each new edge joins the least
/// connected node of each layer.
pub fn connect_minimum(dag: &mut TaskDag, src_layer: &[usize], tgt_layer: &[usize]) -> Result<()> {
    if src_layer.is_empty() || tgt_layer.is_empty() {
        return Err(GenError::InvalidArgument(format!(
            "connect_minimum needs two non-empty layers (got {} source and {} target nodes)",
            src_layer.len(),
            tgt_layer.len()
        )));
    }

    let is_finished = |dag: &TaskDag| {
        src_layer.iter().all(|&n| dag.out_degree(n) > 0)
            && tgt_layer.iter().all(|&n| dag.in_degree(n) > 0)
    };

    while !is_finished(&*dag) {
        // Both layers are non-empty, so both lookups succeed.
        let (Some(src), Some(tgt)) = (
            min_out_node(dag, src_layer.iter().copied()),
            min_in_node(dag, tgt_layer.iter().copied()),
        ) else {
            break;
        };
        dag.add_edge(src, tgt);
    }

    Ok(())
}

/// Join every weakly connected component to the largest one.
///
/// Each smaller component gets exactly one edge from one of its nodes into
/// the largest component. With `keep_source_count` the edge never points at
/// a current source; with `keep_sink_count` it never leaves a current sink,
/// so the respective counts are unchanged.
///
/// Fails with [`GenError::BuildFailed`] when a component has no eligible
/// endpoint, e.g. an isolated node that is both a source and a sink while
/// both counts must be kept.
pub fn ensure_weakly_connected(
    dag: &mut TaskDag,
    keep_source_count: bool,
    keep_sink_count: bool,
) -> Result<()> {
    ensure_weakly_connected_within(dag, keep_source_count, keep_sink_count, DegreeLimits::NONE)
}

/// Upper bounds on node degrees that an added edge must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeLimits {
    pub max_in: usize,
    pub max_out: usize,
}

impl DegreeLimits {
    pub const NONE: DegreeLimits = DegreeLimits {
        max_in: usize::MAX,
        max_out: usize::MAX,
    };
}

/// [`ensure_weakly_connected`] that only adds an edge `src -> tgt` while
/// `out_degree(src) < max_out` and `in_degree(tgt) < max_in`.
pub fn ensure_weakly_connected_within(
    dag: &mut TaskDag,
    keep_source_count: bool,
    keep_sink_count: bool,
    limits: DegreeLimits,
) -> Result<()> {
    let mut components = dag.weakly_connected_components();
    if components.len() <= 1 {
        return Ok(());
    }

    // Stable sort: ties keep the component with the smallest node id first.
    components.sort_by_key(|c| std::cmp::Reverse(c.len()));
    let target_component = components.remove(0);

    let sources: BTreeSet<usize> = dag.sources().into_iter().collect();
    let sinks: BTreeSet<usize> = dag.sinks().into_iter().collect();

    for component in components {
        let source_options: Vec<usize> = component
            .iter()
            .copied()
            .filter(|&n| !(keep_sink_count && sinks.contains(&n)))
            .filter(|&n| dag.out_degree(n) < limits.max_out)
            .collect();
        // Degrees inside the target component grow as components attach.
        let target_options: Vec<usize> = target_component
            .iter()
            .copied()
            .filter(|&n| !(keep_source_count && sources.contains(&n)))
            .filter(|&n| dag.in_degree(n) < limits.max_in)
            .collect();

        let src = min_out_node(dag, source_options);
        let tgt = min_in_node(dag, target_options);
        let (Some(src), Some(tgt)) = (src, tgt) else {
            return Err(GenError::BuildFailed(format!(
                "cannot connect component of {} node(s) without changing the number of entry/exit nodes \
                 or exceeding the degree limits",
                component.len()
            )));
        };

        debug!(src, tgt, "connecting weakly connected component");
        dag.add_edge(src, tgt);
    }

    Ok(())
}

/// Append `count` nodes that become the only sources of the DAG.
pub fn force_create_source_nodes(dag: &mut TaskDag, count: usize) -> Result<Vec<usize>> {
    let prior_sources = dag.sources();
    let created: Vec<usize> = (0..count).map(|_| dag.add_node()).collect();
    connect_minimum(dag, &created, &prior_sources)?;
    Ok(created)
}

/// Append `count` nodes that become the only sinks of the DAG.
pub fn force_create_sink_nodes(dag: &mut TaskDag, count: usize) -> Result<Vec<usize>> {
    let prior_sinks = dag.sinks();
    let created: Vec<usize> = (0..count).map(|_| dag.add_node()).collect();
    connect_minimum(dag, &prior_sinks, &created)?;
    Ok(created)
}
