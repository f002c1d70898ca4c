// src/builder/chain_based.rs

//! Chain-based method.
//!
//! A chain is a main sequence plus sub-sequences that branch off a non-tail
//! main node and never reach deeper than the main tail. Chains are built
//! independently, put side by side, and then optionally linked vertically
//! (tails of some chains feed heads of others) and merged (surplus sinks
//! feed into other nodes).

use std::collections::BTreeSet;

use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, RngCore};
use tracing::debug;

use crate::builder::{BuildContext, DagBuilder};
use crate::config::resolved::{ChainBasedConfig, MergeConfig, VerticalLinkConfig};
use crate::dag::{Chain, TaskDag, min_in_node};
use crate::errors::{GenError, Result};

#[derive(Debug, Clone)]
pub struct ChainBasedBuilder {
    config: ChainBasedConfig,
    number_of_dags: usize,
    max_try: usize,
}

impl ChainBasedBuilder {
    pub fn new(config: ChainBasedConfig, number_of_dags: usize, max_try: usize) -> Result<Self> {
        validate(&config)?;
        Ok(Self {
            config,
            number_of_dags,
            max_try,
        })
    }
}

fn validate(config: &ChainBasedConfig) -> Result<()> {
    let main_min = config.main_sequence_length.min().unwrap_or(0);
    let main_max = config.main_sequence_length.max().unwrap_or(0);
    let subs_min = config
        .number_of_sub_sequences
        .as_ref()
        .and_then(|c| c.min())
        .unwrap_or(0);
    let subs_max = config
        .number_of_sub_sequences
        .as_ref()
        .and_then(|c| c.max())
        .unwrap_or(0);
    let chains_min = config.number_of_chains.min().unwrap_or(0);
    let chains_max = config.number_of_chains.max().unwrap_or(0);

    if main_min == 0 {
        return Err(GenError::InfeasibleConfig(
            "main_sequence_length must be >= 1".to_string(),
        ));
    }
    if chains_min == 0 {
        return Err(GenError::InfeasibleConfig(
            "number_of_chains must be >= 1".to_string(),
        ));
    }
    if main_max == 1 && subs_min > 0 {
        return Err(GenError::InfeasibleConfig(
            "sub-sequences cannot be built when main_sequence_length is 1".to_string(),
        ));
    }

    if let Some(link) = &config.vertically_link_chains {
        if !link.main_sequence_tail && !link.sub_sequence_tail {
            return Err(GenError::InfeasibleConfig(
                "vertically_link_chains needs main_sequence_tail or sub_sequence_tail".to_string(),
            ));
        }
        let entry_min = link.number_of_entry_nodes.min().unwrap_or(0);
        if entry_min == 0 {
            return Err(GenError::InfeasibleConfig(
                "vertically_link_chains.number_of_entry_nodes must be >= 1".to_string(),
            ));
        }
        if chains_max < entry_min {
            return Err(GenError::InfeasibleConfig(format!(
                "number_of_chains ({chains_max}) < number_of_entry_nodes ({entry_min})"
            )));
        }
    }

    if let Some(merge) = &config.merge_chains {
        if !merge.middle_of_chain && !merge.exit_node {
            return Err(GenError::InfeasibleConfig(
                "merge_chains needs middle_of_chain or exit_node".to_string(),
            ));
        }
        let exit_min = merge.number_of_exit_nodes.min().unwrap_or(0);
        let tails_max = chains_max * (1 + subs_max);
        if exit_min == 0 {
            return Err(GenError::InfeasibleConfig(
                "merge_chains.number_of_exit_nodes must be >= 1".to_string(),
            ));
        }
        if tails_max < exit_min {
            return Err(GenError::InfeasibleConfig(format!(
                "number_of_chains * (1 + number_of_sub_sequences) ({tails_max}) < number_of_exit_nodes ({exit_min})"
            )));
        }
    }

    Ok(())
}

/// Build one chain with ids taken from `ctx`.
pub fn build_chain(
    ctx: &mut BuildContext,
    main_sequence_length: usize,
    number_of_sub_sequences: usize,
    rng: &mut dyn RngCore,
) -> Chain {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let main: Vec<usize> = (0..main_sequence_length).map(|_| ctx.next_id()).collect();
    nodes.extend(&main);
    edges.extend(main.windows(2).map(|w| (w[0], w[1])));

    let mut sub_sequence_tails = Vec::new();
    if main_sequence_length > 1 {
        for _ in 0..number_of_sub_sequences {
            let branch_at = rng.gen_range(0..main_sequence_length - 1);
            let len = rng.gen_range(1..=main_sequence_length - 1 - branch_at);

            let mut prev = main[branch_at];
            for _ in 0..len {
                let node = ctx.next_id();
                nodes.push(node);
                edges.push((prev, node));
                prev = node;
            }
            sub_sequence_tails.push(prev);
        }
    }

    Chain {
        head: main[0],
        main_tail: main[main_sequence_length - 1],
        sub_sequence_tails,
        nodes,
        edges,
    }
}

/// Disjoint union of `chains` over the ids `0..node_count`.
fn assemble(node_count: usize, chains: Vec<Chain>) -> TaskDag {
    let mut dag = TaskDag::with_nodes(node_count);
    for chain in &chains {
        for &(src, tgt) in &chain.edges {
            dag.add_edge(src, tgt);
        }
    }
    dag.set_chains(chains);
    dag
}

/// Link chain tails to chain heads so that `k` chains remain as roots.
///
/// Returns `false` when the source pool runs out of usable tails.
fn vertically_link(dag: &mut TaskDag, k: usize, cfg: &VerticalLinkConfig, rng: &mut dyn RngCore) -> bool {
    let chains = dag.chains().to_vec();
    let mut order: Vec<usize> = (0..chains.len()).collect();
    order.shuffle(rng);
    let (sources, targets) = order.split_at(k.min(order.len()));

    let usable_tails = |c: &Chain| {
        let mut tails = Vec::new();
        if cfg.main_sequence_tail {
            tails.push(c.main_tail);
        }
        if cfg.sub_sequence_tail {
            tails.extend(c.sub_sequence_tails.iter().copied());
        }
        tails
    };

    // (chain, tails not yet used as a link source)
    let mut pool: Vec<(usize, Vec<usize>)> = sources
        .iter()
        .map(|&c| (c, usable_tails(&chains[c])))
        .collect();
    let mut unlinked: Vec<usize> = targets.to_vec();

    while !unlinked.is_empty() {
        let available: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, (_, tails))| !tails.is_empty())
            .map(|(i, _)| i)
            .collect();
        let Some(&slot) = available.choose(rng) else {
            debug!(unlinked = unlinked.len(), "no tail left to link from");
            return false;
        };

        let tails = &mut pool[slot].1;
        let tail = tails.swap_remove(rng.gen_range(0..tails.len()));

        let target = unlinked.swap_remove(rng.gen_range(0..unlinked.len()));
        dag.add_edge(tail, chains[target].head);
        pool.push((target, usable_tails(&chains[target])));
    }

    true
}

/// Route every surplus sink into another node so that `exit` sinks remain.
///
/// Returns `false` when there are not enough sinks or a sink has no
/// eligible target.
fn merge(dag: &mut TaskDag, exit: usize, cfg: &MergeConfig, rng: &mut dyn RngCore) -> bool {
    let sinks = dag.sinks();
    if sinks.len() < exit {
        debug!(sinks = sinks.len(), exit, "not enough sinks to keep");
        return false;
    }

    let kept: BTreeSet<usize> = sinks.iter().copied().choose_multiple(rng, exit).into_iter().collect();
    let merge_sources: Vec<usize> = sinks.iter().copied().filter(|s| !kept.contains(s)).collect();
    let roots: BTreeSet<usize> = dag.sources().into_iter().collect();

    let mut options: BTreeSet<usize> = dag
        .nodes()
        .filter(|n| !roots.contains(n) && !merge_sources.contains(n))
        .collect();
    if !cfg.exit_node {
        options.retain(|n| !kept.contains(n));
    }
    if !cfg.middle_of_chain {
        options = kept.clone();
    }

    for src in merge_sources {
        let ancestors = dag.ancestors(src);
        let candidates = options.iter().copied().filter(|n| !ancestors.contains(n));
        let Some(tgt) = min_in_node(dag, candidates) else {
            debug!(src, "no merge target");
            return false;
        };
        dag.add_edge(src, tgt);
    }

    true
}

impl DagBuilder for ChainBasedBuilder {
    fn name(&self) -> &'static str {
        "chain-based"
    }

    fn number_of_dags(&self) -> usize {
        self.number_of_dags
    }

    fn max_try(&self) -> usize {
        self.max_try
    }

    fn failure_hint(&self) -> String {
        match (&self.config.vertically_link_chains, &self.config.merge_chains) {
            (_, Some(_)) => "chains could not be merged to satisfy number_of_exit_nodes".to_string(),
            (Some(_), None) => {
                "chains could not be linked to satisfy number_of_entry_nodes".to_string()
            }
            (None, None) => "a chain-based DAG could not be built".to_string(),
        }
    }

    fn try_build(&self, rng: &mut dyn RngCore) -> Result<Option<TaskDag>> {
        let mut ctx = BuildContext::new();
        let number_of_chains = self.config.number_of_chains.resolve(rng)?;

        let mut chains = Vec::with_capacity(number_of_chains);
        for _ in 0..number_of_chains {
            let length = self.config.main_sequence_length.resolve(rng)?;
            let subs = match &self.config.number_of_sub_sequences {
                Some(c) => c.resolve(rng)?,
                None => 0,
            };
            chains.push(build_chain(&mut ctx, length, subs, rng));
        }

        let mut dag = assemble(ctx.allocated(), chains);

        if let Some(link) = &self.config.vertically_link_chains {
            let k = link.number_of_entry_nodes.resolve(rng)?;
            if k > number_of_chains {
                debug!(k, number_of_chains, "more entry nodes than chains");
                return Ok(None);
            }
            if !vertically_link(&mut dag, k, link, rng) {
                return Ok(None);
            }
        }

        if let Some(merge_cfg) = &self.config.merge_chains {
            let exit = merge_cfg.number_of_exit_nodes.resolve(rng)?;
            if !merge(&mut dag, exit, merge_cfg, rng) {
                return Ok(None);
            }
        }

        Ok(Some(dag))
    }
}
