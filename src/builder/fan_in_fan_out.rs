// src/builder/fan_in_fan_out.rs

//! Fan-in/fan-out method (Cordeiro et al., "Random graph generation for
//! scheduling simulations").
//!
//! Starting from the entry nodes, the graph grows by either fanning out from
//! the node with the most spare out-degree or fanning in several random nodes
//! into a new one, until the requested node count is reached.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::debug;

use crate::builder::DagBuilder;
use crate::config::resolved::FanInFanOutConfig;
use crate::dag::{
    DegreeLimits, TaskDag, ensure_weakly_connected_within, force_create_sink_nodes, min_out_node,
};
use crate::errors::{GenError, Result};
use crate::sampling::coin_flip;

#[derive(Debug, Clone)]
pub struct FanInFanOutBuilder {
    config: FanInFanOutConfig,
    number_of_dags: usize,
    max_try: usize,
    max_in: usize,
    max_out: usize,
}

impl FanInFanOutBuilder {
    pub fn new(config: FanInFanOutConfig, number_of_dags: usize, max_try: usize) -> Result<Self> {
        let (max_in, max_out) = validate(&config)?;
        Ok(Self {
            config,
            number_of_dags,
            max_try,
            max_in,
            max_out,
        })
    }

    fn grow(&self, rng: &mut dyn RngCore, entry: usize, target: usize) -> TaskDag {
        let mut dag = TaskDag::with_nodes(entry);
        while dag.node_count() < target {
            if coin_flip(rng) {
                self.fan_out(&mut dag, rng);
            } else {
                self.fan_in(&mut dag, rng);
            }
        }
        dag
    }

    fn fan_out(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) {
        let Some(parent) = min_out_node(dag, dag.nodes()) else {
            return;
        };
        let capacity = self.max_out.saturating_sub(dag.out_degree(parent));
        if capacity == 0 {
            return;
        }
        let children = rng.gen_range(1..=capacity);
        for _ in 0..children {
            let child = dag.add_node();
            dag.add_edge(parent, child);
        }
    }

    fn fan_in(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) {
        let wanted = rng.gen_range(1..=self.max_in);
        let mut nodes: Vec<usize> = dag.nodes().collect();
        nodes.shuffle(rng);
        let parents: Vec<usize> = nodes
            .into_iter()
            .filter(|&n| dag.out_degree(n) < self.max_out)
            .take(wanted)
            .collect();

        let child = dag.add_node();
        for parent in parents {
            dag.add_edge(parent, child);
        }
    }
}

/// Static checks; returns the in/out-degree bounds.
fn validate(config: &FanInFanOutConfig) -> Result<(usize, usize)> {
    let entry = config.number_of_entry_nodes.min().unwrap_or(0);
    let exit = config
        .number_of_exit_nodes
        .as_ref()
        .and_then(|c| c.min())
        .unwrap_or(1);
    let nodes = config.number_of_nodes.max().unwrap_or(0);
    if entry + exit > nodes {
        return Err(GenError::InfeasibleConfig(format!(
            "number_of_entry_nodes ({entry}) + number_of_exit_nodes ({exit}) > number_of_nodes ({nodes})"
        )));
    }
    if entry == 0 {
        return Err(GenError::InfeasibleConfig(
            "number_of_entry_nodes must be >= 1".to_string(),
        ));
    }

    let max_in = config.in_degree.max().unwrap_or(0);
    let max_out = config.out_degree.max().unwrap_or(0);
    if max_in == 0 || max_out == 0 {
        return Err(GenError::InfeasibleConfig(format!(
            "in_degree ({max_in}) and out_degree ({max_out}) must be >= 1"
        )));
    }
    Ok((max_in, max_out))
}

impl DagBuilder for FanInFanOutBuilder {
    fn name(&self) -> &'static str {
        "fan-in/fan-out"
    }

    fn number_of_dags(&self) -> usize {
        self.number_of_dags
    }

    fn max_try(&self) -> usize {
        self.max_try
    }

    fn failure_hint(&self) -> String {
        "a DAG satisfying number_of_nodes could not be built".to_string()
    }

    fn try_build(&self, rng: &mut dyn RngCore) -> Result<Option<TaskDag>> {
        let nodes = self.config.number_of_nodes.resolve(rng)?;
        let exit = self
            .config
            .number_of_exit_nodes
            .as_ref()
            .map(|c| c.resolve(rng))
            .transpose()?;
        let entry = self.config.number_of_entry_nodes.resolve(rng)?;

        let Some(target) = nodes.checked_sub(exit.unwrap_or(0)) else {
            return Ok(None);
        };
        if target < entry {
            debug!(target, entry, "fewer nodes than entry nodes");
            return Ok(None);
        }

        let mut dag = self.grow(rng, entry, target);
        if dag.node_count() != target {
            debug!(target, reached = dag.node_count(), "node count overshot");
            return Ok(None);
        }

        if let Some(exit) = exit {
            force_create_sink_nodes(&mut dag, exit)?;
        }
        if self.config.ensure_weakly_connected {
            let limits = DegreeLimits {
                max_in: self.max_in,
                max_out: self.max_out,
            };
            ensure_weakly_connected_within(&mut dag, true, exit.is_some(), limits)?;
        }

        Ok(Some(dag))
    }
}
