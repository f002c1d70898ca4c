// src/builder/gnp.rs

//! Erdős–Rényi G(n, p) restricted to forward edges.
//!
//! Every pair `i < j` is joined by `i -> j` with probability `p`, so the
//! node order is a topological order by construction.

use rand::{Rng, RngCore};
use tracing::{debug, warn};

use crate::builder::DagBuilder;
use crate::config::resolved::GnpConfig;
use crate::dag::{
    TaskDag, ensure_weakly_connected, force_create_sink_nodes, force_create_source_nodes,
};
use crate::errors::{GenError, Result};

#[derive(Debug, Clone)]
pub struct GnpBuilder {
    config: GnpConfig,
    number_of_dags: usize,
    max_try: usize,
}

impl GnpBuilder {
    pub fn new(config: GnpConfig, number_of_dags: usize, max_try: usize) -> Result<Self> {
        validate(&config)?;
        Ok(Self {
            config,
            number_of_dags,
            max_try,
        })
    }
}

/// Entry/exit nodes count only when configured; at least one inner node
/// must remain for the random part.
fn validate(config: &GnpConfig) -> Result<()> {
    let entry = config
        .number_of_entry_nodes
        .as_ref()
        .and_then(|c| c.min())
        .unwrap_or(0);
    let exit = config
        .number_of_exit_nodes
        .as_ref()
        .and_then(|c| c.min())
        .unwrap_or(0);
    let nodes = config.number_of_nodes.max().unwrap_or(0);
    if entry + exit >= nodes {
        return Err(GenError::InfeasibleConfig(format!(
            "number_of_entry_nodes ({entry}) + number_of_exit_nodes ({exit}) leaves no inner node \
             in number_of_nodes ({nodes})"
        )));
    }

    let p_min = config.probability_of_edge.min().unwrap_or(0.0);
    if p_min < 0.0 {
        return Err(GenError::InfeasibleConfig(format!(
            "probability_of_edge must be >= 0 (got {p_min})"
        )));
    }
    let p_max = config.probability_of_edge.max().unwrap_or(0.0);
    if p_max > 1.0 {
        warn!(p = p_max, "probability_of_edge > 1.0; every forward edge will be created");
    }
    Ok(())
}

impl DagBuilder for GnpBuilder {
    fn name(&self) -> &'static str {
        "g(n,p)"
    }

    fn number_of_dags(&self) -> usize {
        self.number_of_dags
    }

    fn max_try(&self) -> usize {
        self.max_try
    }

    fn failure_hint(&self) -> String {
        if self.config.ensure_weakly_connected {
            "a weakly connected DAG keeping the entry/exit node counts could not be built".to_string()
        } else {
            "a DAG satisfying number_of_nodes could not be built".to_string()
        }
    }

    fn try_build(&self, rng: &mut dyn RngCore) -> Result<Option<TaskDag>> {
        let nodes = self.config.number_of_nodes.resolve(rng)?;
        let entry = self
            .config
            .number_of_entry_nodes
            .as_ref()
            .map(|c| c.resolve(rng))
            .transpose()?;
        let exit = self
            .config
            .number_of_exit_nodes
            .as_ref()
            .map(|c| c.resolve(rng))
            .transpose()?;

        let inner = nodes
            .checked_sub(entry.unwrap_or(0))
            .and_then(|n| n.checked_sub(exit.unwrap_or(0)));
        let Some(inner) = inner.filter(|&n| n > 0) else {
            debug!(nodes, ?entry, ?exit, "no inner nodes left");
            return Ok(None);
        };

        let p = self.config.probability_of_edge.resolve(rng)?;
        let mut dag = TaskDag::with_nodes(inner);
        for i in 0..inner {
            for j in (i + 1)..inner {
                if rng.r#gen::<f64>() < p {
                    dag.add_edge(i, j);
                }
            }
        }

        if let Some(entry) = entry {
            force_create_source_nodes(&mut dag, entry)?;
        }
        if let Some(exit) = exit {
            force_create_sink_nodes(&mut dag, exit)?;
        }
        if self.config.ensure_weakly_connected {
            ensure_weakly_connected(&mut dag, entry.is_some(), exit.is_some())?;
        }

        Ok(Some(dag))
    }
}
