// src/builder/mod.rs

//! Topology builders.
//!
//! A [`DagBuilder`] checks its parameters for static feasibility when it is
//! constructed and then builds DAGs by bounded random search: each attempt
//! starts from an empty [`TaskDag`] and either succeeds or is discarded.

pub mod chain_based;
pub mod fan_in_fan_out;
pub mod gnp;

use rand::RngCore;
use tracing::debug;

use crate::config::resolved::{GeneratorConfig, GraphStructure};
use crate::dag::TaskDag;
use crate::errors::{GenError, Result};

pub use chain_based::ChainBasedBuilder;
pub use fan_in_fan_out::FanInFanOutBuilder;
pub use gnp::GnpBuilder;

pub trait DagBuilder {
    /// Generation method, for diagnostics.
    fn name(&self) -> &'static str;

    fn number_of_dags(&self) -> usize;

    fn max_try(&self) -> usize;

    /// What could not be satisfied when every attempt failed.
    fn failure_hint(&self) -> String;

    /// One build attempt. `Ok(None)` discards the attempt.
    fn try_build(&self, rng: &mut dyn RngCore) -> Result<Option<TaskDag>>;

    /// Build one DAG, retrying up to [`DagBuilder::max_try`] times.
    fn build_one(&self, rng: &mut dyn RngCore) -> Result<TaskDag> {
        for attempt in 1..=self.max_try() {
            match self.try_build(rng) {
                Ok(Some(dag)) => {
                    debug!(
                        method = self.name(),
                        attempt,
                        nodes = dag.node_count(),
                        edges = dag.edge_count(),
                        "DAG built"
                    );
                    return Ok(dag);
                }
                Ok(None) => debug!(method = self.name(), attempt, "attempt discarded"),
                Err(e) if e.is_retryable() => {
                    debug!(method = self.name(), attempt, error = %e, "attempt failed");
                }
                Err(e) => return Err(e),
            }
        }

        Err(GenError::BuildFailed(format!(
            "{} in {} tries ({})",
            self.failure_hint(),
            self.max_try(),
            self.name()
        )))
    }
}

impl dyn DagBuilder {
    /// Lazily build `number_of_dags` DAGs.
    ///
    /// A failed DAG is yielded as an `Err` and the iterator moves on to the
    /// next one.
    pub fn build<'a>(&'a self, rng: &'a mut dyn RngCore) -> Builds<'a> {
        Builds {
            builder: self,
            rng,
            remaining: self.number_of_dags(),
        }
    }
}

/// Iterator returned by [`DagBuilder::build`](trait.DagBuilder.html#method.build).
pub struct Builds<'a> {
    builder: &'a dyn DagBuilder,
    rng: &'a mut dyn RngCore,
    remaining: usize,
}

impl Iterator for Builds<'_> {
    type Item = Result<TaskDag>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.builder.build_one(self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Builds<'_> {}

/// Hands out node ids while a DAG is assembled from separately built parts.
#[derive(Debug, Default)]
pub struct BuildContext {
    next_id: usize,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> usize {
        self.next_id
    }
}

/// Builder for the configured generation method.
pub fn create_builder(config: &GeneratorConfig) -> Result<Box<dyn DagBuilder>> {
    let (n, max_try) = (config.number_of_dags, config.max_try);
    Ok(match &config.graph_structure {
        GraphStructure::FanInFanOut(c) => Box::new(FanInFanOutBuilder::new(c.clone(), n, max_try)?),
        GraphStructure::Gnp(c) => Box::new(GnpBuilder::new(c.clone(), n, max_try)?),
        GraphStructure::ChainBased(c) => Box::new(ChainBasedBuilder::new(c.clone(), n, max_try)?),
    })
}
