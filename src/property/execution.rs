// src/property/execution.rs

//! Execution time, period and utilization.
//!
//! Timer-driven units (single nodes, or whole chains for
//! [`PeriodicType::Chain`]) get a period; with a utilization configured the
//! execution time of a unit is derived as `floor(u * period)`. Nodes left
//! without an execution time draw one from `execution_time`.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

use crate::config::resolved::MultiRateConfig;
use crate::dag::TaskDag;
use crate::errors::{GenError, Result};
use crate::property::{PropertySetter, at_least_one};
use crate::sampling::{Choice, partition_int, uunifast};
use crate::types::PeriodicType;

/// Nodes that share one period and one utilization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerUnit {
    /// Node carrying the period.
    pub head: usize,
    pub members: Vec<usize>,
}

/// Timer units of `dag` for `periodic_type`.
pub fn timer_units(dag: &TaskDag, periodic_type: PeriodicType) -> Result<Vec<TimerUnit>> {
    let single = |nodes: Vec<usize>| {
        nodes
            .into_iter()
            .map(|n| TimerUnit {
                head: n,
                members: vec![n],
            })
            .collect()
    };

    Ok(match periodic_type {
        PeriodicType::All => single(dag.nodes().collect()),
        PeriodicType::Entry => single(dag.sources()),
        PeriodicType::Io => {
            let io: BTreeSet<usize> = dag.sources().into_iter().chain(dag.sinks()).collect();
            single(io.into_iter().collect())
        }
        PeriodicType::Chain => {
            if dag.chains().is_empty() {
                return Err(GenError::InvalidArgument(
                    "periodic_type chain needs a chain-based DAG".to_string(),
                ));
            }
            dag.chains()
                .iter()
                .map(|c| TimerUnit {
                    head: c.head,
                    members: c.nodes.clone(),
                })
                .collect()
        }
    })
}

#[derive(Debug, Clone)]
pub struct ExecutionSetter {
    execution_time: Option<Choice<u64>>,
    multi_rate: Option<MultiRateConfig>,
}

impl ExecutionSetter {
    pub fn new(execution_time: Option<Choice<u64>>, multi_rate: Option<MultiRateConfig>) -> Self {
        Self {
            execution_time,
            multi_rate,
        }
    }
}

impl PropertySetter for ExecutionSetter {
    fn name(&self) -> &'static str {
        "execution/period/utilization"
    }

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        if let Some(mr) = &self.multi_rate {
            let units = timer_units(dag, mr.periodic_type)?;
            set_periods(dag, &units, mr, rng)?;
            if mr.has_utilization() {
                set_utilization(dag, &units, mr, rng)?;
            }
        }

        if let Some(choice) = &self.execution_time {
            for node in dag.nodes() {
                if dag.node(node).execution_time.is_none() {
                    dag.node_mut(node).execution_time = Some(choice.resolve(rng)?);
                }
            }
        }
        Ok(())
    }
}

/// Draw periods in topological order so that no unit head gets a period
/// shorter than any of its periodic ancestors.
pub fn set_periods(
    dag: &mut TaskDag,
    units: &[TimerUnit],
    mr: &MultiRateConfig,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let heads: BTreeSet<usize> = units.iter().map(|u| u.head).collect();
    let order = dag
        .topological_order()
        .ok_or_else(|| GenError::InvalidArgument("cannot set periods on a cyclic graph".to_string()))?;

    for node in order {
        if !heads.contains(&node) {
            continue;
        }

        let pool = if dag.in_degree(node) == 0 && mr.entry_node_period.is_some() {
            mr.entry_node_period.as_ref()
        } else if dag.out_degree(node) == 0 && mr.exit_node_period.is_some() {
            mr.exit_node_period.as_ref()
        } else {
            Some(&mr.period)
        };
        let pool = pool.map(|c| c.values()).unwrap_or_default();

        let floor = dag
            .ancestors(node)
            .into_iter()
            .filter_map(|a| dag.node(a).period)
            .max();

        let period = match floor {
            None => *pool.choose(rng).ok_or_else(|| {
                GenError::InvalidArgument("empty period choice list".to_string())
            })?,
            Some(floor) => {
                let allowed: Vec<u64> = pool.iter().copied().filter(|&p| p >= floor).collect();
                match allowed.choose(rng) {
                    Some(&p) => p,
                    None => {
                        debug!(node, floor, "no configured period >= ancestor period; using it");
                        floor
                    }
                }
            }
        };
        dag.node_mut(node).period = Some(period);
    }
    Ok(())
}

fn set_utilization(
    dag: &mut TaskDag,
    units: &[TimerUnit],
    mr: &MultiRateConfig,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let max_u = mr
        .maximum_utilization
        .as_ref()
        .map(|c| c.resolve(rng))
        .transpose()?;

    let utilizations: Vec<f64> = match &mr.total_utilization {
        Some(total) => {
            let total = total.resolve(rng)?;
            uunifast(total, units.len(), max_u, rng)
        }
        None => {
            // Only a maximum: draw each unit independently, just large
            // enough that every member gets at least one time unit.
            let max_u = max_u.unwrap_or(1.0);
            let mut out = Vec::with_capacity(units.len());
            for unit in units {
                let period = dag.node(unit.head).period.unwrap_or(1).max(1);
                let min_u = unit.members.len() as f64 / period as f64;
                if min_u >= max_u {
                    warn!(
                        head = unit.head,
                        min_u, max_u, "maximum_utilization too small for the period; using it as is"
                    );
                    out.push(max_u);
                } else {
                    out.push(rng.gen_range(min_u..=max_u));
                }
            }
            out
        }
    };

    for (unit, u) in units.iter().zip(utilizations) {
        dag.node_mut(unit.head).utilization = Some(u);
        let period = dag.node(unit.head).period.unwrap_or(1);
        let budget = (u * period as f64).floor() as u64;

        if unit.members.len() == 1 {
            dag.node_mut(unit.head).execution_time = Some(at_least_one(budget, "execution time"));
            continue;
        }

        let parts = partition_int(budget, unit.members.len(), rng).unwrap_or_else(|| {
            warn!(
                head = unit.head,
                budget,
                nodes = unit.members.len(),
                "utilization budget too small for the chain; using 1 per node"
            );
            vec![1; unit.members.len()]
        });
        for (&node, exec) in unit.members.iter().zip(parts) {
            dag.node_mut(node).execution_time = Some(exec);
        }
    }
    Ok(())
}
