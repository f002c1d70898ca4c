// src/property/ccr.rs

//! Communication-to-computation ratio.
//!
//! `ccr = Σ communication_time / Σ execution_time`. One side is taken as
//! given and the other side's total is derived from the ratio, then split
//! over its nodes or edges with [`partition_int`].

use rand::RngCore;
use tracing::{debug, warn};

use crate::dag::TaskDag;
use crate::errors::{GenError, Result};
use crate::property::PropertySetter;
use crate::property::communication::set_communication_times;
use crate::sampling::{Choice, partition_int};

#[derive(Debug, Clone)]
pub struct CcrSetter {
    ccr: Choice<f64>,
    communication_time: Option<Choice<u64>>,
}

impl CcrSetter {
    pub fn new(ccr: Choice<f64>, communication_time: Option<Choice<u64>>) -> Self {
        Self {
            ccr,
            communication_time,
        }
    }
}

impl PropertySetter for CcrSetter {
    fn name(&self) -> &'static str {
        "ccr"
    }

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        let ccr = self.ccr.resolve(rng)?;
        if ccr <= 0.0 {
            return Err(GenError::InvalidArgument(format!("ccr must be > 0 (got {ccr})")));
        }

        if dag.nodes().all(|n| dag.node(n).execution_time.is_some()) {
            set_by_execution(dag, ccr, rng);
            return Ok(());
        }

        let Some(comm) = &self.communication_time else {
            return Err(GenError::InvalidArgument(
                "ccr needs either execution times on every node or communication_time".to_string(),
            ));
        };
        set_by_communication(dag, ccr, comm, rng)
    }
}

fn set_by_execution(dag: &mut TaskDag, ccr: f64, rng: &mut dyn RngCore) {
    let edges = dag.edge_count();
    if edges == 0 {
        return;
    }
    let total_exec: u64 = dag.nodes().filter_map(|n| dag.node(n).execution_time).sum();
    let total_comm = (ccr * total_exec as f64).floor() as u64;
    debug!(ccr, total_exec, total_comm, "deriving communication times");

    let mut parts = partition_int(total_comm, edges, rng)
        .unwrap_or_else(|| {
            warn!(
                total_comm,
                edges, "communication budget smaller than the edge count; using 1 per edge (ccr is inexact)"
            );
            vec![1; edges]
        })
        .into_iter();
    dag.for_each_edge_mut(|_, _, edge| edge.communication_time = parts.next());
}

fn set_by_communication(
    dag: &mut TaskDag,
    ccr: f64,
    comm: &Choice<u64>,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let total_comm = set_communication_times(dag, comm, rng)?;
    let nodes = dag.node_count();
    let total_exec = (total_comm as f64 / ccr).floor() as u64;
    debug!(ccr, total_comm, total_exec, "deriving execution times");

    let parts = partition_int(total_exec, nodes, rng).unwrap_or_else(|| {
        warn!(
            total_exec,
            nodes, "execution budget smaller than the node count; using 1 per node (ccr is inexact)"
        );
        vec![1; nodes]
    });
    for (node, exec) in dag.nodes().zip(parts) {
        dag.node_mut(node).execution_time = Some(exec);
    }
    Ok(())
}
