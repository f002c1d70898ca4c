// src/property/deadline.rs

use std::collections::HashMap;

use rand::RngCore;
use tracing::debug;

use crate::dag::TaskDag;
use crate::errors::{GenError, Result};
use crate::property::{PropertySetter, at_least_one};
use crate::sampling::Choice;

/// Sets `end_to_end_deadline` on every sink to a multiple of its critical
/// path length.
#[derive(Debug, Clone)]
pub struct DeadlineSetter {
    ratio: Choice<f64>,
}

impl DeadlineSetter {
    pub fn new(ratio: Choice<f64>) -> Self {
        Self { ratio }
    }
}

impl PropertySetter for DeadlineSetter {
    fn name(&self) -> &'static str {
        "end-to-end deadline"
    }

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        let lengths = critical_path_lengths(dag)?;
        for sink in dag.sinks() {
            let cp = lengths.get(&sink).copied().unwrap_or(0);
            let ratio = self.ratio.resolve(rng)?;
            let deadline = (cp as f64 * ratio).floor() as u64;
            debug!(sink, cp, ratio, deadline, "end-to-end deadline");
            dag.node_mut(sink).end_to_end_deadline = Some(at_least_one(deadline, "end-to-end deadline"));
        }
        Ok(())
    }
}

/// Longest `Σ execution_time + Σ communication_time` over all paths ending at
/// each node.
///
/// Missing times count as 0.
pub fn critical_path_lengths(dag: &TaskDag) -> Result<HashMap<usize, u64>> {
    let order = dag.topological_order().ok_or_else(|| {
        GenError::InvalidArgument("cannot compute critical paths of a cyclic graph".to_string())
    })?;

    let mut longest: HashMap<usize, u64> = HashMap::with_capacity(order.len());
    for node in order {
        let exec = dag.node(node).execution_time.unwrap_or(0);
        let best_pred = dag
            .predecessors(node)
            .into_iter()
            .map(|p| {
                let comm = dag
                    .edge(p, node)
                    .and_then(|e| e.communication_time)
                    .unwrap_or(0);
                longest.get(&p).copied().unwrap_or(0) + comm
            })
            .max()
            .unwrap_or(0);
        longest.insert(node, best_pred + exec);
    }
    Ok(longest)
}

/// Critical path length ending at `sink`.
pub fn critical_path_length(dag: &TaskDag, sink: usize) -> Result<u64> {
    Ok(critical_path_lengths(dag)?.get(&sink).copied().unwrap_or(0))
}
