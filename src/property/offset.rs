// src/property/offset.rs

use rand::RngCore;

use crate::dag::TaskDag;
use crate::errors::Result;
use crate::property::PropertySetter;
use crate::sampling::Choice;

/// Draws an `offset` for every node that has a period.
#[derive(Debug, Clone)]
pub struct OffsetSetter {
    offset: Choice<u64>,
}

impl OffsetSetter {
    pub fn new(offset: Choice<u64>) -> Self {
        Self { offset }
    }
}

impl PropertySetter for OffsetSetter {
    fn name(&self) -> &'static str {
        "offset"
    }

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        for node in dag.nodes() {
            if dag.node(node).period.is_some() {
                dag.node_mut(node).offset = Some(self.offset.resolve(rng)?);
            }
        }
        Ok(())
    }
}
