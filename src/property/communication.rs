// src/property/communication.rs

use rand::RngCore;

use crate::dag::TaskDag;
use crate::errors::Result;
use crate::property::PropertySetter;
use crate::sampling::Choice;

/// Draws `communication_time` independently for every edge.
#[derive(Debug, Clone)]
pub struct CommunicationSetter {
    communication_time: Choice<u64>,
}

impl CommunicationSetter {
    pub fn new(communication_time: Choice<u64>) -> Self {
        Self { communication_time }
    }
}

impl PropertySetter for CommunicationSetter {
    fn name(&self) -> &'static str {
        "communication"
    }

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        set_communication_times(dag, &self.communication_time, rng)?;
        Ok(())
    }
}

/// Draw a communication time per edge; returns their sum.
pub fn set_communication_times(
    dag: &mut TaskDag,
    choice: &Choice<u64>,
    rng: &mut dyn RngCore,
) -> Result<u64> {
    let mut total = 0;
    let mut result = Ok(());
    dag.for_each_edge_mut(|_, _, edge| {
        if result.is_err() {
            return;
        }
        match choice.resolve(rng) {
            Ok(c) => {
                edge.communication_time = Some(c);
                total += c;
            }
            Err(e) => result = Err(e),
        }
    });
    result.map(|()| total)
}
