// src/property/additional.rs

use rand::RngCore;

use crate::config::resolved::AdditionalConfig;
use crate::dag::TaskDag;
use crate::errors::Result;
use crate::property::PropertySetter;

/// User-named numeric properties, drawn per node and per edge.
#[derive(Debug, Clone)]
pub struct AdditionalSetter {
    config: AdditionalConfig,
}

impl AdditionalSetter {
    pub fn new(config: AdditionalConfig) -> Self {
        Self { config }
    }
}

impl PropertySetter for AdditionalSetter {
    fn name(&self) -> &'static str {
        "additional"
    }

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        for (name, choice) in &self.config.node_properties {
            for node in dag.nodes() {
                let value = choice.resolve(rng)?;
                dag.node_mut(node).extras.insert(name.clone(), value);
            }
        }

        for (name, choice) in &self.config.edge_properties {
            for (src, tgt) in dag.edges() {
                let value = choice.resolve(rng)?;
                if let Some(edge) = dag.edge_mut(src, tgt) {
                    edge.extras.insert(name.clone(), value);
                }
            }
        }
        Ok(())
    }
}
