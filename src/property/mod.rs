// src/property/mod.rs

//! Node and edge annotation.
//!
//! The [`PropertyPipeline`] runs a fixed sequence of [`PropertySetter`]s on a
//! finished topology. Setters only write attributes; later setters read what
//! earlier ones wrote (the deadline setter needs execution and communication
//! times, the offset setter needs periods).

pub mod additional;
pub mod ccr;
pub mod communication;
pub mod deadline;
pub mod execution;
pub mod offset;

use rand::RngCore;
use tracing::{debug, warn};

use crate::config::resolved::PropertiesConfig;
use crate::dag::TaskDag;
use crate::errors::{GenError, Result};

pub use additional::AdditionalSetter;
pub use ccr::CcrSetter;
pub use communication::CommunicationSetter;
pub use deadline::{DeadlineSetter, critical_path_length};
pub use execution::ExecutionSetter;
pub use offset::OffsetSetter;

pub trait PropertySetter {
    fn name(&self) -> &'static str;

    fn set(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()>;
}

/// Ordered list of setters built once per configuration.
pub struct PropertyPipeline {
    setters: Vec<Box<dyn PropertySetter>>,
}

impl PropertyPipeline {
    pub fn new(setters: Vec<Box<dyn PropertySetter>>) -> Self {
        Self { setters }
    }

    /// Execution/period/utilization, then CCR or communication, then
    /// deadline, offset and additional properties.
    pub fn from_config(props: &PropertiesConfig) -> Result<Self> {
        if !props.assigns_execution_time() {
            return Err(GenError::InfeasibleConfig(
                "properties do not assign an execution time to every node".to_string(),
            ));
        }

        let mut setters: Vec<Box<dyn PropertySetter>> = Vec::new();

        if props.execution_time.is_some() || props.multi_rate.is_some() {
            setters.push(Box::new(ExecutionSetter::new(
                props.execution_time.clone(),
                props.multi_rate.clone(),
            )));
        }

        match (&props.ccr, &props.communication_time) {
            (Some(ccr), comm) => {
                setters.push(Box::new(CcrSetter::new(ccr.clone(), comm.clone())));
            }
            (None, Some(comm)) => {
                setters.push(Box::new(CommunicationSetter::new(comm.clone())));
            }
            (None, None) => {}
        }

        if let Some(deadline) = &props.end_to_end_deadline {
            setters.push(Box::new(DeadlineSetter::new(
                deadline.ratio_of_deadline_to_critical_path.clone(),
            )));
        }

        if let Some(offset) = props.multi_rate.as_ref().and_then(|mr| mr.offset.as_ref()) {
            setters.push(Box::new(OffsetSetter::new(offset.clone())));
        }

        if !props.additional.is_empty() {
            setters.push(Box::new(AdditionalSetter::new(props.additional.clone())));
        }

        Ok(Self::new(setters))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.setters.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Run every setter on `dag`, in order.
    pub fn apply(&self, dag: &mut TaskDag, rng: &mut dyn RngCore) -> Result<()> {
        for setter in &self.setters {
            debug!(setter = setter.name(), "setting properties");
            setter.set(dag, rng)?;
        }
        Ok(())
    }
}

/// Use `value`, or 1 with a warning when it rounded down to 0.
pub(crate) fn at_least_one(value: u64, what: &str) -> u64 {
    if value == 0 {
        warn!("{what} rounded down to 0; using 1 instead");
        1
    } else {
        value
    }
}
