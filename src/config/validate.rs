// src/config/validate.rs

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::resolved::{GeneratorConfig, GraphStructure, Resolver};
use crate::errors::{GenError, Result};
use crate::types::PeriodicType;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GenError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_counts(cfg)?;

    // Resolving expands every list and range string, so malformed values
    // surface here rather than in the middle of a run.
    let resolved = Resolver::collecting().resolve(cfg).map_err(into_config_error)?;

    validate_periodic_type(&resolved)?;
    validate_execution_time(&resolved)?;
    validate_communication(&resolved);
    validate_additional_names(&resolved)?;
    Ok(())
}

/// Keys the node-link export writes for every node or edge.
const RESERVED_NODE_KEYS: [&str; 5] = ["id", "execution_time", "period", "end_to_end_deadline", "offset"];
const RESERVED_EDGE_KEYS: [&str; 3] = ["source", "target", "communication_time"];

fn into_config_error(err: GenError) -> GenError {
    match err {
        GenError::ConfigError(_) => err,
        other => GenError::ConfigError(other.to_string()),
    }
}

fn validate_counts(cfg: &RawConfigFile) -> Result<()> {
    if cfg.number_of_dags == 0 {
        return Err(GenError::ConfigError(
            "number_of_dags must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.max_try == 0 {
        return Err(GenError::ConfigError(
            "max_try must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_periodic_type(cfg: &GeneratorConfig) -> Result<()> {
    let Some(mr) = &cfg.properties.multi_rate else {
        return Ok(());
    };
    if mr.periodic_type == PeriodicType::Chain
        && !matches!(cfg.graph_structure, GraphStructure::ChainBased(_))
    {
        return Err(GenError::ConfigError(format!(
            "periodic_type = \"chain\" requires generation_method = \"chain-based\" (got \"{}\")",
            cfg.graph_structure.method_name()
        )));
    }
    Ok(())
}

fn validate_execution_time(cfg: &GeneratorConfig) -> Result<()> {
    let props = &cfg.properties;
    if props.ccr.is_some() && props.communication_time.is_none() && props.execution_time.is_none()
    {
        let from_utilization = props.multi_rate.as_ref().is_some_and(|mr| mr.has_utilization());
        if !from_utilization {
            return Err(GenError::ConfigError(
                "ccr needs execution_time, communication_time or a utilization to derive from"
                    .to_string(),
            ));
        }
    }
    if !props.assigns_execution_time() {
        return Err(GenError::ConfigError(
            "no execution time can be assigned to every node: set [properties].execution_time, \
             a utilization with periodic_type \"all\"/\"chain\", or ccr together with communication_time"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_communication(cfg: &GeneratorConfig) {
    let props = &cfg.properties;
    if props.ccr.is_some() && props.communication_time.is_some() && props.execution_time.is_some() {
        warn!("both ccr and execution_time are set; communication_time is ignored");
    }
}

fn validate_additional_names(cfg: &GeneratorConfig) -> Result<()> {
    let additional = &cfg.properties.additional;
    let clashes = [
        ("node_properties", &additional.node_properties, &RESERVED_NODE_KEYS[..]),
        ("edge_properties", &additional.edge_properties, &RESERVED_EDGE_KEYS[..]),
    ];
    for (table, properties, reserved) in clashes {
        if let Some(name) = properties.keys().find(|k| reserved.contains(&k.as_str())) {
            return Err(GenError::ConfigError(format!(
                "additional_properties.{table}.{name} clashes with a built-in field"
            )));
        }
    }
    Ok(())
}
