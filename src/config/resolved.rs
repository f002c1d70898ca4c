// src/config/resolved.rs

//! Typed generator configuration.
//!
//! A [`GeneratorConfig`] is what builders and property setters consume: every
//! parameter is already a [`Choice`], and `combination` parameters have been
//! pinned to one value by [`crate::config::combo::ComboGenerator`].

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::config::model::{
    ParamSpec, RawAdditionalProperties, RawChainBased, RawConfigFile, RawDeadline,
    RawFanInFanOut, RawGnp, RawGraphStructure, RawMergeChains, RawMultiRate, RawProperties,
    RawVerticalLink, ValueList,
};
use crate::config::range::parse_range;
use crate::errors::{GenError, Result};
use crate::sampling::Choice;
use crate::types::{Number, PeriodicType};

/// Everything needed to generate one set of DAGs.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub number_of_dags: usize,
    pub max_try: usize,
    pub graph_structure: GraphStructure,
    pub properties: PropertiesConfig,
}

/// Topology strategy plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphStructure {
    FanInFanOut(FanInFanOutConfig),
    Gnp(GnpConfig),
    ChainBased(ChainBasedConfig),
}

impl GraphStructure {
    pub fn method_name(&self) -> &'static str {
        match self {
            GraphStructure::FanInFanOut(_) => "fan-in/fan-out",
            GraphStructure::Gnp(_) => "g(n,p)",
            GraphStructure::ChainBased(_) => "chain-based",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanInFanOutConfig {
    pub number_of_nodes: Choice<usize>,
    pub in_degree: Choice<usize>,
    pub out_degree: Choice<usize>,
    pub number_of_entry_nodes: Choice<usize>,
    pub number_of_exit_nodes: Option<Choice<usize>>,
    pub ensure_weakly_connected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GnpConfig {
    pub number_of_nodes: Choice<usize>,
    pub probability_of_edge: Choice<f64>,
    pub number_of_entry_nodes: Option<Choice<usize>>,
    pub number_of_exit_nodes: Option<Choice<usize>>,
    pub ensure_weakly_connected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainBasedConfig {
    pub number_of_chains: Choice<usize>,
    pub main_sequence_length: Choice<usize>,
    pub number_of_sub_sequences: Option<Choice<usize>>,
    pub vertically_link_chains: Option<VerticalLinkConfig>,
    pub merge_chains: Option<MergeConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalLinkConfig {
    pub number_of_entry_nodes: Choice<usize>,
    pub main_sequence_tail: bool,
    pub sub_sequence_tail: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    pub number_of_exit_nodes: Choice<usize>,
    pub middle_of_chain: bool,
    pub exit_node: bool,
}

/// Node and edge annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertiesConfig {
    pub execution_time: Option<Choice<u64>>,
    pub communication_time: Option<Choice<u64>>,
    pub ccr: Option<Choice<f64>>,
    pub end_to_end_deadline: Option<DeadlineConfig>,
    pub multi_rate: Option<MultiRateConfig>,
    pub additional: AdditionalConfig,
}

impl PropertiesConfig {
    /// Whether the pipeline can give every node an execution time.
    ///
    /// True when execution times are drawn directly, derived from the
    /// utilization of a periodic type covering every node, or derived from
    /// communication times through the CCR.
    pub fn assigns_execution_time(&self) -> bool {
        let from_utilization = self.multi_rate.as_ref().is_some_and(|mr| {
            mr.has_utilization()
                && matches!(mr.periodic_type, PeriodicType::All | PeriodicType::Chain)
        });
        let from_ccr = self.ccr.is_some() && self.communication_time.is_some();
        self.execution_time.is_some() || from_utilization || from_ccr
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineConfig {
    pub ratio_of_deadline_to_critical_path: Choice<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiRateConfig {
    pub periodic_type: PeriodicType,
    pub period: Choice<u64>,
    pub entry_node_period: Option<Choice<u64>>,
    pub exit_node_period: Option<Choice<u64>>,
    pub offset: Option<Choice<u64>>,
    pub total_utilization: Option<Choice<f64>>,
    pub maximum_utilization: Option<Choice<f64>>,
}

impl MultiRateConfig {
    pub fn has_utilization(&self) -> bool {
        self.total_utilization.is_some() || self.maximum_utilization.is_some()
    }
}

/// User-named extra properties, drawn per node / per edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalConfig {
    pub node_properties: BTreeMap<String, Choice<Number>>,
    pub edge_properties: BTreeMap<String, Choice<Number>>,
}

impl AdditionalConfig {
    pub fn is_empty(&self) -> bool {
        self.node_properties.is_empty() && self.edge_properties.is_empty()
    }
}

/// Scalar types that can appear in a [`ParamSpec`].
pub trait ParamValue: Copy + Debug {
    /// Convert one expanded range value; `None` when it does not fit the type.
    fn from_range_value(v: f64, integral: bool) -> Option<Self>;
    fn to_number(self) -> Number;
    fn from_number(n: Number) -> Option<Self>;
}

fn whole_non_negative(v: f64) -> Option<f64> {
    (v >= 0.0 && v.fract() == 0.0).then_some(v)
}

impl ParamValue for usize {
    fn from_range_value(v: f64, _integral: bool) -> Option<Self> {
        whole_non_negative(v).map(|v| v as usize)
    }

    fn to_number(self) -> Number {
        Number::Int(self as i64)
    }

    fn from_number(n: Number) -> Option<Self> {
        whole_non_negative(n.as_f64()).map(|v| v as usize)
    }
}

impl ParamValue for u64 {
    fn from_range_value(v: f64, _integral: bool) -> Option<Self> {
        whole_non_negative(v).map(|v| v as u64)
    }

    fn to_number(self) -> Number {
        Number::Int(self as i64)
    }

    fn from_number(n: Number) -> Option<Self> {
        whole_non_negative(n.as_f64()).map(|v| v as u64)
    }
}

impl ParamValue for f64 {
    fn from_range_value(v: f64, _integral: bool) -> Option<Self> {
        Some(v)
    }

    fn to_number(self) -> Number {
        Number::Float(self)
    }

    fn from_number(n: Number) -> Option<Self> {
        Some(n.as_f64())
    }
}

impl ParamValue for Number {
    fn from_range_value(v: f64, integral: bool) -> Option<Self> {
        Some(if integral {
            Number::Int(v as i64)
        } else {
            Number::Float(v)
        })
    }

    fn to_number(self) -> Number {
        self
    }

    fn from_number(n: Number) -> Option<Self> {
        Some(n)
    }
}

/// One `combination` parameter and the values it ranges over.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboAxis {
    pub name: String,
    pub values: Vec<Number>,
}

/// Turns [`ParamSpec`]s into [`Choice`]s.
///
/// Without an assignment it records every `combination` parameter as an
/// axis (and provisionally pins it to its first value); with an assignment
/// it pins each one to the assigned value.
#[derive(Debug, Default)]
pub(crate) struct Resolver<'a> {
    assignment: Option<&'a BTreeMap<String, Number>>,
    axes: Vec<ComboAxis>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn collecting() -> Self {
        Self::default()
    }

    pub(crate) fn assigned(assignment: &'a BTreeMap<String, Number>) -> Self {
        Self {
            assignment: Some(assignment),
            axes: Vec::new(),
        }
    }

    pub(crate) fn into_axes(self) -> Vec<ComboAxis> {
        self.axes
    }

    pub(crate) fn param<T: ParamValue>(&mut self, name: &str, spec: &ParamSpec<T>) -> Result<Choice<T>> {
        match spec {
            ParamSpec::Fixed(v) => Ok(Choice::Fixed(*v)),
            ParamSpec::Random(list) => Ok(Choice::Choices(expand(name, list)?)),
            ParamSpec::Combination(list) => {
                let values = expand(name, list)?;
                match self.assignment {
                    Some(assignment) => {
                        let assigned = assignment.get(name).copied().ok_or_else(|| {
                            GenError::ConfigError(format!(
                                "no value assigned to combination parameter '{name}'"
                            ))
                        })?;
                        let value = T::from_number(assigned).ok_or_else(|| {
                            GenError::ConfigError(format!(
                                "value {assigned} does not fit parameter '{name}'"
                            ))
                        })?;
                        Ok(Choice::Fixed(value))
                    }
                    None => {
                        if self.axes.iter().any(|a| a.name == name) {
                            return Err(GenError::ConfigError(format!(
                                "combination parameter '{name}' is declared twice"
                            )));
                        }
                        self.axes.push(ComboAxis {
                            name: name.to_string(),
                            values: values.iter().map(|v| v.to_number()).collect(),
                        });
                        Ok(Choice::Fixed(values[0]))
                    }
                }
            }
        }
    }

    fn opt_param<T: ParamValue>(
        &mut self,
        name: &str,
        spec: Option<&ParamSpec<T>>,
    ) -> Result<Option<Choice<T>>> {
        spec.map(|s| self.param(name, s)).transpose()
    }

    /// Walk the whole raw config once, in declaration order.
    pub(crate) fn resolve(&mut self, raw: &RawConfigFile) -> Result<GeneratorConfig> {
        Ok(GeneratorConfig {
            number_of_dags: raw.number_of_dags,
            max_try: raw.max_try,
            graph_structure: self.graph_structure(&raw.graph_structure)?,
            properties: self.properties(&raw.properties)?,
        })
    }

    fn graph_structure(&mut self, raw: &RawGraphStructure) -> Result<GraphStructure> {
        Ok(match raw {
            RawGraphStructure::FanInFanOut(r) => GraphStructure::FanInFanOut(self.fan_in_fan_out(r)?),
            RawGraphStructure::Gnp(r) => GraphStructure::Gnp(self.gnp(r)?),
            RawGraphStructure::ChainBased(r) => GraphStructure::ChainBased(self.chain_based(r)?),
        })
    }

    fn fan_in_fan_out(&mut self, r: &RawFanInFanOut) -> Result<FanInFanOutConfig> {
        Ok(FanInFanOutConfig {
            number_of_nodes: self.param("number_of_nodes", &r.number_of_nodes)?,
            in_degree: self.param("in_degree", &r.in_degree)?,
            out_degree: self.param("out_degree", &r.out_degree)?,
            number_of_entry_nodes: self.param("number_of_entry_nodes", &r.number_of_entry_nodes)?,
            number_of_exit_nodes: self
                .opt_param("number_of_exit_nodes", r.number_of_exit_nodes.as_ref())?,
            ensure_weakly_connected: r.ensure_weakly_connected,
        })
    }

    fn gnp(&mut self, r: &RawGnp) -> Result<GnpConfig> {
        Ok(GnpConfig {
            number_of_nodes: self.param("number_of_nodes", &r.number_of_nodes)?,
            probability_of_edge: self.param("probability_of_edge", &r.probability_of_edge)?,
            number_of_entry_nodes: self
                .opt_param("number_of_entry_nodes", r.number_of_entry_nodes.as_ref())?,
            number_of_exit_nodes: self
                .opt_param("number_of_exit_nodes", r.number_of_exit_nodes.as_ref())?,
            ensure_weakly_connected: r.ensure_weakly_connected,
        })
    }

    fn chain_based(&mut self, r: &RawChainBased) -> Result<ChainBasedConfig> {
        Ok(ChainBasedConfig {
            number_of_chains: self.param("number_of_chains", &r.number_of_chains)?,
            main_sequence_length: self.param("main_sequence_length", &r.main_sequence_length)?,
            number_of_sub_sequences: self
                .opt_param("number_of_sub_sequences", r.number_of_sub_sequences.as_ref())?,
            vertically_link_chains: r
                .vertically_link_chains
                .as_ref()
                .map(|v| self.vertical_link(v))
                .transpose()?,
            merge_chains: r
                .merge_chains
                .as_ref()
                .map(|m| self.merge(m))
                .transpose()?,
        })
    }

    fn vertical_link(&mut self, r: &RawVerticalLink) -> Result<VerticalLinkConfig> {
        Ok(VerticalLinkConfig {
            number_of_entry_nodes: self.param("number_of_entry_nodes", &r.number_of_entry_nodes)?,
            main_sequence_tail: r.main_sequence_tail,
            sub_sequence_tail: r.sub_sequence_tail,
        })
    }

    fn merge(&mut self, r: &RawMergeChains) -> Result<MergeConfig> {
        Ok(MergeConfig {
            number_of_exit_nodes: self.param("number_of_exit_nodes", &r.number_of_exit_nodes)?,
            middle_of_chain: r.middle_of_chain,
            exit_node: r.exit_node,
        })
    }

    fn properties(&mut self, r: &RawProperties) -> Result<PropertiesConfig> {
        Ok(PropertiesConfig {
            execution_time: self.opt_param("execution_time", r.execution_time.as_ref())?,
            communication_time: self
                .opt_param("communication_time", r.communication_time.as_ref())?,
            ccr: self.opt_param("ccr", r.ccr.as_ref())?,
            end_to_end_deadline: r
                .end_to_end_deadline
                .as_ref()
                .map(|d| self.deadline(d))
                .transpose()?,
            multi_rate: r
                .multi_rate
                .as_ref()
                .map(|m| self.multi_rate(m))
                .transpose()?,
            additional: match &r.additional_properties {
                Some(a) => self.additional(a)?,
                None => AdditionalConfig::default(),
            },
        })
    }

    fn deadline(&mut self, r: &RawDeadline) -> Result<DeadlineConfig> {
        Ok(DeadlineConfig {
            ratio_of_deadline_to_critical_path: self.param(
                "ratio_of_deadline_to_critical_path",
                &r.ratio_of_deadline_to_critical_path,
            )?,
        })
    }

    fn multi_rate(&mut self, r: &RawMultiRate) -> Result<MultiRateConfig> {
        Ok(MultiRateConfig {
            periodic_type: r.periodic_type,
            period: self.param("period", &r.period)?,
            entry_node_period: self.opt_param("entry_node_period", r.entry_node_period.as_ref())?,
            exit_node_period: self.opt_param("exit_node_period", r.exit_node_period.as_ref())?,
            offset: self.opt_param("offset", r.offset.as_ref())?,
            total_utilization: self.opt_param("total_utilization", r.total_utilization.as_ref())?,
            maximum_utilization: self
                .opt_param("maximum_utilization", r.maximum_utilization.as_ref())?,
        })
    }

    fn additional(&mut self, r: &RawAdditionalProperties) -> Result<AdditionalConfig> {
        let mut out = AdditionalConfig::default();
        for (name, spec) in &r.node_properties {
            out.node_properties.insert(name.clone(), self.param(name, spec)?);
        }
        for (name, spec) in &r.edge_properties {
            out.edge_properties.insert(name.clone(), self.param(name, spec)?);
        }
        Ok(out)
    }
}

/// Expand a value list or range string into a non-empty vector.
fn expand<T: ParamValue>(name: &str, list: &ValueList<T>) -> Result<Vec<T>> {
    let values = match list {
        ValueList::List(values) => values.clone(),
        ValueList::Range(s) => {
            let range = parse_range(s)?;
            range
                .values()
                .into_iter()
                .map(|v| {
                    T::from_range_value(v, range.is_integral()).ok_or_else(|| {
                        GenError::ConfigError(format!(
                            "range value {v} of '{name}' is not a valid value for this parameter"
                        ))
                    })
                })
                .collect::<Result<Vec<T>>>()?
        }
    };

    if values.is_empty() {
        return Err(GenError::ConfigError(format!(
            "parameter '{name}' has an empty value list"
        )));
    }
    Ok(values)
}
