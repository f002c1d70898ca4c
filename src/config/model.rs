use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{CombinationNaming, Number, PeriodicType, SeedScope};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// seed = 0
/// number_of_dags = 10
///
/// [graph_structure]
/// generation_method = "g(n,p)"
/// number_of_nodes = { random = [10, 20] }
/// probability_of_edge = { combination = "(0.1, 0.3, 0.1)" }
///
/// [properties]
/// execution_time = { random = "(1, 20, 1)" }
/// ```
///
/// Every tunable parameter is a [`ParamSpec`]; it is turned into a
/// [`crate::sampling::Choice`] once per parameter combination.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Seed of the run's random stream.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub seed_scope: SeedScope,

    /// Number of DAGs generated per parameter combination.
    #[serde(default = "default_number_of_dags")]
    pub number_of_dags: usize,

    /// Maximum build attempts per DAG.
    #[serde(default = "default_max_try")]
    pub max_try: usize,

    pub graph_structure: RawGraphStructure,

    #[serde(default)]
    pub properties: RawProperties,

    #[serde(default)]
    pub output_formats: OutputFormats,
}

fn default_number_of_dags() -> usize {
    1
}

fn default_max_try() -> usize {
    100
}

fn default_true() -> bool {
    true
}

/// One tunable parameter as written in the config file.
///
/// - `{ fixed = 3 }`
/// - `{ random = [1, 2, 3] }` or `{ random = "(1, 10, 1)" }`: pick one value
///   per use.
/// - `{ combination = [1, 2] }`: generate one DAG set per value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSpec<T> {
    Fixed(T),
    Random(ValueList<T>),
    Combination(ValueList<T>),
}

/// Explicit value list or a `"(start, stop, step)"` range string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueList<T> {
    List(Vec<T>),
    Range(String),
}

/// `[graph_structure]`, tagged by `generation_method`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "generation_method")]
pub enum RawGraphStructure {
    #[serde(rename = "fan-in/fan-out", alias = "fan_in_fan_out")]
    FanInFanOut(RawFanInFanOut),

    #[serde(rename = "g(n,p)", alias = "g(n, p)", alias = "gnp")]
    Gnp(RawGnp),

    #[serde(rename = "chain-based", alias = "chain_based")]
    ChainBased(RawChainBased),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFanInFanOut {
    pub number_of_nodes: ParamSpec<usize>,
    pub in_degree: ParamSpec<usize>,
    pub out_degree: ParamSpec<usize>,
    pub number_of_entry_nodes: ParamSpec<usize>,
    /// When set, exit nodes are appended after the fan-in/fan-out phase.
    #[serde(default)]
    pub number_of_exit_nodes: Option<ParamSpec<usize>>,
    #[serde(default)]
    pub ensure_weakly_connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGnp {
    pub number_of_nodes: ParamSpec<usize>,
    pub probability_of_edge: ParamSpec<f64>,
    #[serde(default)]
    pub number_of_entry_nodes: Option<ParamSpec<usize>>,
    #[serde(default)]
    pub number_of_exit_nodes: Option<ParamSpec<usize>>,
    #[serde(default)]
    pub ensure_weakly_connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChainBased {
    pub number_of_chains: ParamSpec<usize>,
    pub main_sequence_length: ParamSpec<usize>,
    #[serde(default)]
    pub number_of_sub_sequences: Option<ParamSpec<usize>>,
    #[serde(default)]
    pub vertically_link_chains: Option<RawVerticalLink>,
    #[serde(default)]
    pub merge_chains: Option<RawMergeChains>,
}

/// `[graph_structure.vertically_link_chains]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVerticalLink {
    pub number_of_entry_nodes: ParamSpec<usize>,
    /// Allow main-sequence tails as link sources.
    #[serde(default = "default_true")]
    pub main_sequence_tail: bool,
    /// Allow sub-sequence tails as link sources.
    #[serde(default)]
    pub sub_sequence_tail: bool,
}

/// `[graph_structure.merge_chains]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMergeChains {
    pub number_of_exit_nodes: ParamSpec<usize>,
    /// Allow merging into non-tail nodes.
    #[serde(default = "default_true")]
    pub middle_of_chain: bool,
    /// Allow merging into the nodes kept as exit nodes.
    #[serde(default = "default_true")]
    pub exit_node: bool,
}

/// `[properties]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperties {
    #[serde(default)]
    pub execution_time: Option<ParamSpec<u64>>,
    #[serde(default)]
    pub communication_time: Option<ParamSpec<u64>>,
    /// Communication-to-computation ratio.
    #[serde(default)]
    pub ccr: Option<ParamSpec<f64>>,
    #[serde(default)]
    pub end_to_end_deadline: Option<RawDeadline>,
    #[serde(default)]
    pub multi_rate: Option<RawMultiRate>,
    #[serde(default)]
    pub additional_properties: Option<RawAdditionalProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDeadline {
    pub ratio_of_deadline_to_critical_path: ParamSpec<f64>,
}

/// `[properties.multi_rate]`: periods, offsets and utilization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMultiRate {
    pub periodic_type: PeriodicType,
    pub period: ParamSpec<u64>,
    #[serde(default)]
    pub entry_node_period: Option<ParamSpec<u64>>,
    #[serde(default)]
    pub exit_node_period: Option<ParamSpec<u64>>,
    #[serde(default)]
    pub offset: Option<ParamSpec<u64>>,
    #[serde(default)]
    pub total_utilization: Option<ParamSpec<f64>>,
    #[serde(default)]
    pub maximum_utilization: Option<ParamSpec<f64>>,
}

/// `[properties.additional_properties]`: user-named numeric properties.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdditionalProperties {
    #[serde(default)]
    pub node_properties: BTreeMap<String, ParamSpec<Number>>,
    #[serde(default)]
    pub edge_properties: BTreeMap<String, ParamSpec<Number>>,
}

/// `[output_formats]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputFormats {
    #[serde(default)]
    pub naming_of_combination_directory: CombinationNaming,
    #[serde(default)]
    pub dag: DagFormats,
}

/// `[output_formats.dag]`: which files are written per DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DagFormats {
    #[serde(default = "default_true")]
    pub json: bool,
    #[serde(default)]
    pub dot: bool,
}

impl Default for DagFormats {
    fn default() -> Self {
        Self {
            json: true,
            dot: false,
        }
    }
}

/// A configuration that passed [`crate::config::validate`].
///
/// Only constructed through `TryFrom<RawConfigFile>` (or
/// [`ConfigFile::new_unchecked`] from inside the crate).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    raw: RawConfigFile,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &RawConfigFile {
        &self.raw
    }

    pub fn seed(&self) -> u64 {
        self.raw.seed
    }

    pub fn seed_scope(&self) -> SeedScope {
        self.raw.seed_scope
    }

    pub fn output_formats(&self) -> &OutputFormats {
        &self.raw.output_formats
    }

    /// Same configuration with a different seed (CLI override).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.raw.seed = seed;
        self
    }
}
