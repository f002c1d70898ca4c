#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dagsynth::config::{
    ChainBasedConfig, ConfigFile, DeadlineConfig, FanInFanOutConfig, GeneratorConfig, GnpConfig,
    GraphStructure, MergeConfig, MultiRateConfig, PropertiesConfig, VerticalLinkConfig,
    load_from_str,
};
use dagsynth::sampling::Choice;
use dagsynth::types::{Number, PeriodicType};

/// Fan-in/fan-out parameters with one entry node and no exit nodes.
pub fn fan_in_fan_out(nodes: usize, max_in: usize, max_out: usize) -> FanInFanOutConfig {
    FanInFanOutConfig {
        number_of_nodes: Choice::Fixed(nodes),
        in_degree: Choice::Fixed(max_in),
        out_degree: Choice::Fixed(max_out),
        number_of_entry_nodes: Choice::Fixed(1),
        number_of_exit_nodes: None,
        ensure_weakly_connected: false,
    }
}

/// G(n, p) without entry/exit augmentation.
pub fn gnp(nodes: usize, p: f64) -> GnpConfig {
    GnpConfig {
        number_of_nodes: Choice::Fixed(nodes),
        probability_of_edge: Choice::Fixed(p),
        number_of_entry_nodes: None,
        number_of_exit_nodes: None,
        ensure_weakly_connected: false,
    }
}

/// Plain chains without sub-sequences, linking or merging.
pub fn chains(number_of_chains: usize, main_sequence_length: usize) -> ChainBasedConfig {
    ChainBasedConfig {
        number_of_chains: Choice::Fixed(number_of_chains),
        main_sequence_length: Choice::Fixed(main_sequence_length),
        number_of_sub_sequences: None,
        vertically_link_chains: None,
        merge_chains: None,
    }
}

pub fn vertical_link(entry: usize) -> VerticalLinkConfig {
    VerticalLinkConfig {
        number_of_entry_nodes: Choice::Fixed(entry),
        main_sequence_tail: true,
        sub_sequence_tail: true,
    }
}

pub fn merge(exit: usize) -> MergeConfig {
    MergeConfig {
        number_of_exit_nodes: Choice::Fixed(exit),
        middle_of_chain: true,
        exit_node: true,
    }
}

/// Multi-rate settings with every node timer-driven.
pub fn multi_rate(periodic_type: PeriodicType, periods: Vec<u64>) -> MultiRateConfig {
    MultiRateConfig {
        periodic_type,
        period: Choice::Choices(periods),
        entry_node_period: None,
        exit_node_period: None,
        offset: None,
        total_utilization: None,
        maximum_utilization: None,
    }
}

/// Builder for [`PropertiesConfig`].
#[derive(Debug, Clone, Default)]
pub struct PropertiesBuilder {
    props: PropertiesConfig,
}

impl PropertiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execution_time(mut self, choice: Choice<u64>) -> Self {
        self.props.execution_time = Some(choice);
        self
    }

    pub fn communication_time(mut self, choice: Choice<u64>) -> Self {
        self.props.communication_time = Some(choice);
        self
    }

    pub fn ccr(mut self, ccr: f64) -> Self {
        self.props.ccr = Some(Choice::Fixed(ccr));
        self
    }

    pub fn deadline_ratio(mut self, ratio: f64) -> Self {
        self.props.end_to_end_deadline = Some(DeadlineConfig {
            ratio_of_deadline_to_critical_path: Choice::Fixed(ratio),
        });
        self
    }

    pub fn multi_rate(mut self, mr: MultiRateConfig) -> Self {
        self.props.multi_rate = Some(mr);
        self
    }

    pub fn node_property(mut self, name: &str, values: Vec<Number>) -> Self {
        self.props
            .additional
            .node_properties
            .insert(name.to_string(), Choice::Choices(values));
        self
    }

    pub fn edge_property(mut self, name: &str, values: Vec<Number>) -> Self {
        self.props
            .additional
            .edge_properties
            .insert(name.to_string(), Choice::Choices(values));
        self
    }

    pub fn build(self) -> PropertiesConfig {
        self.props
    }
}

/// Builder for [`GeneratorConfig`].
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new(graph_structure: GraphStructure) -> Self {
        Self {
            config: GeneratorConfig {
                number_of_dags: 1,
                max_try: 100,
                graph_structure,
                properties: PropertiesBuilder::new()
                    .execution_time(Choice::Choices(vec![1, 2, 3, 4, 5]))
                    .build(),
            },
        }
    }

    pub fn number_of_dags(mut self, n: usize) -> Self {
        self.config.number_of_dags = n;
        self
    }

    pub fn max_try(mut self, n: usize) -> Self {
        self.config.max_try = n;
        self
    }

    pub fn properties(mut self, props: PropertiesConfig) -> Self {
        self.config.properties = props;
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

/// A small valid config file body (G(n,p) with one combination axis).
pub const GNP_TOML: &str = r#"
seed = 7
number_of_dags = 3

[graph_structure]
generation_method = "g(n,p)"
number_of_nodes = { random = [8, 10, 12] }
probability_of_edge = { combination = [0.2, 0.4] }
number_of_entry_nodes = { fixed = 1 }
number_of_exit_nodes = { fixed = 1 }
ensure_weakly_connected = true

[properties]
execution_time = { random = "(1, 20, 1)" }
communication_time = { random = [1, 2, 3] }

[properties.end_to_end_deadline]
ratio_of_deadline_to_critical_path = { fixed = 1.5 }

[output_formats.dag]
json = true
dot = true
"#;

/// Parse and validate a config from TOML text.
pub fn config_from_toml(toml: &str) -> ConfigFile {
    let raw = load_from_str(toml).expect("test config should parse");
    ConfigFile::try_from(raw).expect("test config should validate")
}

/// Write `contents` to `<dir>/<name>` and return the path.
pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test config");
    path
}
